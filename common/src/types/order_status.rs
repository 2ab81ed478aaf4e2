use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical bucket every backend status is displayed as.
///
/// The backend vocabulary is open-ended (`pendiente`, `en_camino`,
/// `Pedido Enviado`, ...). Every view goes through [`normalize`] so an order
/// gets the same label and color on every screen.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum StatusBucket {
    Pending,    // El pedido espera que el chef lo acepte
    Preparing,  // El chef está preparando el pedido
    Dispatched, // El pedido salió de cocina y espera al motorizado
    EnRoute,    // El motorizado recogió el pedido o va en camino
    Delivered,  // El pedido fue entregado al cliente
    Cancelled,  // El pedido fue cancelado o rechazado
    Unknown,    // Estado que no reconocemos
}

/// Colors used to render a bucket.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct StatusStyle {
    /// Bucket al que pertenece el estado.
    pub bucket: StatusBucket,
    /// Clase de fondo.
    pub background: &'static str,
    /// Clase del texto.
    pub text: &'static str,
    /// Color en hexadecimal (`#rrggbb`).
    pub hex: &'static str,
}

impl StatusStyle {
    /// Splits `hex` into its RGB components.
    pub fn rgb(&self) -> (u8, u8, u8) {
        let channel = |range: std::ops::Range<usize>| {
            self.hex
                .get(range)
                .and_then(|digits| u8::from_str_radix(digits, 16).ok())
                .unwrap_or(0)
        };
        (channel(1..3), channel(3..5), channel(5..7))
    }
}

impl StatusBucket {
    pub const ALL: [StatusBucket; 7] = [
        StatusBucket::Pending,
        StatusBucket::Preparing,
        StatusBucket::Dispatched,
        StatusBucket::EnRoute,
        StatusBucket::Delivered,
        StatusBucket::Cancelled,
        StatusBucket::Unknown,
    ];

    /// Maps a raw backend status to its bucket.
    ///
    /// `None` counts as an empty status. The lookup trims surrounding
    /// whitespace and ignores case; anything unrecognised is `Unknown`.
    pub fn classify(raw: Option<&str>) -> StatusBucket {
        let estado = raw.unwrap_or_default().trim().to_lowercase();
        match estado.as_str() {
            "pendiente" | "pedido pendiente" => StatusBucket::Pending,
            "preparando" | "pedido preparado" => StatusBucket::Preparing,
            "despachando" | "despachado" | "pedido enviado" | "pedido despachado" => {
                StatusBucket::Dispatched
            }
            "recogiendo" | "en_camino" | "en camino" => StatusBucket::EnRoute,
            "entregado" | "pedido recibido" | "completado" | "completados" => {
                StatusBucket::Delivered
            }
            "cancelado" | "rechazado" => StatusBucket::Cancelled,
            _ => StatusBucket::Unknown,
        }
    }

    pub fn style(self) -> StatusStyle {
        let (background, text, hex) = match self {
            StatusBucket::Pending => ("bg-red-500", "text-white", "#ef4444"),
            StatusBucket::Preparing => ("bg-yellow-400", "text-yellow-900", "#fbbf24"),
            StatusBucket::Dispatched => ("bg-green-500", "text-white", "#22c55e"),
            StatusBucket::EnRoute => ("bg-orange-500", "text-white", "#f97316"),
            StatusBucket::Delivered => ("bg-blue-500", "text-white", "#3b82f6"),
            StatusBucket::Cancelled => ("bg-gray-500", "text-white", "#6b7280"),
            StatusBucket::Unknown => ("bg-gray-400", "text-white", "#9ca3af"),
        };
        StatusStyle {
            bucket: self,
            background,
            text,
            hex,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StatusBucket::Pending => "Pendiente",
            StatusBucket::Preparing => "Preparando",
            StatusBucket::Dispatched => "Despachado",
            StatusBucket::EnRoute => "En Camino",
            StatusBucket::Delivered => "Entregado",
            StatusBucket::Cancelled => "Cancelado",
            StatusBucket::Unknown => "Desconocido",
        }
    }

    /// Delivered and cancelled orders no longer change.
    pub fn is_final(self) -> bool {
        matches!(self, StatusBucket::Delivered | StatusBucket::Cancelled)
    }
}

impl fmt::Display for StatusBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Resolves the display style of a raw backend status. Never fails.
pub fn normalize(raw: Option<&str>) -> StatusStyle {
    StatusBucket::classify(raw).style()
}
