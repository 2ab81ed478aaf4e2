use crate::types::order_status::{StatusStyle, normalize};
use crate::types::staff::StaffTier;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use serde_with::{DefaultOnNull, serde_as};

#[serde_as]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderDTO {
    /// ID del pedido.
    pub pedido_id: String,
    /// Sede a la que pertenece el pedido.
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub tenant_id: String,
    /// Estado crudo tal como lo devuelve el backend.
    #[serde(default)]
    pub estado: Option<String>,
    /// Marca de tiempo (ISO 8601) en la que se creó el pedido.
    #[serde(default)]
    pub fecha_inicio: Option<String>,
    /// Marca de tiempo en la que se cerró el pedido, si ya terminó.
    #[serde(default)]
    pub fecha_fin: Option<String>,
    /// Monto total del pedido.
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub precio_total: f64,
    /// Chef asignado.
    #[serde(default)]
    pub chef_id: Option<String>,
    /// Motorizado asignado.
    #[serde(default)]
    pub motorizado_id: Option<String>,
    /// Productos del pedido.
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub productos: Vec<OrderLineDTO>,
    /// Rol del usuario actual sobre el pedido (solo en mis-asignaciones).
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub mi_rol: MyRoleDTO,
}

impl OrderDTO {
    pub fn raw_status(&self) -> &str {
        self.estado.as_deref().unwrap_or_default()
    }

    pub fn status_style(&self) -> StatusStyle {
        normalize(self.estado.as_deref())
    }
}

impl Eq for OrderDTO {}

impl PartialEq for OrderDTO {
    fn eq(&self, other: &Self) -> bool {
        self.pedido_id == other.pedido_id
    }
}

impl std::hash::Hash for OrderDTO {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.pedido_id.hash(state);
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OrderLineDTO {
    #[serde(default, alias = "nombre_producto")]
    pub nombre: Option<String>,
    #[serde(default, alias = "quantity")]
    pub cantidad: Option<u32>,
    #[serde(default)]
    pub precio: Option<f64>,
}

impl OrderLineDTO {
    /// Missing or zero quantities count as one unit.
    pub fn quantity(&self) -> u32 {
        self.cantidad.filter(|c| *c > 0).unwrap_or(1)
    }

    /// `index` is zero based; unnamed lines read as "Producto N".
    pub fn display_name(&self, index: usize) -> String {
        match self.nombre.as_deref().map(str::trim) {
            Some(nombre) if !nombre.is_empty() => nombre.to_string(),
            _ => format!("Producto {}", index + 1),
        }
    }
}

#[serde_as]
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MyRoleDTO {
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub es_chef: bool,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub es_motorizado: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WorkerDTO {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Nivel crudo (`admin` / `trabajador`).
    #[serde(default)]
    pub staff_tier: Option<String>,
}

impl WorkerDTO {
    pub fn tier(&self) -> Option<StaffTier> {
        StaffTier::parse(self.staff_tier.as_deref()?)
    }

    pub fn display_name(&self) -> String {
        display_name(self.name.as_deref(), &self.email)
    }
}

/// Name when present, otherwise the local part of the email.
fn display_name(name: Option<&str>, email: &str) -> String {
    match name.map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => email.split('@').next().unwrap_or_default().to_string(),
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StatusHistoryEntryDTO {
    #[serde(default)]
    pub estado_anterior: Option<String>,
    #[serde(default)]
    pub estado_nuevo: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub motivo: Option<String>,
}

#[serde_as]
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OrderStatusDTO {
    #[serde(default)]
    pub pedido_id: Option<String>,
    #[serde(default)]
    pub estado: Option<String>,
    /// Transiciones registradas, de la más antigua a la más reciente.
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub historial: Vec<StatusHistoryEntryDTO>,
}

#[serde_as]
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UserDTO {
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub user_id: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub staff_tier: Option<String>,
    /// Sede fija del usuario. `None` para el administrador general.
    #[serde(default)]
    pub tenant_id_sede: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub permissions: Vec<String>,
}

impl UserDTO {
    pub fn tier(&self) -> Option<StaffTier> {
        StaffTier::parse(self.staff_tier.as_deref()?)
    }

    pub fn display_name(&self) -> String {
        display_name(self.name.as_deref(), &self.email)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<UserDTO>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Free-form acknowledgement returned by the write endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ActionAck {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProductDTO {
    pub producto_id: String,
    #[serde(default)]
    pub nombre_producto: String,
    #[serde(default)]
    pub descripcion: Option<String>,
    #[serde(default)]
    pub precio_producto: Option<f64>,
    /// `comida`, `bebida`, ...
    #[serde(default)]
    pub tipo: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl ProductDTO {
    /// Products are active unless the backend says otherwise.
    pub fn is_active(&self) -> bool {
        self.is_active != Some(false)
    }

    pub fn price(&self) -> f64 {
        self.precio_producto.unwrap_or(0.0)
    }
}

/// Body of the create/update product calls.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductDraft {
    pub nombre_producto: String,
    pub descripcion: String,
    pub precio_producto: f64,
    pub tipo: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockLevel {
    OutOfStock,
    Low,
    InStock,
}

impl StockLevel {
    pub fn label(self) -> &'static str {
        match self {
            StockLevel::OutOfStock => "Sin Stock",
            StockLevel::Low => "Bajo Stock",
            StockLevel::InStock => "En Stock",
        }
    }
}

#[serde_as]
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct InventoryItemDTO {
    pub producto_id: String,
    #[serde(default)]
    pub tenant_id: Option<String>,
    #[serde(default)]
    pub nombre_producto: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub stock_actual: i64,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub stock_minimo: i64,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub stock_maximo: i64,
    #[serde(default)]
    pub ultima_actualizacion: Option<String>,
}

impl InventoryItemDTO {
    pub fn stock_level(&self) -> StockLevel {
        if self.stock_actual <= 0 {
            StockLevel::OutOfStock
        } else if self.stock_actual <= self.stock_minimo {
            StockLevel::Low
        } else {
            StockLevel::InStock
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MovementKind {
    /// Suma stock
    Entrada,
    /// Resta stock
    Salida,
    /// Fija el stock exacto
    Ajuste,
}

impl MovementKind {
    pub fn parse(value: &str) -> Option<MovementKind> {
        match value.trim().to_lowercase().as_str() {
            "entrada" => Some(MovementKind::Entrada),
            "salida" => Some(MovementKind::Salida),
            "ajuste" => Some(MovementKind::Ajuste),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MovementKind::Entrada => "entrada",
            MovementKind::Salida => "salida",
            MovementKind::Ajuste => "ajuste",
        }
    }
}

const DEFAULT_ADJUSTMENT_REASON: &str = "Ajuste manual";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InventoryAdjustment {
    pub producto_id: String,
    pub cantidad: i64,
    pub tipo_movimiento: MovementKind,
    pub reason: String,
}

impl InventoryAdjustment {
    pub fn new(producto_id: impl Into<String>, cantidad: i64, tipo_movimiento: MovementKind) -> Self {
        InventoryAdjustment {
            producto_id: producto_id.into(),
            cantidad,
            tipo_movimiento,
            reason: DEFAULT_ADJUSTMENT_REASON.to_string(),
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        let reason = reason.into();
        if !reason.trim().is_empty() {
            self.reason = reason;
        }
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pagination {
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

impl Pagination {
    pub fn last_page(limit: u32) -> Self {
        Pagination {
            limit,
            has_more: false,
            next_cursor: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

/// Optional query filters of the product listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilters {
    pub tipo: Option<String>,
    pub is_active: Option<bool>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub limit: Option<u32>,
    pub cursor: Option<String>,
}

impl ProductFilters {
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(tipo) = &self.tipo {
            query.push(("tipo", tipo.clone()));
        }
        if let Some(is_active) = self.is_active {
            query.push(("is_active", is_active.to_string()));
        }
        if let Some(sort_by) = &self.sort_by {
            query.push(("sortBy", sort_by.clone()));
        }
        if let Some(sort_order) = &self.sort_order {
            query.push(("sortOrder", sort_order.clone()));
        }
        if let Some(limit) = self.limit.filter(|l| *l > 0) {
            query.push(("limit", limit.to_string()));
        }
        if let Some(cursor) = &self.cursor {
            query.push(("cursor", cursor.clone()));
        }
        query
    }
}

#[serde_as]
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusCounts {
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub completados: u64,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub cancelados: u64,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub pendientes: u64,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub preparando: u64,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub despachando: u64,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub en_camino: u64,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub entregado: u64,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub rechazado: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TopProductDTO {
    #[serde(default, alias = "nombre_producto")]
    pub nombre: String,
    #[serde(default, alias = "cantidad")]
    pub ventas: u64,
}

/// KPIs of a sede. The backend leaves out metrics that are zero.
#[serde_as]
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct KpiReport {
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub tenant_id: String,
    #[serde(default)]
    pub fecha: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub numero_pedidos: u64,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub ingresos_dia: f64,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub ticket_promedio: f64,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub top_productos: Vec<TopProductDTO>,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub estados_pedidos: StatusCounts,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub tasa_exito: f64,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub ingresos_por_hora: Vec<Value>,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub metodos_pago: Vec<Value>,
}
