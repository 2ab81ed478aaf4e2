use crate::types::dtos::OrderDTO;
use crate::types::order_status::StatusBucket;
use crate::utils::{elapsed_millis, format_elapsed};
use chrono::{DateTime, Utc};

/// Figures of a sede computed locally from its order list.
#[derive(Debug, Clone, PartialEq)]
pub struct SedeSummary {
    pub orders: usize,
    pub revenue: f64,
    /// Ingreso promedio por pedido; `0` sin pedidos.
    pub average_ticket: f64,
    /// Tiempo promedio por pedido como `HH:MM:SS`.
    pub average_elapsed: String,
    pub delivered: usize,
    pub cancelled: usize,
    /// Porcentaje (0-100) de entregados sobre los pedidos terminados.
    pub success_rate: f64,
}

impl SedeSummary {
    pub fn from_orders(orders: &[OrderDTO], now: DateTime<Utc>) -> Self {
        let count = orders.len();
        let revenue: f64 = orders.iter().map(|order| order.precio_total).sum();
        let total_elapsed: u64 = orders
            .iter()
            .map(|order| {
                elapsed_millis(
                    order.fecha_inicio.as_deref(),
                    order.fecha_fin.as_deref(),
                    now,
                )
            })
            .sum();

        let bucket_count = |wanted: StatusBucket| {
            orders
                .iter()
                .filter(|order| order.status_style().bucket == wanted)
                .count()
        };
        let delivered = bucket_count(StatusBucket::Delivered);
        let cancelled = bucket_count(StatusBucket::Cancelled);
        let finished = delivered + cancelled;

        SedeSummary {
            orders: count,
            revenue,
            average_ticket: if count == 0 { 0.0 } else { revenue / count as f64 },
            average_elapsed: format_elapsed(if count == 0 {
                0
            } else {
                total_elapsed / count as u64
            }),
            delivered,
            cancelled,
            success_rate: if finished == 0 {
                0.0
            } else {
                delivered as f64 * 100.0 / finished as f64
            },
        }
    }
}
