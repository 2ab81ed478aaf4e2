//! Display-ready projections of the backend orders.
//!
//! Every screen builds its rows from here, so status labels, colors and
//! progress always come from [`normalize`].

use crate::types::dtos::{OrderDTO, WorkerDTO};
use crate::types::lifecycle::LifecycleStage;
use crate::types::order_status::{StatusBucket, StatusStyle, normalize};
use crate::types::staff::StaffTier;
use crate::utils::{elapsed_millis, format_elapsed, format_sede_name};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct OrderView {
    pub id: String,
    /// Nombre legible de la sede.
    pub sede: String,
    /// Estado tal cual llegó del backend.
    pub raw_status: String,
    pub style: StatusStyle,
    /// Etapa del ciclo de vida; `None` para pedidos cancelados.
    pub stage: Option<LifecycleStage>,
    pub progress: u8,
    /// Tiempo transcurrido como `HH:MM:SS`.
    pub elapsed: String,
    pub amount: f64,
    pub chef: Option<String>,
    pub rider: Option<String>,
    /// `cantidad x nombre` por producto.
    pub items: Vec<String>,
}

impl OrderView {
    pub fn from_order(order: &OrderDTO, now: DateTime<Utc>) -> Self {
        let style = normalize(order.estado.as_deref());
        let stage = LifecycleStage::shown_for(style.bucket);
        let progress = stage.map_or(0, LifecycleStage::progress_percent);
        let elapsed = elapsed_millis(
            order.fecha_inicio.as_deref(),
            order.fecha_fin.as_deref(),
            now,
        );
        let items = order
            .productos
            .iter()
            .enumerate()
            .map(|(idx, line)| format!("{} x {}", line.quantity(), line.display_name(idx)))
            .collect();

        OrderView {
            id: order.pedido_id.clone(),
            sede: format_sede_name(&order.tenant_id),
            raw_status: order.raw_status().to_string(),
            style,
            stage,
            progress,
            elapsed: format_elapsed(elapsed),
            amount: order.precio_total,
            chef: non_blank(order.chef_id.as_deref()),
            rider: non_blank(order.motorizado_id.as_deref()),
            items,
        }
    }

    pub fn bucket(&self) -> StatusBucket {
        self.style.bucket
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

pub fn order_views(orders: &[OrderDTO], now: DateTime<Utc>) -> Vec<OrderView> {
    orders
        .iter()
        .map(|order| OrderView::from_order(order, now))
        .collect()
}

/// Staff that can take an assignment (`trabajador` tier only).
pub fn available_workers(workers: &[WorkerDTO]) -> Vec<&WorkerDTO> {
    workers
        .iter()
        .filter(|worker| worker.tier() == Some(StaffTier::Trabajador))
        .collect()
}

pub fn available_chefs(workers: &[WorkerDTO]) -> Vec<&WorkerDTO> {
    workers_matching(workers, "chef")
}

pub fn available_riders(workers: &[WorkerDTO]) -> Vec<&WorkerDTO> {
    workers_matching(workers, "motorizado")
}

fn workers_matching<'a>(workers: &'a [WorkerDTO], role: &str) -> Vec<&'a WorkerDTO> {
    available_workers(workers)
        .into_iter()
        .filter(|worker| {
            worker.email.to_lowercase().contains(role)
                || worker.display_name().to_lowercase().contains(role)
        })
        .collect()
}

/// Workflow step a staff member may trigger on an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkflowAction {
    ChefAccept,
    ChefReject,
    ConfirmDispatch,
    ConfirmPickup,
}

impl WorkflowAction {
    pub fn label(self) -> &'static str {
        match self {
            WorkflowAction::ChefAccept => "Aceptar pedido",
            WorkflowAction::ChefReject => "Rechazar pedido",
            WorkflowAction::ConfirmDispatch => "Confirmar despacho",
            WorkflowAction::ConfirmPickup => "Confirmar recojo",
        }
    }
}

impl fmt::Display for WorkflowAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Actions offered for `order` given the user's role on it.
///
/// Only a hint for the UI: the backend validates every transition.
pub fn available_actions(order: &OrderDTO) -> Vec<WorkflowAction> {
    let estado = order.raw_status().trim().to_lowercase();
    let role = order.mi_rol;
    let mut actions = Vec::new();

    if role.es_chef && estado == "pendiente" {
        actions.push(WorkflowAction::ChefAccept);
        actions.push(WorkflowAction::ChefReject);
    }
    if !role.es_motorizado && estado == "despachando" {
        actions.push(WorkflowAction::ConfirmDispatch);
    }
    if role.es_motorizado && matches!(estado.as_str(), "despachado" | "recogiendo") {
        actions.push(WorkflowAction::ConfirmPickup);
    }
    actions
}

/// Number of orders per bucket. Buckets with no orders are left out.
pub fn status_counts(orders: &[OrderDTO]) -> BTreeMap<StatusBucketKey, usize> {
    let mut counts = BTreeMap::new();
    for order in orders {
        *counts
            .entry(StatusBucketKey(order.status_style().bucket))
            .or_insert(0) += 1;
    }
    counts
}

/// Orders [`StatusBucket`]s by their position in [`StatusBucket::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusBucketKey(pub StatusBucket);

impl StatusBucketKey {
    fn position(self) -> usize {
        StatusBucket::ALL
            .iter()
            .position(|bucket| *bucket == self.0)
            .unwrap_or(StatusBucket::ALL.len())
    }
}

impl Ord for StatusBucketKey {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.position().cmp(&other.position())
    }
}

impl PartialOrd for StatusBucketKey {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
