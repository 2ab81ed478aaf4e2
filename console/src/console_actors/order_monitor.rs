use crate::messages::internal_messages::{
    AdjustStock, AssignWorker, ChangeSede, GetSnapshot, InviteStaff, OverrideStatus,
    RecalculateKpis, Refresh, RunWorkflowAction, ShowHistory, ShowInventory, ShowKpis, ShowOrders,
    ShowProducts, ShowWorkers,
};
use crate::render;
use actix::prelude::*;
use chrono::{DateTime, Utc};
use common::api::ApiClient;
use common::error::{ApiError, ApiResult};
use common::kpis::SedeSummary;
use common::logger::Logger;
use common::constants::DEFAULT_PAGE_LIMIT;
use common::types::dtos::{
    InventoryAdjustment, OrderDTO, ProductFilters, StockLevel, WorkerDTO,
};
use common::types::order_status::StatusBucket;
use common::types::staff::{AssignmentKind, StaffTier};
use common::views::{
    OrderView, WorkflowAction, available_actions, available_chefs, available_riders,
    status_counts,
};
use std::sync::Arc;
use std::time::Duration;

/// Último estado conocido de la sede.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub orders: Vec<OrderDTO>,
    /// Personal de la sede; vacío para los trabajadores.
    pub workers: Vec<WorkerDTO>,
    pub sede: String,
    pub fetched_at: Option<DateTime<Utc>>,
}

impl Snapshot {
    /// Id, status and assignees of every order, to spot changes between polls.
    fn fingerprint(&self) -> Vec<(&str, &str, Option<&str>, Option<&str>)> {
        self.orders
            .iter()
            .map(|order| {
                (
                    order.pedido_id.as_str(),
                    order.raw_status(),
                    order.chef_id.as_deref(),
                    order.motorizado_id.as_deref(),
                )
            })
            .collect()
    }

    fn order(&self, pedido_id: &str) -> Option<&OrderDTO> {
        self.orders.iter().find(|order| order.pedido_id == pedido_id)
    }

    fn order_mut(&mut self, pedido_id: &str) -> Option<&mut OrderDTO> {
        self.orders
            .iter_mut()
            .find(|order| order.pedido_id == pedido_id)
    }

    /// Sede the order belongs to, when the backend reported one.
    fn tenant_of(&self, pedido_id: &str) -> Option<String> {
        self.order(pedido_id)
            .map(|order| order.tenant_id.trim())
            .filter(|tenant| !tenant.is_empty())
            .map(str::to_string)
    }

    /// Inserts or replaces `order` by id.
    fn upsert(&mut self, order: OrderDTO) {
        match self.order_mut(&order.pedido_id) {
            Some(known) => *known = order,
            None => self.orders.push(order),
        }
    }
}

/// Actor OrderMonitor: consulta periódicamente los pedidos de la sede y
/// ejecuta las acciones del operador contra el backend.
pub struct OrderMonitor {
    pub api: Arc<ApiClient>,
    /// Cada cuánto se vuelve a consultar.
    pub refresh_interval: Duration,
    pub snapshot: Snapshot,
    pub logger: Logger,
}

impl OrderMonitor {
    pub fn new(api: Arc<ApiClient>, refresh_interval: Duration, logger: Logger) -> Self {
        OrderMonitor {
            api,
            refresh_interval,
            snapshot: Snapshot::default(),
            logger,
        }
    }

    fn print_orders(&self) {
        let now = Utc::now();
        let rows: Vec<(OrderView, Vec<WorkflowAction>)> = self
            .snapshot
            .orders
            .iter()
            .map(|order| (OrderView::from_order(order, now), available_actions(order)))
            .collect();
        let counts = status_counts(&self.snapshot.orders);
        println!("{}", render::orders_table(&self.snapshot.sede, &rows, &counts));
    }

    fn report_error(&self, context: &str, error: &ApiError) {
        if error.requires_login() {
            self.logger
                .error(format!("{context}: {error}. Vuelve a iniciar sesión."));
        } else {
            self.logger.error(format!("{context}: {error}"));
        }
    }
}

impl Actor for OrderMonitor {
    type Context = Context<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        self.logger.info("OrderMonitor iniciado!");
        ctx.notify(Refresh);
        ctx.run_interval(self.refresh_interval, |_actor, ctx| {
            ctx.notify(Refresh);
        });
    }
}

async fn fetch_snapshot(api: Arc<ApiClient>, logger: Logger) -> ApiResult<Snapshot> {
    let session = api.session().await;
    let sede = session.tenant_for(None);

    let (orders, workers) = if session.is_admin() {
        let orders = api.orders(None).await?;
        let workers = match api.workers(None, None, Some(StaffTier::Trabajador)).await {
            Ok(workers) => workers,
            Err(e) => {
                logger.warn(format!("Could not fetch workers: {e}"));
                Vec::new()
            }
        };
        (orders, workers)
    } else {
        (api.my_assignments(None, None).await?, Vec::new())
    };

    Ok(Snapshot {
        orders,
        workers,
        sede,
        fetched_at: Some(Utc::now()),
    })
}

impl Handler<Refresh> for OrderMonitor {
    type Result = AtomicResponse<Self, ()>;

    fn handle(&mut self, _msg: Refresh, _ctx: &mut Self::Context) -> Self::Result {
        let fut = fetch_snapshot(self.api.clone(), self.logger.clone());
        AtomicResponse::new(Box::pin(fut.into_actor(self).map(
            |res, act, _ctx| match res {
                Ok(snapshot) => {
                    let changed = act.snapshot.fetched_at.is_none()
                        || act.snapshot.sede != snapshot.sede
                        || act.snapshot.fingerprint() != snapshot.fingerprint();
                    act.logger.debug(format!(
                        "Fetched {} orders for {}",
                        snapshot.orders.len(),
                        snapshot.sede
                    ));
                    act.snapshot = snapshot;
                    if changed {
                        act.print_orders();
                    }
                }
                Err(e) => act.report_error("No se pudieron actualizar los pedidos", &e),
            },
        )))
    }
}

impl Handler<GetSnapshot> for OrderMonitor {
    type Result = MessageResult<GetSnapshot>;

    fn handle(&mut self, _msg: GetSnapshot, _ctx: &mut Self::Context) -> Self::Result {
        MessageResult(self.snapshot.clone())
    }
}

impl Handler<ShowOrders> for OrderMonitor {
    type Result = ();

    fn handle(&mut self, _msg: ShowOrders, _ctx: &mut Self::Context) {
        self.print_orders();
    }
}

impl Handler<ShowWorkers> for OrderMonitor {
    type Result = ();

    fn handle(&mut self, _msg: ShowWorkers, _ctx: &mut Self::Context) {
        if self.snapshot.workers.is_empty() {
            self.logger
                .warn("No hay personal cargado (solo disponible para administradores).");
            return;
        }
        let chefs = available_chefs(&self.snapshot.workers);
        let riders = available_riders(&self.snapshot.workers);
        println!("{}", render::workers_list(&chefs, &riders));
    }
}

impl Handler<AssignWorker> for OrderMonitor {
    type Result = AtomicResponse<Self, ()>;

    fn handle(&mut self, msg: AssignWorker, _ctx: &mut Self::Context) -> Self::Result {
        let api = self.api.clone();
        let AssignWorker {
            pedido_id,
            kind,
            email,
        } = msg;
        let fut = {
            let pedido_id = pedido_id.clone();
            let email = email.clone();
            async move { api.assign_worker(&pedido_id, &email, kind, None).await }
        };
        AtomicResponse::new(Box::pin(fut.into_actor(self).map(
            move |res, act, _ctx| match res {
                Ok(ack) => {
                    act.logger.info(ack.message.unwrap_or_else(|| {
                        format!("{} asignado al pedido {}", kind, pedido_id)
                    }));
                    if let Some(order) = act.snapshot.order_mut(&pedido_id) {
                        match kind {
                            AssignmentKind::Chef => order.chef_id = Some(email),
                            AssignmentKind::Motorizado => order.motorizado_id = Some(email),
                        }
                    }
                }
                Err(e) => act.report_error(&format!("No se pudo asignar {pedido_id}"), &e),
            },
        )))
    }
}

/// Sends `action` for the order and reads it back. `tenant` is the order's
/// own sede when known.
async fn run_action(
    api: Arc<ApiClient>,
    pedido_id: String,
    action: WorkflowAction,
    tenant: Option<String>,
) -> ApiResult<(Option<String>, Option<OrderDTO>)> {
    let session = api.session().await;
    let user_id = session
        .user_id()
        .map(str::to_string)
        .ok_or(ApiError::NotLoggedIn)?;
    let tenant = tenant.as_deref();

    let ack = match action {
        WorkflowAction::ChefAccept => api.chef_confirm(&pedido_id, &user_id, true, tenant).await?,
        WorkflowAction::ChefReject => {
            api.chef_confirm(&pedido_id, &user_id, false, tenant).await?
        }
        WorkflowAction::ConfirmDispatch => api.dispatch_confirm(&pedido_id, tenant).await?,
        WorkflowAction::ConfirmPickup => api.rider_confirm(&pedido_id, &user_id, tenant).await?,
    };
    let updated = api.order_by_id(&pedido_id, tenant).await?;
    Ok((ack.message, updated))
}

impl Handler<RunWorkflowAction> for OrderMonitor {
    type Result = AtomicResponse<Self, ()>;

    fn handle(&mut self, msg: RunWorkflowAction, _ctx: &mut Self::Context) -> Self::Result {
        let RunWorkflowAction { pedido_id, action } = msg;
        let tenant = self.snapshot.tenant_of(&pedido_id);
        match self.snapshot.order(&pedido_id) {
            Some(order) if !available_actions(order).contains(&action) => {
                self.logger.warn(format!(
                    "'{}' no aparece como disponible para {}; se envía igual",
                    action, pedido_id
                ));
            }
            None => self
                .logger
                .warn(format!("{} no está en la lista actual", pedido_id)),
            _ => {}
        }

        let fut = run_action(self.api.clone(), pedido_id.clone(), action, tenant);
        AtomicResponse::new(Box::pin(fut.into_actor(self).map(
            move |res, act, _ctx| match res {
                Ok((message, updated)) => {
                    act.logger.info(
                        message.unwrap_or_else(|| format!("{} realizado en {}", action, pedido_id)),
                    );
                    if let Some(updated) = updated {
                        act.snapshot.upsert(updated);
                    }
                }
                Err(e) => act.report_error(&format!("{} falló para {}", action, pedido_id), &e),
            },
        )))
    }
}

impl Handler<ShowHistory> for OrderMonitor {
    type Result = ResponseActFuture<Self, ()>;

    fn handle(&mut self, msg: ShowHistory, _ctx: &mut Self::Context) -> Self::Result {
        let api = self.api.clone();
        let pedido_id = msg.pedido_id;
        let fut = {
            let pedido_id = pedido_id.clone();
            async move { api.order_status(&pedido_id, true, None).await }
        };
        Box::pin(fut.into_actor(self).map(move |res, act, _ctx| match res {
            Ok(status) => println!("{}", render::history_lines(&status)),
            Err(e) => act.report_error(&format!("Sin historial para {}", pedido_id), &e),
        }))
    }
}

impl Handler<ShowKpis> for OrderMonitor {
    type Result = ResponseActFuture<Self, ()>;

    fn handle(&mut self, msg: ShowKpis, _ctx: &mut Self::Context) -> Self::Result {
        let api = self.api.clone();
        let logger = self.logger.clone();
        let fecha = msg.fecha;
        let fut = async move {
            let sede = api.session().await.tenant_for(None);
            let report = api.kpis(&sede, fecha.as_deref()).await?;
            let metrics = match api.transition_metrics(&sede, fecha.as_deref()).await {
                Ok(metrics) => Some(metrics),
                Err(e) => {
                    logger.debug(format!("No transition metrics: {e}"));
                    None
                }
            };
            Ok::<_, ApiError>((report, metrics))
        };
        Box::pin(fut.into_actor(self).map(|res, act, _ctx| match res {
            Ok((report, metrics)) => {
                let summary = SedeSummary::from_orders(&act.snapshot.orders, Utc::now());
                println!("{}", render::kpi_report(&report, &summary));
                if let Some(metrics) = metrics.filter(|m| !m.is_null()) {
                    match serde_json::to_string_pretty(&metrics) {
                        Ok(text) => println!("Tiempos por estado:\n{}", text),
                        Err(e) => act.logger.warn(format!("Unreadable metrics: {e}")),
                    }
                }
            }
            Err(e) => act.report_error("No se pudieron obtener los KPIs", &e),
        }))
    }
}

impl Handler<RecalculateKpis> for OrderMonitor {
    type Result = ResponseActFuture<Self, ()>;

    fn handle(&mut self, msg: RecalculateKpis, _ctx: &mut Self::Context) -> Self::Result {
        let api = self.api.clone();
        let fecha = msg.fecha;
        let fut = async move { api.calculate_kpis(None, fecha.as_deref()).await };
        Box::pin(fut.into_actor(self).map(|res, act, _ctx| match res {
            Ok(ack) => act.logger.info(
                ack.message
                    .unwrap_or_else(|| "KPIs recalculados".to_string()),
            ),
            Err(e) => act.report_error("No se pudieron recalcular los KPIs", &e),
        }))
    }
}

impl Handler<OverrideStatus> for OrderMonitor {
    type Result = AtomicResponse<Self, ()>;

    fn handle(&mut self, msg: OverrideStatus, _ctx: &mut Self::Context) -> Self::Result {
        let OverrideStatus {
            pedido_id,
            estado,
            motivo,
        } = msg;
        if StatusBucket::classify(Some(estado.as_str())) == StatusBucket::Unknown {
            self.logger.warn(format!(
                "'{}' no es un estado conocido; se envía igual",
                estado
            ));
        }
        let tenant = self.snapshot.tenant_of(&pedido_id);
        let api = self.api.clone();
        let fut = {
            let pedido_id = pedido_id.clone();
            async move {
                let tenant = tenant.as_deref();
                let ack = api
                    .update_order_status(&pedido_id, &estado, motivo.as_deref(), tenant)
                    .await?;
                let updated = api.order_by_id(&pedido_id, tenant).await?;
                Ok::<_, ApiError>((ack.message, updated))
            }
        };
        AtomicResponse::new(Box::pin(fut.into_actor(self).map(
            move |res, act, _ctx| match res {
                Ok((message, updated)) => {
                    act.logger.info(
                        message.unwrap_or_else(|| format!("Estado de {} actualizado", pedido_id)),
                    );
                    if let Some(updated) = updated {
                        act.snapshot.upsert(updated);
                    }
                }
                Err(e) => {
                    act.report_error(&format!("No se pudo cambiar el estado de {}", pedido_id), &e)
                }
            },
        )))
    }
}

impl Handler<ShowProducts> for OrderMonitor {
    type Result = ResponseActFuture<Self, ()>;

    fn handle(&mut self, msg: ShowProducts, _ctx: &mut Self::Context) -> Self::Result {
        let api = self.api.clone();
        let filters = ProductFilters {
            tipo: msg.tipo,
            limit: Some(DEFAULT_PAGE_LIMIT),
            ..ProductFilters::default()
        };
        let fut = async move { api.products(None, &filters).await };
        Box::pin(fut.into_actor(self).map(|res, act, _ctx| match res {
            Ok(page) => println!(
                "{}",
                render::products_table(&page.items, page.pagination.has_more)
            ),
            Err(e) => act.report_error("No se pudieron obtener los productos", &e),
        }))
    }
}

impl Handler<ShowInventory> for OrderMonitor {
    type Result = ResponseActFuture<Self, ()>;

    fn handle(&mut self, msg: ShowInventory, _ctx: &mut Self::Context) -> Self::Result {
        let api = self.api.clone();
        let producto_id = msg.producto_id;
        let fut = async move {
            api.inventory(None, producto_id.as_deref(), DEFAULT_PAGE_LIMIT, None)
                .await
        };
        Box::pin(fut.into_actor(self).map(|res, act, _ctx| match res {
            Ok(page) => {
                println!("{}", render::inventory_table(&page.items));
                let short = page
                    .items
                    .iter()
                    .filter(|item| item.stock_level() != StockLevel::InStock)
                    .count();
                if short > 0 {
                    act.logger
                        .warn(format!("{} productos sin stock o bajo el mínimo", short));
                }
            }
            Err(e) => act.report_error("No se pudo obtener el inventario", &e),
        }))
    }
}

impl Handler<AdjustStock> for OrderMonitor {
    type Result = ResponseActFuture<Self, ()>;

    fn handle(&mut self, msg: AdjustStock, _ctx: &mut Self::Context) -> Self::Result {
        let api = self.api.clone();
        let AdjustStock {
            producto_id,
            kind,
            cantidad,
            motivo,
        } = msg;
        let mut adjustment = InventoryAdjustment::new(producto_id.clone(), cantidad, kind);
        if let Some(motivo) = motivo {
            adjustment = adjustment.with_reason(motivo);
        }
        let fut = async move { api.adjust_inventory(&adjustment, None).await };
        Box::pin(fut.into_actor(self).map(move |res, act, _ctx| match res {
            Ok(ack) => act.logger.info(ack.message.unwrap_or_else(|| {
                format!("{} de {} registrada para {}", kind.as_str(), cantidad, producto_id)
            })),
            Err(e) => act.report_error(&format!("No se pudo ajustar {}", producto_id), &e),
        }))
    }
}

impl Handler<InviteStaff> for OrderMonitor {
    type Result = ResponseActFuture<Self, ()>;

    fn handle(&mut self, msg: InviteStaff, _ctx: &mut Self::Context) -> Self::Result {
        let api = self.api.clone();
        let InviteStaff { sede, tier } = msg;
        let fut = {
            let sede = sede.clone();
            async move { api.generate_invitation(&sede, tier).await }
        };
        Box::pin(fut.into_actor(self).map(move |res, act, _ctx| match res {
            Ok(ack) => {
                act.logger.info(
                    ack.message
                        .unwrap_or_else(|| format!("Invitación de {} para {}", tier, sede)),
                );
                if !ack.details.is_empty() {
                    match serde_json::to_string_pretty(&ack.details) {
                        Ok(text) => println!("{}", text),
                        Err(e) => act.logger.warn(format!("Unreadable invitation: {e}")),
                    }
                }
            }
            Err(e) => act.report_error(&format!("No se pudo invitar a {}", sede), &e),
        }))
    }
}

impl Handler<ChangeSede> for OrderMonitor {
    type Result = AtomicResponse<Self, ()>;

    fn handle(&mut self, msg: ChangeSede, _ctx: &mut Self::Context) -> Self::Result {
        let api = self.api.clone();
        let sede = msg.sede;
        let fut = {
            let sede = sede.clone();
            async move { api.select_sede(&sede).await }
        };
        AtomicResponse::new(Box::pin(fut.into_actor(self).map(
            move |selected, act, ctx| {
                if selected {
                    act.logger.info(format!("Sede seleccionada: {}", sede));
                    ctx.notify(Refresh);
                } else {
                    act.logger
                        .warn(format!("Tu usuario no puede operar en la sede {}", sede));
                }
            },
        )))
    }
}
