//! REST client of the order backend.
//!
//! Every call takes its credentials and tenant from the [`Session`] the
//! client was built with; nothing is read from ambient storage.

use crate::api::endpoints::Endpoints;
use crate::config::ConsoleConfig;
use crate::constants::{DEFAULT_PAGE_LIMIT, LOCAL_LOGOUT_MESSAGE, STAFF_FRONTEND, TENANT_HEADER};
use crate::error::{ApiError, ApiResult};
use crate::logger::Logger;
use crate::session::Session;
use crate::types::dtos::{
    ActionAck, InventoryAdjustment, InventoryItemDTO, KpiReport, LoginResponse, MovementKind,
    OrderDTO, OrderStatusDTO, Page, Pagination, ProductDTO, ProductDraft, ProductFilters,
    WorkerDTO,
};
use crate::types::staff::{AssignmentKind, StaffTier};
use colored::Color;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use serde_with::{DefaultOnNull, serde_as};
use std::sync::Arc;
use tokio::sync::RwLock;

#[serde_as]
#[derive(Deserialize)]
struct OrdersEnvelope {
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pedidos: Vec<OrderDTO>,
}

#[derive(Deserialize)]
struct OrderEnvelope {
    #[serde(default)]
    pedido: Option<OrderDTO>,
}

#[serde_as]
#[derive(Deserialize)]
struct WorkersEnvelope {
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    trabajadores: Vec<WorkerDTO>,
}

#[serde_as]
#[derive(Deserialize)]
struct ProductsEnvelope {
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    productos: Vec<ProductDTO>,
    #[serde(default)]
    pagination: Option<Pagination>,
}

#[derive(Deserialize)]
struct ProductEnvelope {
    #[serde(default)]
    producto: Option<ProductDTO>,
}

#[serde_as]
#[derive(Deserialize)]
struct InventoryEnvelope {
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    inventario: Vec<InventoryItemDTO>,
    #[serde(default)]
    pagination: Option<Pagination>,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

pub struct ApiClient {
    http: reqwest::Client,
    endpoints: Endpoints,
    session: Arc<RwLock<Session>>,
    default_sede: String,
    logger: Logger,
}

impl ApiClient {
    pub fn new(config: &ConsoleConfig, session: Session) -> ApiResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()?;
        Ok(ApiClient {
            http,
            endpoints: Endpoints::new(&config.api_base_url),
            session: Arc::new(RwLock::new(session)),
            default_sede: config.default_sede.clone(),
            logger: Logger::new("Api", Color::Blue).with_level(config.log_level),
        })
    }

    /// Copy of the current session.
    pub async fn session(&self) -> Session {
        self.session.read().await.clone()
    }

    pub async fn select_sede(&self, sede: &str) -> bool {
        self.session.write().await.select_sede(sede)
    }

    /// Request carrying the bearer token and the tenant header.
    async fn authorized(
        &self,
        method: Method,
        url: &str,
        tenant: Option<&str>,
    ) -> ApiResult<RequestBuilder> {
        let session = self.session.read().await;
        let token = session.token.as_deref().ok_or(ApiError::NotLoggedIn)?;
        Ok(self
            .http
            .request(method, url)
            .header(CONTENT_TYPE, "application/json")
            .header(TENANT_HEADER, session.tenant_for(tenant))
            .bearer_auth(token))
    }

    async fn body_tenant(&self, explicit: Option<&str>) -> String {
        self.session.read().await.body_tenant(explicit)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        endpoint: &str,
    ) -> ApiResult<T> {
        self.logger.debug(format!("Request to {endpoint}"));
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|error| error.message)
                .unwrap_or_else(|| format!("Error en {endpoint}"));
            self.logger
                .warn(format!("{endpoint} answered {status}: {message}"));
            if status == StatusCode::UNAUTHORIZED {
                return Err(ApiError::Unauthorized(message));
            }
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let payload = if body.trim().is_empty() { "{}" } else { body.as_str() };
        serde_json::from_str(payload).map_err(|source| ApiError::Decode {
            endpoint: endpoint.to_string(),
            source,
        })
    }

    // ---------------- Autenticación ---------------- //

    /// Logs a staff member in and replaces the session with the new one.
    ///
    /// `tenant_id_sede` is `None` for the general admin.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        tenant_id_sede: Option<&str>,
    ) -> ApiResult<LoginResponse> {
        let body = json!({
            "email": email,
            "password": password,
            "frontend_type": STAFF_FRONTEND,
            "tenant_id_sede": tenant_id_sede,
        });
        let builder = self
            .http
            .post(self.endpoints.login())
            .header(CONTENT_TYPE, "application/json")
            .json(&body);
        let response: LoginResponse = self.send(builder, "auth/login").await?;
        if response.token.is_none() {
            return Err(ApiError::Unauthorized(
                response
                    .message
                    .clone()
                    .unwrap_or_else(|| "Error en login".to_string()),
            ));
        }

        let session = Session::from_login(&response, &self.default_sede);
        self.logger.info(format!(
            "Logged in as {} on {}",
            email, session.selected_sede
        ));
        *self.session.write().await = session;
        Ok(response)
    }

    /// Closes the session. The local session is cleared even when the
    /// backend call fails.
    pub async fn logout(&self) -> String {
        let result: ApiResult<ActionAck> =
            match self.authorized(Method::POST, &self.endpoints.logout(), None).await {
                Ok(builder) => self.send(builder, "auth/logout").await,
                Err(e) => Err(e),
            };
        self.session.write().await.clear(&self.default_sede);

        match result {
            Ok(ack) => ack
                .message
                .unwrap_or_else(|| LOCAL_LOGOUT_MESSAGE.to_string()),
            Err(e) => {
                self.logger
                    .warn(format!("Logout failed ({e}); session cleared locally"));
                LOCAL_LOGOUT_MESSAGE.to_string()
            }
        }
    }

    pub async fn generate_invitation(
        &self,
        tenant_id_sede: &str,
        staff_tier: StaffTier,
    ) -> ApiResult<ActionAck> {
        let body = json!({
            "tenant_id_sede": tenant_id_sede,
            "staff_tier": staff_tier,
        });
        let builder = self
            .authorized(Method::POST, &self.endpoints.generate_invitation(), None)
            .await?
            .json(&body);
        self.send(builder, "auth/generate-invitation").await
    }

    // ---------------- Pedidos ---------------- //

    /// All orders of a sede (admins).
    pub async fn orders(&self, tenant: Option<&str>) -> ApiResult<Vec<OrderDTO>> {
        let builder = self
            .authorized(Method::GET, &self.endpoints.orders(), tenant)
            .await?;
        let envelope: OrdersEnvelope = self.send(builder, "pedido/consultar").await?;
        Ok(envelope.pedidos)
    }

    pub async fn order_by_id(
        &self,
        pedido_id: &str,
        tenant: Option<&str>,
    ) -> ApiResult<Option<OrderDTO>> {
        let builder = self
            .authorized(Method::GET, &self.endpoints.orders(), tenant)
            .await?
            .query(&[("pedido_id", pedido_id)]);
        let envelope: OrderEnvelope = self.send(builder, "pedido/consultar").await?;
        Ok(envelope.pedido)
    }

    /// Orders assigned to the logged-in worker; `kind` narrows the role.
    pub async fn my_assignments(
        &self,
        kind: Option<AssignmentKind>,
        tenant: Option<&str>,
    ) -> ApiResult<Vec<OrderDTO>> {
        let mut builder = self
            .authorized(Method::GET, &self.endpoints.my_assignments(), tenant)
            .await?;
        if let Some(kind) = kind {
            builder = builder.query(&[("tipo", kind.as_str())]);
        }
        let envelope: OrdersEnvelope = self.send(builder, "pedido/mis-asignaciones").await?;
        Ok(envelope.pedidos)
    }

    // ---------------- Asignaciones ---------------- //

    pub async fn assign_worker(
        &self,
        pedido_id: &str,
        trabajador_email: &str,
        kind: AssignmentKind,
        tenant: Option<&str>,
    ) -> ApiResult<ActionAck> {
        if trabajador_email.trim().is_empty() {
            return Err(ApiError::InvalidArgument(
                "trabajador_email is empty".to_string(),
            ));
        }
        let body = json!({
            "tenant_id": self.body_tenant(tenant).await,
            "pedido_id": pedido_id,
            "trabajador_email": trabajador_email,
            "tipo_asignacion": kind,
        });
        let builder = self
            .authorized(Method::POST, &self.endpoints.assign(), tenant)
            .await?
            .json(&body);
        self.send(builder, "asignaciones/asignar").await
    }

    /// Staff of a sede, optionally filtered by email and tier.
    pub async fn workers(
        &self,
        tenant_id_sede: Option<&str>,
        email: Option<&str>,
        staff_tier: Option<StaffTier>,
    ) -> ApiResult<Vec<WorkerDTO>> {
        let mut query = vec![("tenant_id_sede", self.body_tenant(tenant_id_sede).await)];
        if let Some(email) = email {
            query.push(("email", email.to_string()));
        }
        if let Some(tier) = staff_tier {
            query.push(("staff_tier", tier.as_str().to_string()));
        }
        let builder = self
            .authorized(Method::GET, &self.endpoints.workers(), None)
            .await?
            .query(&query);
        let envelope: WorkersEnvelope = self.send(builder, "asignaciones/obtener").await?;
        Ok(envelope.trabajadores)
    }

    // ---------------- Estados ---------------- //

    pub async fn order_status(
        &self,
        pedido_id: &str,
        include_history: bool,
        tenant: Option<&str>,
    ) -> ApiResult<OrderStatusDTO> {
        let mut query = vec![("pedido_id", pedido_id)];
        if include_history {
            query.push(("incluir_historial", "true"));
        }
        let builder = self
            .authorized(Method::GET, &self.endpoints.order_status(), tenant)
            .await?
            .query(&query);
        self.send(builder, "estados/obtener").await
    }

    /// Manual status override. The backend validates the transition.
    pub async fn update_order_status(
        &self,
        pedido_id: &str,
        estado: &str,
        motivo: Option<&str>,
        tenant: Option<&str>,
    ) -> ApiResult<ActionAck> {
        let mut body = json!({
            "tenant_id": self.body_tenant(tenant).await,
            "pedido_id": pedido_id,
            "estado": estado,
        });
        if let Some(motivo) = motivo {
            body["motivo"] = json!(motivo);
        }
        let builder = self
            .authorized(Method::POST, &self.endpoints.update_status(), tenant)
            .await?
            .json(&body);
        self.send(builder, "estados/actualizar").await
    }

    pub async fn transition_metrics(&self, sede: &str, fecha: Option<&str>) -> ApiResult<Value> {
        let builder = self
            .authorized(Method::GET, &self.endpoints.transition_metrics(), Some(sede))
            .await?
            .query(&kpi_query(sede, fecha));
        self.send(builder, "estados/metricas-tiempos").await
    }

    // ---------------- Workflow ---------------- //

    /// Chef accepts (`approved`) or rejects a pending order.
    pub async fn chef_confirm(
        &self,
        pedido_id: &str,
        chef_id: &str,
        approved: bool,
        tenant: Option<&str>,
    ) -> ApiResult<ActionAck> {
        let body = json!({
            "tenant_id": self.body_tenant(tenant).await,
            "pedido_id": pedido_id,
            "chef_id": chef_id,
            "aprobado": approved,
        });
        let builder = self
            .authorized(Method::POST, &self.endpoints.chef_confirm(), tenant)
            .await?
            .json(&body);
        self.send(builder, "chef/confirma").await
    }

    pub async fn dispatch_confirm(
        &self,
        pedido_id: &str,
        tenant: Option<&str>,
    ) -> ApiResult<ActionAck> {
        let body = json!({
            "tenant_id": self.body_tenant(tenant).await,
            "pedido_id": pedido_id,
        });
        let builder = self
            .authorized(Method::POST, &self.endpoints.dispatch_confirm(), tenant)
            .await?
            .json(&body);
        self.send(builder, "despachado/confirma").await
    }

    /// Rider confirms the pickup; the order goes on its way.
    pub async fn rider_confirm(
        &self,
        pedido_id: &str,
        motorizado_id: &str,
        tenant: Option<&str>,
    ) -> ApiResult<ActionAck> {
        let body = json!({
            "tenant_id": self.body_tenant(tenant).await,
            "pedido_id": pedido_id,
            "motorizado_id": motorizado_id,
        });
        let builder = self
            .authorized(Method::POST, &self.endpoints.rider_confirm(), tenant)
            .await?
            .json(&body);
        self.send(builder, "motorizado/confirma").await
    }

    // ---------------- KPIs ---------------- //

    /// KPIs of a sede; without `fecha` the backend aggregates every day.
    pub async fn kpis(&self, sede: &str, fecha: Option<&str>) -> ApiResult<KpiReport> {
        let builder = self
            .authorized(Method::GET, &self.endpoints.kpis(), Some(sede))
            .await?
            .query(&kpi_query(sede, fecha));
        let mut report: KpiReport = self.send(builder, "kpis/consultar").await?;
        if report.tenant_id.is_empty() {
            report.tenant_id = sede.to_string();
        }
        if report.fecha.is_none() {
            report.fecha = fecha.map(str::to_string);
        }
        Ok(report)
    }

    pub async fn calculate_kpis(
        &self,
        tenant: Option<&str>,
        fecha: Option<&str>,
    ) -> ApiResult<ActionAck> {
        let mut body = json!({ "tenant_id": self.body_tenant(tenant).await });
        if let Some(fecha) = fecha {
            body["fecha"] = json!(fecha);
        }
        let builder = self
            .authorized(Method::POST, &self.endpoints.calculate_kpis(), tenant)
            .await?
            .json(&body);
        self.send(builder, "kpis/calcular").await
    }

    // ---------------- Productos ---------------- //

    pub async fn products(
        &self,
        tenant: Option<&str>,
        filters: &ProductFilters,
    ) -> ApiResult<Page<ProductDTO>> {
        let builder = self
            .authorized(Method::GET, &self.endpoints.products(), tenant)
            .await?
            .query(&filters.to_query());
        let envelope: ProductsEnvelope = self.send(builder, "producto/obtener").await?;
        let limit = filters.limit.unwrap_or(DEFAULT_PAGE_LIMIT);
        Ok(Page {
            items: envelope.productos,
            pagination: envelope
                .pagination
                .unwrap_or_else(|| Pagination::last_page(limit)),
        })
    }

    pub async fn product_by_id(
        &self,
        producto_id: &str,
        tenant: Option<&str>,
    ) -> ApiResult<Option<ProductDTO>> {
        let builder = self
            .authorized(Method::GET, &self.endpoints.product(producto_id), tenant)
            .await?;
        let envelope: ProductEnvelope = self.send(builder, "producto").await?;
        Ok(envelope.producto)
    }

    pub async fn create_product(
        &self,
        draft: &ProductDraft,
        tenant: Option<&str>,
    ) -> ApiResult<ActionAck> {
        validate_draft(draft)?;
        let builder = self
            .authorized(Method::POST, &self.endpoints.product_collection(), tenant)
            .await?
            .json(draft);
        self.send(builder, "producto").await
    }

    pub async fn update_product(
        &self,
        producto_id: &str,
        draft: &ProductDraft,
        tenant: Option<&str>,
    ) -> ApiResult<ActionAck> {
        validate_draft(draft)?;
        let builder = self
            .authorized(Method::PUT, &self.endpoints.product(producto_id), tenant)
            .await?
            .json(draft);
        self.send(builder, "producto").await
    }

    pub async fn delete_product(
        &self,
        producto_id: &str,
        tenant: Option<&str>,
    ) -> ApiResult<ActionAck> {
        let builder = self
            .authorized(Method::DELETE, &self.endpoints.product(producto_id), tenant)
            .await?;
        self.send(builder, "producto").await
    }

    // ---------------- Inventario ---------------- //

    pub async fn inventory(
        &self,
        tenant: Option<&str>,
        producto_id: Option<&str>,
        limit: u32,
        cursor: Option<&str>,
    ) -> ApiResult<Page<InventoryItemDTO>> {
        let mut body = json!({});
        if let Some(producto_id) = producto_id {
            body["producto_id"] = json!(producto_id);
        }
        if limit > 0 {
            body["limit"] = json!(limit);
        }
        if let Some(cursor) = cursor {
            body["cursor"] = json!(cursor);
        }
        let builder = self
            .authorized(Method::POST, &self.endpoints.inventory(), tenant)
            .await?
            .json(&body);
        let envelope: InventoryEnvelope = self.send(builder, "inventario/consultar").await?;
        Ok(Page {
            items: envelope.inventario,
            pagination: envelope
                .pagination
                .unwrap_or_else(|| Pagination::last_page(limit)),
        })
    }

    pub async fn adjust_inventory(
        &self,
        adjustment: &InventoryAdjustment,
        tenant: Option<&str>,
    ) -> ApiResult<ActionAck> {
        let valid = match adjustment.tipo_movimiento {
            MovementKind::Entrada | MovementKind::Salida => adjustment.cantidad > 0,
            MovementKind::Ajuste => adjustment.cantidad >= 0,
        };
        if !valid {
            return Err(ApiError::InvalidArgument(format!(
                "cantidad {} is not valid for {:?}",
                adjustment.cantidad, adjustment.tipo_movimiento
            )));
        }
        let builder = self
            .authorized(Method::POST, &self.endpoints.adjust_inventory(), tenant)
            .await?
            .json(adjustment);
        self.send(builder, "inventario/ajustar").await
    }
}

fn kpi_query(sede: &str, fecha: Option<&str>) -> Vec<(&'static str, String)> {
    let mut query = vec![("tenant_id", sede.to_string())];
    if let Some(fecha) = fecha {
        query.push(("fecha", fecha.to_string()));
    }
    query
}

fn validate_draft(draft: &ProductDraft) -> ApiResult<()> {
    if draft.nombre_producto.trim().is_empty() {
        return Err(ApiError::InvalidArgument(
            "nombre_producto is empty".to_string(),
        ));
    }
    if !draft.precio_producto.is_finite() || draft.precio_producto < 0.0 {
        return Err(ApiError::InvalidArgument(format!(
            "precio_producto {} is not a valid price",
            draft.precio_producto
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::dtos::UserDTO;
    use crate::types::order_status::StatusBucket;
    use mockito::Matcher;
    use std::time::Duration;

    fn config_for(server: &mockito::ServerGuard) -> ConsoleConfig {
        ConsoleConfig {
            api_base_url: server.url(),
            http_timeout: Duration::from_secs(5),
            ..ConsoleConfig::default()
        }
    }

    fn admin_session() -> Session {
        Session {
            token: Some("test_jwt".to_string()),
            user: Some(UserDTO {
                user_id: "admin-1".to_string(),
                email: "admin@pardos.pe".to_string(),
                staff_tier: Some("admin".to_string()),
                ..UserDTO::default()
            }),
            selected_sede: "pardo_miraflores".to_string(),
        }
    }

    fn client_for(server: &mockito::ServerGuard, session: Session) -> ApiClient {
        ApiClient::new(&config_for(server), session).unwrap()
    }

    #[tokio::test]
    async fn login_stores_the_new_session() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/auth/login")
            .match_body(Matcher::PartialJson(json!({
                "email": "chef@pardos.pe",
                "frontend_type": "staff",
                "tenant_id_sede": "pardo_surco",
            })))
            .with_status(200)
            .with_body(
                r#"{"token":"jwt-123","user":{"user_id":"u-7","email":"chef@pardos.pe","staff_tier":"trabajador","tenant_id_sede":"pardo_surco"}}"#,
            )
            .create_async()
            .await;

        let client = client_for(&server, Session::anonymous("pardo_miraflores"));
        let response = client
            .login("chef@pardos.pe", "secret", Some("pardo_surco"))
            .await
            .unwrap();
        assert_eq!(response.token.as_deref(), Some("jwt-123"));

        let session = client.session().await;
        assert_eq!(session.token.as_deref(), Some("jwt-123"));
        assert_eq!(session.selected_sede, "pardo_surco");
        assert_eq!(session.user_id(), Some("u-7"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn login_failure_uses_backend_message() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/auth/login")
            .with_status(401)
            .with_body(r#"{"message":"Credenciales inválidas"}"#)
            .create_async()
            .await;

        let client = client_for(&server, Session::anonymous("pardo_miraflores"));
        let err = client.login("x@pardos.pe", "bad", None).await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(ref m) if m == "Credenciales inválidas"));
        assert!(err.requires_login());
        assert!(!client.session().await.is_logged_in());
    }

    #[tokio::test]
    async fn orders_send_token_and_tenant() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/pedido/consultar")
            .match_header("authorization", "Bearer test_jwt")
            .match_header("x-tenant-id", "pardo_surco")
            .with_status(200)
            .with_body(
                r#"{"pedidos":[{"pedido_id":"P-1","tenant_id":"pardo_surco","estado":"en_camino"},{"pedido_id":"P-2","tenant_id":"pardo_surco","estado":"PENDIENTE"}]}"#,
            )
            .create_async()
            .await;

        let client = client_for(&server, admin_session());
        let orders = client.orders(Some("pardo_surco")).await.unwrap();
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].status_style().bucket, StatusBucket::EnRoute);
        assert_eq!(orders[1].status_style().bucket, StatusBucket::Pending);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn null_order_list_is_empty() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/pedido/consultar")
            .with_status(200)
            .with_body(r#"{"pedidos":null}"#)
            .create_async()
            .await;

        let client = client_for(&server, admin_session());
        assert!(client.orders(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn calls_without_token_never_reach_the_backend() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/pedido/consultar")
            .expect(0)
            .create_async()
            .await;

        let client = client_for(&server, Session::anonymous("pardo_miraflores"));
        let err = client.orders(None).await.unwrap_err();
        assert!(matches!(err, ApiError::NotLoggedIn));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn order_by_id_sends_the_id_as_query() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/pedido/consultar")
            .match_query(Matcher::UrlEncoded("pedido_id".into(), "P-42".into()))
            .with_status(200)
            .with_body(r#"{"pedido":{"pedido_id":"P-42","estado":"entregado"}}"#)
            .create_async()
            .await;

        let client = client_for(&server, admin_session());
        let order = client.order_by_id("P-42", None).await.unwrap().unwrap();
        assert_eq!(order.pedido_id, "P-42");
        assert_eq!(order.status_style().bucket, StatusBucket::Delivered);
    }

    #[tokio::test]
    async fn assign_worker_defaults_tenant_to_selected_sede() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/asignaciones/asignar")
            .match_body(Matcher::Json(json!({
                "tenant_id": "pardo_miraflores",
                "pedido_id": "P-1",
                "trabajador_email": "chef.luis@pardos.pe",
                "tipo_asignacion": "chef",
            })))
            .with_status(200)
            .with_body(r#"{"message":"Trabajador asignado"}"#)
            .create_async()
            .await;

        let client = client_for(&server, admin_session());
        let ack = client
            .assign_worker("P-1", "chef.luis@pardos.pe", AssignmentKind::Chef, None)
            .await
            .unwrap();
        assert_eq!(ack.message.as_deref(), Some("Trabajador asignado"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn backend_errors_carry_status_and_message() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chef/confirma")
            .with_status(409)
            .with_body(r#"{"message":"El pedido ya fue aceptado"}"#)
            .create_async()
            .await;

        let client = client_for(&server, admin_session());
        let err = client
            .chef_confirm("P-1", "chef-1", true, None)
            .await
            .unwrap_err();
        match err {
            ApiError::Status { status, message } => {
                assert_eq!(status, 409);
                assert_eq!(message, "El pedido ya fue aceptado");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn errors_without_message_name_the_endpoint() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/despachado/confirma")
            .with_status(500)
            .with_body("Internal Server Error")
            .create_async()
            .await;

        let client = client_for(&server, admin_session());
        let err = client.dispatch_confirm("P-1", None).await.unwrap_err();
        assert!(matches!(err, ApiError::Status { status: 500, ref message } if message == "Error en despachado/confirma"));
    }

    #[tokio::test]
    async fn invalid_json_is_a_decode_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/pedido/mis-asignaciones")
            .match_query(Matcher::UrlEncoded("tipo".into(), "motorizado".into()))
            .with_status(200)
            .with_body("{not json")
            .create_async()
            .await;

        let client = client_for(&server, admin_session());
        let err = client
            .my_assignments(Some(AssignmentKind::Motorizado), None)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Decode { ref endpoint, .. } if endpoint == "pedido/mis-asignaciones"));
    }

    #[tokio::test]
    async fn logout_clears_session_even_when_backend_fails() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/auth/logout")
            .with_status(500)
            .create_async()
            .await;

        let client = client_for(&server, admin_session());
        let message = client.logout().await;
        assert_eq!(message, LOCAL_LOGOUT_MESSAGE);
        assert_eq!(
            client.session().await,
            Session::anonymous(crate::constants::DEFAULT_SEDE)
        );
    }

    #[tokio::test]
    async fn kpis_fill_in_tenant_and_date() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/kpis/consultar")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("tenant_id".into(), "pardo_surco".into()),
                Matcher::UrlEncoded("fecha".into(), "2025-01-15".into()),
            ]))
            .match_header("x-tenant-id", "pardo_surco")
            .with_status(200)
            .with_body(r#"{"numero_pedidos":3,"ingresos_dia":150.5}"#)
            .create_async()
            .await;

        let client = client_for(&server, admin_session());
        let report = client.kpis("pardo_surco", Some("2025-01-15")).await.unwrap();
        assert_eq!(report.tenant_id, "pardo_surco");
        assert_eq!(report.fecha.as_deref(), Some("2025-01-15"));
        assert_eq!(report.numero_pedidos, 3);
        assert_eq!(report.tasa_exito, 0.0);
    }

    #[tokio::test]
    async fn workers_query_selected_sede_and_tier() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/asignaciones/obtener")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("tenant_id_sede".into(), "pardo_miraflores".into()),
                Matcher::UrlEncoded("staff_tier".into(), "trabajador".into()),
            ]))
            .with_status(200)
            .with_body(
                r#"{"trabajadores":[{"user_id":"w-1","email":"motorizado.juan@pardos.pe","staff_tier":"trabajador"}]}"#,
            )
            .create_async()
            .await;

        let client = client_for(&server, admin_session());
        let workers = client
            .workers(None, None, Some(StaffTier::Trabajador))
            .await
            .unwrap();
        assert_eq!(workers.len(), 1);
        assert_eq!(workers[0].display_name(), "motorizado.juan");
    }

    #[tokio::test]
    async fn products_default_pagination() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/producto/obtener")
            .match_query(Matcher::UrlEncoded("limit".into(), "5".into()))
            .with_status(200)
            .with_body(r#"{"productos":[{"producto_id":"PR-1","nombre_producto":"1/4 Pollo","precio_producto":25.9}]}"#)
            .create_async()
            .await;

        let client = client_for(&server, admin_session());
        let filters = ProductFilters {
            limit: Some(5),
            ..ProductFilters::default()
        };
        let page = client.products(None, &filters).await.unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.pagination, Pagination::last_page(5));
    }

    #[tokio::test]
    async fn order_history_is_requested_when_asked() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/estados/obtener")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("pedido_id".into(), "P-5".into()),
                Matcher::UrlEncoded("incluir_historial".into(), "true".into()),
            ]))
            .with_status(200)
            .with_body(
                r#"{"pedido_id":"P-5","estado":"preparando","historial":[{"estado_anterior":null,"estado_nuevo":"pendiente"},{"estado_anterior":"pendiente","estado_nuevo":"preparando"}]}"#,
            )
            .create_async()
            .await;

        let client = client_for(&server, admin_session());
        let status = client.order_status("P-5", true, None).await.unwrap();
        assert_eq!(status.historial.len(), 2);
        assert_eq!(
            status.historial[1].estado_nuevo.as_deref(),
            Some("preparando")
        );
    }

    #[tokio::test]
    async fn invalid_adjustments_are_rejected_locally() {
        let server = mockito::Server::new_async().await;
        let client = client_for(&server, admin_session());
        let adjustment = InventoryAdjustment::new("PR-1", 0, MovementKind::Entrada);
        let err = client.adjust_inventory(&adjustment, None).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn invalid_product_drafts_are_rejected_locally() {
        let server = mockito::Server::new_async().await;
        let client = client_for(&server, admin_session());
        let draft = ProductDraft {
            nombre_producto: "  ".to_string(),
            descripcion: String::new(),
            precio_producto: 10.0,
            tipo: "comida".to_string(),
            is_active: true,
        };
        let err = client.create_product(&draft, None).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn status_override_sends_reason_only_when_given() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/estados/actualizar")
            .match_body(Matcher::Json(json!({
                "tenant_id": "pardo_miraflores",
                "pedido_id": "P-7",
                "estado": "cancelado",
                "motivo": "Cliente no contesta",
            })))
            .with_status(200)
            .with_body(r#"{"message":"Estado actualizado","estado":"cancelado"}"#)
            .create_async()
            .await;

        let client = client_for(&server, admin_session());
        let ack = client
            .update_order_status("P-7", "cancelado", Some("Cliente no contesta"), None)
            .await
            .unwrap();
        assert_eq!(ack.details["estado"], "cancelado");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn rider_confirm_sends_the_rider() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/motorizado/confirma")
            .match_header("x-tenant-id", "pardo_surco")
            .match_body(Matcher::Json(json!({
                "tenant_id": "pardo_surco",
                "pedido_id": "P-8",
                "motorizado_id": "moto-3",
            })))
            .with_status(200)
            .with_body("")
            .create_async()
            .await;

        let client = client_for(&server, admin_session());
        let ack = client
            .rider_confirm("P-8", "moto-3", Some("pardo_surco"))
            .await
            .unwrap();
        assert_eq!(ack, ActionAck::default());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn invitation_and_kpi_recalculation_bodies() {
        let mut server = mockito::Server::new_async().await;
        let invitation = server
            .mock("POST", "/auth/generate-invitation")
            .match_body(Matcher::Json(json!({
                "tenant_id_sede": "pardo_surco",
                "staff_tier": "trabajador",
            })))
            .with_status(200)
            .with_body(r#"{"message":"ok","codigo":"INV-123"}"#)
            .create_async()
            .await;
        let calculate = server
            .mock("POST", "/kpis/calcular")
            .match_body(Matcher::Json(json!({ "tenant_id": "pardo_miraflores" })))
            .with_status(200)
            .with_body(r#"{"message":"KPIs calculados"}"#)
            .create_async()
            .await;

        let client = client_for(&server, admin_session());
        let ack = client
            .generate_invitation("pardo_surco", StaffTier::Trabajador)
            .await
            .unwrap();
        assert_eq!(ack.details["codigo"], "INV-123");
        client.calculate_kpis(None, None).await.unwrap();
        invitation.assert_async().await;
        calculate.assert_async().await;
    }

    #[tokio::test]
    async fn inventory_page_and_adjustment() {
        let mut server = mockito::Server::new_async().await;
        let listing = server
            .mock("POST", "/inventario/consultar")
            .match_body(Matcher::Json(json!({ "limit": 10, "cursor": "abc" })))
            .with_status(200)
            .with_body(
                r#"{"inventario":[{"producto_id":"PR-1","stock_actual":3,"stock_minimo":5}],"pagination":{"limit":10,"has_more":true,"next_cursor":"def"}}"#,
            )
            .create_async()
            .await;
        let adjust = server
            .mock("POST", "/inventario/ajustar")
            .match_body(Matcher::Json(json!({
                "producto_id": "PR-1",
                "cantidad": 20,
                "tipo_movimiento": "entrada",
                "reason": "Ajuste manual",
            })))
            .with_status(200)
            .with_body(r#"{"message":"Inventario actualizado"}"#)
            .create_async()
            .await;

        let client = client_for(&server, admin_session());
        let page = client.inventory(None, None, 10, Some("abc")).await.unwrap();
        assert_eq!(page.items.len(), 1);
        assert!(page.pagination.has_more);
        assert_eq!(page.pagination.next_cursor.as_deref(), Some("def"));

        let adjustment = InventoryAdjustment::new("PR-1", 20, MovementKind::Entrada);
        client.adjust_inventory(&adjustment, None).await.unwrap();
        listing.assert_async().await;
        adjust.assert_async().await;
    }

    #[tokio::test]
    async fn product_lookup_update_and_delete() {
        let mut server = mockito::Server::new_async().await;
        let get = server
            .mock("GET", "/producto/PR-4")
            .with_status(200)
            .with_body(r#"{"producto":{"producto_id":"PR-4","nombre_producto":"Chicha","is_active":false}}"#)
            .create_async()
            .await;
        let put = server
            .mock("PUT", "/producto/PR-4")
            .match_body(Matcher::PartialJson(json!({ "precio_producto": 8.5 })))
            .with_status(200)
            .with_body(r#"{"message":"Producto actualizado"}"#)
            .create_async()
            .await;
        let delete = server
            .mock("DELETE", "/producto/PR-4")
            .with_status(200)
            .with_body(r#"{"message":"Producto eliminado"}"#)
            .create_async()
            .await;

        let client = client_for(&server, admin_session());
        let product = client.product_by_id("PR-4", None).await.unwrap().unwrap();
        assert!(!product.is_active());

        let draft = ProductDraft {
            nombre_producto: "Chicha".to_string(),
            descripcion: "Chicha morada 1L".to_string(),
            precio_producto: 8.5,
            tipo: "bebida".to_string(),
            is_active: true,
        };
        client.update_product("PR-4", &draft, None).await.unwrap();
        let ack = client.delete_product("PR-4", None).await.unwrap();
        assert_eq!(ack.message.as_deref(), Some("Producto eliminado"));
        get.assert_async().await;
        put.assert_async().await;
        delete.assert_async().await;
    }
}
