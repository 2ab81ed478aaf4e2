/// URLs of the backend routes, built from the API Gateway base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base: String,
}

impl Endpoints {
    pub fn new(base_url: &str) -> Self {
        Endpoints {
            base: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base, path)
    }

    // Autenticación
    pub fn login(&self) -> String {
        self.url("auth/login")
    }

    pub fn logout(&self) -> String {
        self.url("auth/logout")
    }

    pub fn generate_invitation(&self) -> String {
        self.url("auth/generate-invitation")
    }

    // Pedidos
    pub fn orders(&self) -> String {
        self.url("pedido/consultar")
    }

    pub fn my_assignments(&self) -> String {
        self.url("pedido/mis-asignaciones")
    }

    // Estados
    pub fn order_status(&self) -> String {
        self.url("estados/obtener")
    }

    pub fn update_status(&self) -> String {
        self.url("estados/actualizar")
    }

    pub fn transition_metrics(&self) -> String {
        self.url("estados/metricas-tiempos")
    }

    // Asignaciones
    pub fn assign(&self) -> String {
        self.url("asignaciones/asignar")
    }

    pub fn workers(&self) -> String {
        self.url("asignaciones/obtener")
    }

    // Workflow
    pub fn chef_confirm(&self) -> String {
        self.url("chef/confirma")
    }

    pub fn dispatch_confirm(&self) -> String {
        self.url("despachado/confirma")
    }

    pub fn rider_confirm(&self) -> String {
        self.url("motorizado/confirma")
    }

    // KPIs
    pub fn calculate_kpis(&self) -> String {
        self.url("kpis/calcular")
    }

    pub fn kpis(&self) -> String {
        self.url("kpis/consultar")
    }

    // Productos
    pub fn products(&self) -> String {
        self.url("producto/obtener")
    }

    pub fn product_collection(&self) -> String {
        self.url("producto")
    }

    pub fn product(&self, producto_id: &str) -> String {
        format!("{}/{}", self.product_collection(), producto_id)
    }

    // Inventario
    pub fn inventory(&self) -> String {
        self.url("inventario/consultar")
    }

    pub fn adjust_inventory(&self) -> String {
        self.url("inventario/ajustar")
    }
}
