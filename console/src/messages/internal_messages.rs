use crate::console_actors::order_monitor::Snapshot;
use actix::Message;
use common::types::dtos::MovementKind;
use common::types::staff::{AssignmentKind, StaffTier};
use common::views::WorkflowAction;

/////////////////////////////////////////////////////////////////////
// Mensajes hacia el OrderMonitor
/////////////////////////////////////////////////////////////////////

/// Vuelve a pedir los pedidos (y el personal, si es admin) al backend.
#[derive(Message, Debug, Clone, Copy)]
#[rtype(result = "()")]
pub struct Refresh;

#[derive(Message, Debug, Clone, Copy)]
#[rtype(result = "Snapshot")]
pub struct GetSnapshot;

#[derive(Message, Debug, Clone, Copy)]
#[rtype(result = "()")]
pub struct ShowOrders;

#[derive(Message, Debug, Clone, Copy)]
#[rtype(result = "()")]
pub struct ShowWorkers;

#[derive(Message, Debug, Clone)]
#[rtype(result = "()")]
pub struct AssignWorker {
    pub pedido_id: String,
    pub kind: AssignmentKind,
    pub email: String,
}

#[derive(Message, Debug, Clone)]
#[rtype(result = "()")]
pub struct RunWorkflowAction {
    pub pedido_id: String,
    pub action: WorkflowAction,
}

#[derive(Message, Debug, Clone)]
#[rtype(result = "()")]
pub struct ShowHistory {
    pub pedido_id: String,
}

#[derive(Message, Debug, Clone)]
#[rtype(result = "()")]
pub struct ShowKpis {
    /// `YYYY-MM-DD`; sin fecha el backend agrega todos los días.
    pub fecha: Option<String>,
}

#[derive(Message, Debug, Clone)]
#[rtype(result = "()")]
pub struct RecalculateKpis {
    pub fecha: Option<String>,
}

/// Cambio manual de estado; el backend valida la transición.
#[derive(Message, Debug, Clone)]
#[rtype(result = "()")]
pub struct OverrideStatus {
    pub pedido_id: String,
    pub estado: String,
    pub motivo: Option<String>,
}

#[derive(Message, Debug, Clone)]
#[rtype(result = "()")]
pub struct ChangeSede {
    pub sede: String,
}

/////////////////////////////////////////////////////////////////////
// Catálogo e inventario
/////////////////////////////////////////////////////////////////////

#[derive(Message, Debug, Clone)]
#[rtype(result = "()")]
pub struct ShowProducts {
    /// `comida`, `bebida`, ...; sin tipo se listan todos.
    pub tipo: Option<String>,
}

#[derive(Message, Debug, Clone)]
#[rtype(result = "()")]
pub struct ShowInventory {
    pub producto_id: Option<String>,
}

#[derive(Message, Debug, Clone)]
#[rtype(result = "()")]
pub struct AdjustStock {
    pub producto_id: String,
    pub kind: MovementKind,
    pub cantidad: i64,
    pub motivo: Option<String>,
}

/////////////////////////////////////////////////////////////////////
// Personal
/////////////////////////////////////////////////////////////////////

#[derive(Message, Debug, Clone)]
#[rtype(result = "()")]
pub struct InviteStaff {
    pub sede: String,
    pub tier: StaffTier,
}

/////////////////////////////////////////////////////////////////////
// Mensajes hacia el UIHandler
/////////////////////////////////////////////////////////////////////

/// Línea leída de la entrada estándar.
#[derive(Message, Debug, Clone)]
#[rtype(result = "()")]
pub struct CommandLine(pub String);
