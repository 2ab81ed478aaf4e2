use chrono::NaiveDate;
use common::types::dtos::MovementKind;
use common::types::staff::{AssignmentKind, StaffTier};
use common::views::WorkflowAction;
use thiserror::Error;

/// A console command, as typed by the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Refresh,
    Orders,
    Workers,
    Assign {
        pedido_id: String,
        kind: AssignmentKind,
        email: String,
    },
    Workflow {
        pedido_id: String,
        action: WorkflowAction,
    },
    History {
        pedido_id: String,
    },
    Kpis {
        fecha: Option<String>,
    },
    Sede {
        sede: String,
    },
    Products {
        tipo: Option<String>,
    },
    Inventory {
        producto_id: Option<String>,
    },
    Adjust {
        producto_id: String,
        kind: MovementKind,
        cantidad: i64,
        motivo: Option<String>,
    },
    Invite {
        sede: String,
        tier: StaffTier,
    },
    Status {
        pedido_id: String,
        estado: String,
        motivo: Option<String>,
    },
    KpisCalc {
        fecha: Option<String>,
    },
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command `{0}`; type `help`")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("`{0}` is not chef or motorizado")]
    InvalidRole(String),
    #[error("`{0}` is not a YYYY-MM-DD date")]
    InvalidDate(String),
    #[error("`{0}` is not entrada, salida or ajuste")]
    InvalidMovement(String),
    #[error("`{0}` is not a whole quantity")]
    InvalidQuantity(String),
    #[error("`{0}` is not admin or trabajador")]
    InvalidTier(String),
}

fn checked_date(fecha: &str) -> Result<String, CommandError> {
    NaiveDate::parse_from_str(fecha, "%Y-%m-%d")
        .map_err(|_| CommandError::InvalidDate(fecha.to_string()))?;
    Ok(fecha.to_string())
}

/// Trailing words joined back into free text; `None` when there are none.
fn free_text(words: &[&str]) -> Option<String> {
    if words.is_empty() {
        None
    } else {
        Some(words.join(" "))
    }
}

impl Command {
    pub fn parse(line: &str) -> Result<Command, CommandError> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Err(CommandError::Empty);
        };
        let args: Vec<&str> = words.collect();
        let name = name.to_lowercase();

        match (name.as_str(), args.as_slice()) {
            ("help" | "?", []) => Ok(Command::Help),
            ("refresh", []) => Ok(Command::Refresh),
            ("orders" | "pedidos", []) => Ok(Command::Orders),
            ("workers" | "personal", []) => Ok(Command::Workers),
            ("assign", [pedido_id, role, email]) => {
                let kind = AssignmentKind::parse(role)
                    .ok_or_else(|| CommandError::InvalidRole(role.to_string()))?;
                Ok(Command::Assign {
                    pedido_id: pedido_id.to_string(),
                    kind,
                    email: email.to_string(),
                })
            }
            ("assign", _) => Err(CommandError::Usage(
                "assign <pedido> <chef|motorizado> <email>",
            )),
            ("accept" | "reject" | "dispatch" | "pickup", [pedido_id]) => {
                let action = match name.as_str() {
                    "accept" => WorkflowAction::ChefAccept,
                    "reject" => WorkflowAction::ChefReject,
                    "dispatch" => WorkflowAction::ConfirmDispatch,
                    _ => WorkflowAction::ConfirmPickup,
                };
                Ok(Command::Workflow {
                    pedido_id: pedido_id.to_string(),
                    action,
                })
            }
            ("accept" | "reject" | "dispatch" | "pickup", _) => {
                Err(CommandError::Usage("accept|reject|dispatch|pickup <pedido>"))
            }
            ("history", [pedido_id]) => Ok(Command::History {
                pedido_id: pedido_id.to_string(),
            }),
            ("history", _) => Err(CommandError::Usage("history <pedido>")),
            ("kpis", []) => Ok(Command::Kpis { fecha: None }),
            ("kpis", [fecha]) => Ok(Command::Kpis {
                fecha: Some(checked_date(fecha)?),
            }),
            ("kpis", _) => Err(CommandError::Usage("kpis [YYYY-MM-DD]")),
            ("kpis-calc", []) => Ok(Command::KpisCalc { fecha: None }),
            ("kpis-calc", [fecha]) => Ok(Command::KpisCalc {
                fecha: Some(checked_date(fecha)?),
            }),
            ("kpis-calc", _) => Err(CommandError::Usage("kpis-calc [YYYY-MM-DD]")),
            ("products" | "productos", []) => Ok(Command::Products { tipo: None }),
            ("products" | "productos", [tipo]) => Ok(Command::Products {
                tipo: Some(tipo.to_lowercase()),
            }),
            ("products" | "productos", _) => Err(CommandError::Usage("products [tipo]")),
            ("inventory" | "inventario", []) => Ok(Command::Inventory { producto_id: None }),
            ("inventory" | "inventario", [producto_id]) => Ok(Command::Inventory {
                producto_id: Some(producto_id.to_string()),
            }),
            ("inventory" | "inventario", _) => Err(CommandError::Usage("inventory [producto]")),
            ("adjust", [producto_id, kind, cantidad, motivo @ ..]) => {
                let kind = MovementKind::parse(kind)
                    .ok_or_else(|| CommandError::InvalidMovement(kind.to_string()))?;
                let cantidad = cantidad
                    .parse::<i64>()
                    .map_err(|_| CommandError::InvalidQuantity(cantidad.to_string()))?;
                Ok(Command::Adjust {
                    producto_id: producto_id.to_string(),
                    kind,
                    cantidad,
                    motivo: free_text(motivo),
                })
            }
            ("adjust", _) => Err(CommandError::Usage(
                "adjust <producto> <entrada|salida|ajuste> <cantidad> [motivo]",
            )),
            ("invite", [sede, tier]) => {
                let tier = StaffTier::parse(tier)
                    .ok_or_else(|| CommandError::InvalidTier(tier.to_string()))?;
                Ok(Command::Invite {
                    sede: sede.to_string(),
                    tier,
                })
            }
            ("invite", _) => Err(CommandError::Usage("invite <sede> <admin|trabajador>")),
            ("status", [pedido_id, estado, motivo @ ..]) => Ok(Command::Status {
                pedido_id: pedido_id.to_string(),
                estado: estado.to_string(),
                motivo: free_text(motivo),
            }),
            ("status", _) => Err(CommandError::Usage("status <pedido> <estado> [motivo]")),
            ("sede", [sede]) => Ok(Command::Sede {
                sede: sede.to_string(),
            }),
            ("sede", _) => Err(CommandError::Usage("sede <tenant_id>")),
            ("quit" | "exit", []) => Ok(Command::Quit),
            _ => Err(CommandError::Unknown(name)),
        }
    }
}

pub const HELP: &str = "\
help                                       Muestra esta ayuda
refresh                                    Vuelve a consultar los pedidos
orders                                     Lista los pedidos
workers                                    Lista chefs y motorizados disponibles
assign <pedido> <chef|motorizado> <email>  Asigna un trabajador al pedido
accept|reject <pedido>                     El chef acepta o rechaza el pedido
dispatch <pedido>                          Confirma el despacho
pickup <pedido>                            El motorizado confirma el recojo
history <pedido>                           Historial de estados del pedido
kpis [YYYY-MM-DD]                          KPIs de la sede
kpis-calc [YYYY-MM-DD]                     Recalcula los KPIs de la sede
status <pedido> <estado> [motivo]          Fuerza el estado de un pedido
products [tipo]                            Lista los productos (comida, bebida, ...)
inventory [producto]                       Stock de la sede
adjust <producto> <entrada|salida|ajuste> <cantidad> [motivo]
                                           Registra un movimiento de stock
invite <sede> <admin|trabajador>           Genera un código de invitación
sede <tenant_id>                           Cambia de sede
quit                                       Cierra sesión y sale";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(Command::parse("help"), Ok(Command::Help));
        assert_eq!(Command::parse("  REFRESH "), Ok(Command::Refresh));
        assert_eq!(Command::parse("pedidos"), Ok(Command::Orders));
        assert_eq!(Command::parse("exit"), Ok(Command::Quit));
    }

    #[test]
    fn test_parse_assign() {
        assert_eq!(
            Command::parse("assign P-1 motorizado moto.juan@pardos.pe"),
            Ok(Command::Assign {
                pedido_id: "P-1".to_string(),
                kind: AssignmentKind::Motorizado,
                email: "moto.juan@pardos.pe".to_string(),
            })
        );
        assert_eq!(
            Command::parse("assign P-1 cajero x@pardos.pe"),
            Err(CommandError::InvalidRole("cajero".to_string()))
        );
        assert!(matches!(
            Command::parse("assign P-1"),
            Err(CommandError::Usage(_))
        ));
    }

    #[test]
    fn test_parse_workflow_actions() {
        let cases = [
            ("accept P-2", WorkflowAction::ChefAccept),
            ("reject P-2", WorkflowAction::ChefReject),
            ("dispatch P-2", WorkflowAction::ConfirmDispatch),
            ("pickup P-2", WorkflowAction::ConfirmPickup),
        ];
        for (line, action) in cases {
            assert_eq!(
                Command::parse(line),
                Ok(Command::Workflow {
                    pedido_id: "P-2".to_string(),
                    action,
                })
            );
        }
        assert!(Command::parse("accept").is_err());
    }

    #[test]
    fn test_parse_kpis_validates_the_date() {
        assert_eq!(Command::parse("kpis"), Ok(Command::Kpis { fecha: None }));
        assert_eq!(
            Command::parse("kpis 2025-01-15"),
            Ok(Command::Kpis {
                fecha: Some("2025-01-15".to_string())
            })
        );
        assert_eq!(
            Command::parse("kpis 15/01/2025"),
            Err(CommandError::InvalidDate("15/01/2025".to_string()))
        );
    }

    #[test]
    fn test_parse_rejects_blank_and_unknown_lines() {
        assert_eq!(Command::parse("   "), Err(CommandError::Empty));
        assert_eq!(
            Command::parse("borrar P-1"),
            Err(CommandError::Unknown("borrar".to_string()))
        );
        assert!(Command::parse("refresh now").is_err());
    }

    #[test]
    fn test_parse_adjust_keeps_the_reason() {
        assert_eq!(
            Command::parse("adjust PR-3 salida 4 pollo quemado"),
            Ok(Command::Adjust {
                producto_id: "PR-3".to_string(),
                kind: MovementKind::Salida,
                cantidad: 4,
                motivo: Some("pollo quemado".to_string()),
            })
        );
        assert_eq!(
            Command::parse("adjust PR-3 ajuste 0"),
            Ok(Command::Adjust {
                producto_id: "PR-3".to_string(),
                kind: MovementKind::Ajuste,
                cantidad: 0,
                motivo: None,
            })
        );
        assert_eq!(
            Command::parse("adjust PR-3 merma 4"),
            Err(CommandError::InvalidMovement("merma".to_string()))
        );
        assert_eq!(
            Command::parse("adjust PR-3 entrada dos"),
            Err(CommandError::InvalidQuantity("dos".to_string()))
        );
        assert!(matches!(
            Command::parse("adjust PR-3 entrada"),
            Err(CommandError::Usage(_))
        ));
    }

    #[test]
    fn test_parse_catalog_commands() {
        assert_eq!(
            Command::parse("products Bebida"),
            Ok(Command::Products {
                tipo: Some("bebida".to_string())
            })
        );
        assert_eq!(
            Command::parse("inventario"),
            Ok(Command::Inventory { producto_id: None })
        );
        assert_eq!(
            Command::parse("inventory PR-1"),
            Ok(Command::Inventory {
                producto_id: Some("PR-1".to_string())
            })
        );
    }

    #[test]
    fn test_parse_invite() {
        assert_eq!(
            Command::parse("invite pardo_surco trabajador"),
            Ok(Command::Invite {
                sede: "pardo_surco".to_string(),
                tier: StaffTier::Trabajador,
            })
        );
        assert_eq!(
            Command::parse("invite pardo_surco cajero"),
            Err(CommandError::InvalidTier("cajero".to_string()))
        );
    }

    #[test]
    fn test_parse_status_override() {
        assert_eq!(
            Command::parse("status P-4 cancelado cliente no contesta"),
            Ok(Command::Status {
                pedido_id: "P-4".to_string(),
                estado: "cancelado".to_string(),
                motivo: Some("cliente no contesta".to_string()),
            })
        );
        assert!(Command::parse("status P-4").is_err());
    }

    #[test]
    fn test_parse_kpis_calc() {
        assert_eq!(
            Command::parse("kpis-calc"),
            Ok(Command::KpisCalc { fecha: None })
        );
        assert_eq!(
            Command::parse("kpis-calc 2025-01-32"),
            Err(CommandError::InvalidDate("2025-01-32".to_string()))
        );
    }
}
