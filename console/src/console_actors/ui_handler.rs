use crate::command::{Command, CommandError, HELP};
use crate::console_actors::order_monitor::OrderMonitor;
use crate::messages::internal_messages::{
    AdjustStock, AssignWorker, ChangeSede, CommandLine, InviteStaff, OverrideStatus,
    RecalculateKpis, Refresh, RunWorkflowAction, ShowHistory, ShowInventory, ShowKpis, ShowOrders,
    ShowProducts, ShowWorkers,
};
use actix::prelude::*;
use common::logger::Logger;
use tokio::sync::oneshot;

/// Actor UIHandler: Interfaz humano-sistema
pub struct UIHandler {
    /// Canal de envío hacia el actor `OrderMonitor`
    pub monitor: Addr<OrderMonitor>,
    pub logger: Logger,
    /// Avisa a `main` que el operador pidió salir.
    pub quit: Option<oneshot::Sender<()>>,
}

impl UIHandler {
    pub fn new(monitor: Addr<OrderMonitor>, logger: Logger, quit: oneshot::Sender<()>) -> Self {
        UIHandler {
            monitor,
            logger,
            quit: Some(quit),
        }
    }

    fn dispatch(&mut self, command: Command) {
        match command {
            Command::Help => println!("{}", HELP),
            Command::Refresh => {
                self.monitor.do_send(Refresh);
                self.monitor.do_send(ShowOrders);
            }
            Command::Orders => self.monitor.do_send(ShowOrders),
            Command::Workers => self.monitor.do_send(ShowWorkers),
            Command::Assign {
                pedido_id,
                kind,
                email,
            } => self.monitor.do_send(AssignWorker {
                pedido_id,
                kind,
                email,
            }),
            Command::Workflow { pedido_id, action } => {
                self.monitor.do_send(RunWorkflowAction { pedido_id, action })
            }
            Command::History { pedido_id } => self.monitor.do_send(ShowHistory { pedido_id }),
            Command::Kpis { fecha } => self.monitor.do_send(ShowKpis { fecha }),
            Command::KpisCalc { fecha } => self.monitor.do_send(RecalculateKpis { fecha }),
            Command::Status {
                pedido_id,
                estado,
                motivo,
            } => self.monitor.do_send(OverrideStatus {
                pedido_id,
                estado,
                motivo,
            }),
            Command::Products { tipo } => self.monitor.do_send(ShowProducts { tipo }),
            Command::Inventory { producto_id } => {
                self.monitor.do_send(ShowInventory { producto_id })
            }
            Command::Adjust {
                producto_id,
                kind,
                cantidad,
                motivo,
            } => self.monitor.do_send(AdjustStock {
                producto_id,
                kind,
                cantidad,
                motivo,
            }),
            Command::Invite { sede, tier } => self.monitor.do_send(InviteStaff { sede, tier }),
            Command::Sede { sede } => self.monitor.do_send(ChangeSede { sede }),
            Command::Quit => match self.quit.take() {
                Some(quit) => {
                    self.logger.info("Saliendo...");
                    let _ = quit.send(());
                }
                None => self.logger.debug("Quit already requested"),
            },
        }
    }
}

impl Actor for UIHandler {
    type Context = Context<Self>;

    fn started(&mut self, _ctx: &mut Self::Context) {
        self.logger.info("UIHandler iniciado!");
    }
}

impl Handler<CommandLine> for UIHandler {
    type Result = ();

    fn handle(&mut self, msg: CommandLine, _ctx: &mut Self::Context) {
        match Command::parse(&msg.0) {
            Ok(command) => self.dispatch(command),
            Err(CommandError::Empty) => {}
            Err(e) => self.logger.warn(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use colored::Color;
    use common::api::ApiClient;
    use common::config::ConsoleConfig;
    use common::session::Session;
    use std::sync::Arc;
    use std::time::Duration;

    async fn ui() -> (mockito::ServerGuard, Addr<UIHandler>, oneshot::Receiver<()>) {
        let server = mockito::Server::new_async().await;
        let config = ConsoleConfig {
            api_base_url: server.url(),
            ..ConsoleConfig::default()
        };
        // Anonymous session: the monitor's fetches fail locally without
        // reaching the server.
        let api = ApiClient::new(&config, Session::anonymous("pardo_miraflores")).unwrap();
        let logger = Logger::new("Test", Color::Green);
        let monitor =
            OrderMonitor::new(Arc::new(api), Duration::from_secs(3600), logger.clone()).start();
        let (tx, rx) = oneshot::channel();
        (server, UIHandler::new(monitor, logger, tx).start(), rx)
    }

    #[actix_rt::test]
    async fn test_quit_signals_main() {
        let (_server, ui, rx) = ui().await;
        ui.send(CommandLine("quit".to_string())).await.unwrap();
        assert!(rx.await.is_ok());
    }

    #[actix_rt::test]
    async fn test_invalid_lines_do_not_quit() {
        let (_server, ui, mut rx) = ui().await;
        for line in [
            "",
            "borrar P-1",
            "assign P-1",
            "kpis ayer",
            "adjust PR-1 merma 2",
            "invite pardo_surco cajero",
        ] {
            ui.send(CommandLine(line.to_string())).await.unwrap();
        }
        assert!(rx.try_recv().is_err());

        ui.send(CommandLine("exit".to_string())).await.unwrap();
        ui.send(CommandLine("quit".to_string())).await.unwrap();
        assert!(rx.try_recv().is_ok());
    }
}
