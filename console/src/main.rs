mod command;
mod console_actors;
mod messages;
mod render;

use crate::console_actors::order_monitor::OrderMonitor;
use crate::console_actors::ui_handler::UIHandler;
use crate::messages::internal_messages::CommandLine;
use actix::prelude::*;
use colored::Color;
use common::api::ApiClient;
use common::config::ConsoleConfig;
use common::logger::Logger;
use common::session::Session;
use common::utils::print_welcome_message;
use std::env;
use std::io;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal::ctrl_c;
use tokio::sync::oneshot;

/// Forwards every stdin line to the UI; end of input counts as `quit`.
async fn read_commands(ui: Addr<UIHandler>, logger: Logger) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => ui.do_send(CommandLine(line)),
            Ok(None) => {
                ui.do_send(CommandLine("quit".to_string()));
                break;
            }
            Err(e) => {
                logger.error(format!("Error while reading input: {}", e));
                ui.do_send(CommandLine("quit".to_string()));
                break;
            }
        }
    }
}

#[actix::main]
async fn main() -> io::Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!("Uso: {} <email> <password> [sede]", args[0]);
        std::process::exit(1);
    }
    let email = &args[1];
    let password = &args[2];
    let sede = args.get(3).map(String::as_str);

    let config = ConsoleConfig::from_env();
    let logger = Logger::new("Console", Color::Green).with_level(config.log_level);
    print_welcome_message();
    logger.debug(format!("Using backend {}", config.api_base_url));

    let api = ApiClient::new(&config, Session::anonymous(config.default_sede.as_str()))
        .map_err(io::Error::other)?;
    let api = Arc::new(api);

    if let Err(e) = api.login(email, password, sede).await {
        logger.error(format!("Login failed: {}", e));
        return Err(io::Error::other(e));
    }

    let monitor = OrderMonitor::new(
        api.clone(),
        config.refresh_interval,
        logger.named("Monitor"),
    )
    .start();
    let (quit_tx, quit_rx) = oneshot::channel();
    let ui = UIHandler::new(monitor, logger.named("UI"), quit_tx).start();
    actix::spawn(read_commands(ui, logger.clone()));

    tokio::select! {
        _ = ctrl_c() => logger.info("Ctrl-C recibido, apagando..."),
        _ = quit_rx => {}
    }

    logger.info(api.logout().await);
    System::current().stop();
    Ok(())
}
