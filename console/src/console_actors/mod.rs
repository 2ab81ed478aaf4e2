pub mod order_monitor;
pub mod ui_handler;
