pub mod api;
pub mod config;
pub mod constants;
pub mod error;
pub mod kpis;
pub mod logger;
pub mod session;
pub mod types;
pub mod utils;
pub mod views;
