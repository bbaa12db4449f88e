pub mod adapters;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod factory;
pub mod router;
mod routes;
pub mod telemetry;

pub use app_state::AppState;
