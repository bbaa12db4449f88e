pub mod dashboard;
mod error;
pub mod kanban;
pub mod models;
pub mod ports;
pub mod repositories;
pub mod services;

pub use error::CrmError;
