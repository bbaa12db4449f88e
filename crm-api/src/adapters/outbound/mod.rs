pub mod local;
pub mod postgres;
