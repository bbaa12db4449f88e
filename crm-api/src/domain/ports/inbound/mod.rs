mod dashboard;
mod kanban;

pub use dashboard::*;
pub use kanban::*;
