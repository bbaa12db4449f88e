mod agreement;
mod client;
mod communication;
mod deliverable;
mod entity;
mod goal;
mod ids;
mod lead;
mod milestone;
mod money;
mod payment;
mod priority;
mod project;
mod subscription;
mod task;
mod ticket;

pub use agreement::*;
pub use client::*;
pub use communication::*;
pub use deliverable::*;
pub use entity::{Editable, Entity, Record};
pub use goal::*;
pub use ids::*;
pub use lead::*;
pub use milestone::*;
pub use payment::*;
pub use priority::*;
pub use project::*;
pub use subscription::*;
pub use task::*;
pub use ticket::*;
