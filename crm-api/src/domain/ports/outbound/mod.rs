mod entity_store;
mod key_value;

pub use entity_store::*;
pub use key_value::*;
