//! The attribute store carried alongside a message as it moves
//! through the processing pipeline.
mod store;
mod value;

pub use store::AttributeStore;
pub use value::*;
