//! Cache Module
//!
//! Typed value storage and call counting on top of a `KeyValueStore`.

mod counter;
mod typed;
pub mod value;


pub use counter::{CallCounter, Counted};
pub use typed::{TypedCache, STORE_CALLS_KEY};
pub use value::Value;
