//! # Data Layer
//!
//! Model structs with their query methods, one module per table. Methods are
//! executor-polymorphic so the coordinator can run them against the pool or
//! inside a transaction it owns.

pub mod element;
pub mod process;

pub use element::Element;
pub use process::{Process, ProcessStatus};
