//! Input/output helpers.
//!
//! - series CSV export (`export`)

pub mod export;

pub use export::*;
