//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - observations and series (`DataPoint`, `Series`, `PageInfo`)
//! - request parameters (`SeriesQuery`, `GenerationParams`)
//! - the country/indicator lookup tables (`Catalog`)

pub mod catalog;
pub mod types;

pub use catalog::*;
pub use types::*;
