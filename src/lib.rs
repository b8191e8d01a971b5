//! `wb-insight` library crate.
//!
//! The binary (`wbi`) is a thin wrapper around this library so the fetch,
//! decode, formatting and analysis paths are testable without spawning
//! processes or touching the network.

pub mod analysis;
pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod report;
pub mod tui;
