//! # PM Dashboard App
//!
//! Application layer - command wrappers and the `pmdash` entry point.
//!
//! This crate contains:
//! - Application context (dependency injection)
//! - Commands wrapping every dashboard operation with timing and logging
//! - Argument parsing and dispatch for the `pmdash` binary
//! - Tracing setup for the binary
//!
//! ## Architecture
//! - Depends on `domain`, `core`, and `infra`
//! - Wires up the hexagonal architecture

pub mod cli;
pub mod commands;
pub mod context;
pub mod utils;

pub use context::AppContext;
