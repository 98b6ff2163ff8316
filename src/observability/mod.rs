//! Observability subsystem.
//!
//! # Design Decisions
//! - Structured logging through the `tracing` crate
//! - JSON format for production, pretty format for development

pub mod logging;

pub use logging::init_logging;
