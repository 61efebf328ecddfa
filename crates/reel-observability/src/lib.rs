//! Observability for Reel.
//!
//! This crate provides:
//! - `LoggingConfig` / `init` - `tracing` subscriber setup (human, compact or JSON)
//! - `Stopwatch` - Elapsed-time measurement for log fields

mod logging;
mod timing;

pub use logging::*;
pub use timing::*;
