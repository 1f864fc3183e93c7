//! Logger Module
//!
//! Minimal logging capability injected into the cache. Host processes plug in
//! their own sink; the default forwards to `tracing`.

use std::fmt::Debug;

// == Logger Trait ==
/// Injectable logging capability.
///
/// The cache only ever emits plain informational strings, so any sink with
/// info/warn/error suffices.
pub trait Logger: Send + Sync + Debug {
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
}

// == Tracing Logger ==
/// Default logger backed by the `tracing` macros.
#[derive(Debug, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn info(&self, message: &str) {
        tracing::info!("{}", message);
    }

    fn warn(&self, message: &str) {
        tracing::warn!("{}", message);
    }

    fn error(&self, message: &str) {
        tracing::error!("{}", message);
    }
}

// == Null Logger ==
/// Logger that discards everything. Useful in tests.
#[derive(Debug, Default)]
pub struct NullLogger;

impl Logger for NullLogger {
    fn info(&self, _message: &str) {}
    fn warn(&self, _message: &str) {}
    fn error(&self, _message: &str) {}
}
