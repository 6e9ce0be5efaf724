#![deny(missing_docs)]

//! # Diagnostics
//!
//! Opt-in debug tracing for rule functions. A [`DebugLog`] is built from a rule's
//! `debug` option and handed down the call chain; when disabled every call is a
//! no-op and the message closure is never evaluated.

/// Debug event sink for one rule invocation.
#[derive(Debug, Clone, Copy)]
pub struct DebugLog {
    rule: &'static str,
    enabled: bool,
}

impl DebugLog {
    /// Creates a log for `rule`, active only when `enabled`.
    pub fn new(rule: &'static str, enabled: bool) -> Self {
        Self { rule, enabled }
    }

    /// A log that never emits.
    pub fn disabled(rule: &'static str) -> Self {
        Self::new(rule, false)
    }

    /// Whether events are emitted.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Emits a `debug` event built lazily from `message`.
    pub fn debug<F, S>(&self, message: F)
    where
        F: FnOnce() -> S,
        S: std::fmt::Display,
    {
        if self.enabled {
            tracing::debug!(target: "oas_lint_core::diagnostics", rule = self.rule, "{}", message());
        }
    }
}
