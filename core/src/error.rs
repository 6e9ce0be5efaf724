#![deny(missing_docs)]

//! # Error Handling
//!
//! Provides the unified `AppError` enum used across the crate.
//!
//! Problems found *in a linted document* are never errors: they are reported as
//! [`Violation`](crate::violation::Violation)s. `AppError` is reserved for faults
//! of the caller, such as a broken ruleset or badly typed rule options.

use derive_more::{Display, From};

/// The Global Error Enum.
///
/// We use `derive_more` for boilerplate.
/// Note: String errors default to `General`.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// Wrapper for standard IO errors.
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// Ruleset or document YAML that failed to parse.
    #[display("YAML Error: {_0}")]
    Yaml(serde_yaml::Error),

    /// Rule options or document JSON that failed to deserialize.
    #[display("JSON Error: {_0}")]
    Json(serde_json::Error),

    /// Misconfigured ruleset (unknown function, unknown rule, bad options).
    /// We ignore this for `From<String>` to avoid conflict with General.
    #[from(ignore)]
    #[display("Configuration Error: {_0}")]
    Config(String),

    /// Generic errors.
    #[display("General Error: {_0}")]
    General(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;
