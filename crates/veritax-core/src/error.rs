//! Error types for the rules engine.

use thiserror::Error;

/// Errors that can cross the public interface.
///
/// The engine has exactly one recoverable failure mode: the caller handed
/// it a model that violates the input contract. Data anomalies never land
/// here; they flow through the validation report instead.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaxError {
    /// The return model violates the engine's input contract.
    #[error("invalid return model at {path}: {reason}")]
    ModelInvalid { path: String, reason: String },
}

impl TaxError {
    /// Convenience constructor for contract violations.
    pub fn model_invalid(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ModelInvalid {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for engine operations.
pub type TaxResult<T> = Result<T, TaxError>;
