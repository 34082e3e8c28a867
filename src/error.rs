//! Error types for the rocket solver

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    /// The requested distance is missing a usable value.
    #[error("invalid query: distance must be a positive finite number, got {0:?}")]
    InvalidQuery(String),

    #[error("invalid balance table: {0}")]
    InvalidBalance(String),
}

pub type Result<T> = std::result::Result<T, CalcError>;
