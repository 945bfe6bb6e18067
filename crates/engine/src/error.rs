//! The module contains the error the engine can throw.
//!
//! The errors are:
//!
//! - [`Forbidden`] thrown when the caller's role does not permit an action.
//! - [`InvalidAmount`] thrown when an amount is not a positive finite number.
//! - [`KeyNotFound`] thrown when an item is not found.
//!
//!  [`Forbidden`]: EngineError::Forbidden
//!  [`InvalidAmount`]: EngineError::InvalidAmount
//!  [`KeyNotFound`]: EngineError::KeyNotFound
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid role: {0}")]
    InvalidRole(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Forbidden(a), Self::Forbidden(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidRole(a), Self::InvalidRole(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
