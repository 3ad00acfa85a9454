//! The module contains the errors the engine can throw.
//!
//! Errors fall into two families:
//!
//! - validation errors, fixable by the caller: [`InvalidNumber`],
//!   [`InvalidQuantity`], [`MissingShipment`], [`InvalidAmount`],
//!   [`InvalidId`], [`InvalidField`], [`KeyNotFound`], [`InvalidSettings`].
//! - persistence errors: [`Database`], surfaced as-is.
//!
//! Validation always happens before anything is written.
//!
//!  [`InvalidNumber`]: EngineError::InvalidNumber
//!  [`InvalidQuantity`]: EngineError::InvalidQuantity
//!  [`MissingShipment`]: EngineError::MissingShipment
//!  [`InvalidAmount`]: EngineError::InvalidAmount
//!  [`InvalidId`]: EngineError::InvalidId
//!  [`InvalidField`]: EngineError::InvalidField
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`InvalidSettings`]: EngineError::InvalidSettings
//!  [`Database`]: EngineError::Database
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid number: {0}")]
    InvalidNumber(String),
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),
    #[error("Order must be assigned to a shipment")]
    MissingShipment,
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid id: {0}")]
    InvalidId(String),
    #[error("Invalid field: {0}")]
    InvalidField(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl EngineError {
    /// Returns `true` for errors the caller can fix by changing its input.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        !self.is_persistence()
    }

    /// Returns `true` if the error comes from the store.
    #[must_use]
    pub fn is_persistence(&self) -> bool {
        matches!(self, Self::Database(_))
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidNumber(a), Self::InvalidNumber(b)) => a == b,
            (Self::InvalidQuantity(a), Self::InvalidQuantity(b)) => a == b,
            (Self::MissingShipment, Self::MissingShipment) => true,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidId(a), Self::InvalidId(b)) => a == b,
            (Self::InvalidField(a), Self::InvalidField(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::InvalidSettings(a), Self::InvalidSettings(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
