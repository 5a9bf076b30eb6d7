//! The module contains the errors the engine can return.
//!
//! Aggregation itself never fails: malformed records degrade to zero amounts
//! and the "Uncategorized" bucket. Errors only come from parsing user input
//! and from validating drafts before they are sent to the server.
//!
//! - [`InvalidAmount`] for amounts that cannot be parsed or are out of range.
//! - [`InvalidPeriod`] for year/month selections that do not exist.
//! - [`InvalidTransfer`] for transfers the server would reject anyway.
//!
//!  [`InvalidAmount`]: EngineError::InvalidAmount
//!  [`InvalidPeriod`]: EngineError::InvalidPeriod
//!  [`InvalidTransfer`]: EngineError::InvalidTransfer
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid period: {0}")]
    InvalidPeriod(String),
    #[error("Invalid transfer: {0}")]
    InvalidTransfer(String),
}
