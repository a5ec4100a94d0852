//! Token-level errors surfaced by asset contracts

use thiserror::Error;

/// Result type for token contract operations
pub type TokenResult<T> = std::result::Result<T, TokenError>;

/// Errors an asset contract can raise during a transfer call
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Insufficient balance: have {available}, need {required}")]
    InsufficientBalance { available: u128, required: u128 },

    #[error("Insufficient allowance: have {available}, need {required}")]
    InsufficientAllowance { available: u128, required: u128 },

    #[error("Operator {operator} is not authorized by {owner}")]
    NotAuthorized { operator: String, owner: String },

    #[error("Unit {id} does not exist")]
    UnknownUnit { id: u128 },

    #[error("Unit {id} is not owned by {owner}")]
    NotOwner { id: u128, owner: String },

    #[error("Token halted: {reason}")]
    Halted { reason: String },

    #[error("Destination rejected the transfer: {reason}")]
    Rejected { reason: String },
}
