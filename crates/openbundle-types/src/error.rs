//! Error types for OpenBundle
//!
//! Four kinds, all aborting the enclosing operation atomically: counters,
//! registries, and ownership balances are left exactly as before the call.
//! The engine performs no internal retries; recovery is the caller's
//! responsibility.

use crate::BundleId;
use thiserror::Error;

/// Result type for OpenBundle operations
pub type Result<T> = std::result::Result<T, BundlerError>;

/// OpenBundle error taxonomy
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BundlerError {
    /// Malformed input: empty asset list, list longer than the bundle size
    /// ceiling, mismatched batch slices, invalid approval targets
    #[error("Invalid input: {reason}")]
    InputValidation { reason: String },

    /// Caller is not entitled to the requested operation
    #[error("Unauthorized: {reason}")]
    Authorization { reason: String },

    /// An individual inbound or outbound asset transfer failed
    #[error("Transfer of {asset} failed: {reason}")]
    Transfer { asset: String, reason: String },

    /// Reference to a bundle id with no live nonce list
    #[error("Unknown bundle: {bundle_id}")]
    UnknownEntity { bundle_id: BundleId },
}

impl BundlerError {
    /// Create an input validation error
    pub fn input_validation(reason: impl Into<String>) -> Self {
        Self::InputValidation {
            reason: reason.into(),
        }
    }

    /// Create an authorization error
    pub fn authorization(reason: impl Into<String>) -> Self {
        Self::Authorization {
            reason: reason.into(),
        }
    }

    /// Create a transfer error
    pub fn transfer(asset: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Transfer {
            asset: asset.into(),
            reason: reason.into(),
        }
    }

    /// Get a stable error code for API surfaces and logs
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InputValidation { .. } => "INPUT_VALIDATION",
            Self::Authorization { .. } => "AUTHORIZATION",
            Self::Transfer { .. } => "TRANSFER",
            Self::UnknownEntity { .. } => "UNKNOWN_ENTITY",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = BundlerError::input_validation("need to bundle at least one asset");
        assert_eq!(err.error_code(), "INPUT_VALIDATION");

        let err = BundlerError::UnknownEntity {
            bundle_id: BundleId(42),
        };
        assert_eq!(err.error_code(), "UNKNOWN_ENTITY");
        assert_eq!(err.to_string(), "Unknown bundle: 42");
    }
}
