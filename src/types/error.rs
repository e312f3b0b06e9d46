//! Error types for the UPI session engine
//!
//! This module defines all error types that can occur while managing a
//! payment session. Errors are designed to be descriptive and user-friendly
//! for CLI output and notification surfaces.
//!
//! # Error Categories
//!
//! - **Validation Errors**: malformed UPI handle, empty name, non-positive
//!   price, zero quantity — caught at the boundary, state is never mutated.
//! - **Recognition Errors**: a dictated amount contained no parseable number.
//! - **Render Errors**: the payment URI exceeds QR code capacity.
//! - **Storage Errors**: the local key-value store failed to read or write.

use rust_decimal::Decimal;
use thiserror::Error;

/// Main error type for the session engine
///
/// Every variant is recoverable at the call site: no condition in this core
/// is fatal to the process. Validation failures leave the ledger untouched,
/// recognition failures leave the previous override in place, and render
/// failures leave the previously rendered code in place.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    /// The receive-account handle does not match the `local@provider` pattern
    ///
    /// This is a recoverable error - the account is not created.
    #[error("Invalid UPI handle '{handle}': expected local@provider")]
    InvalidHandle {
        /// The handle that failed validation
        handle: String,
    },

    /// A display name or item name was empty or whitespace-only
    ///
    /// This is a recoverable error - the entity is not created or updated.
    #[error("Name must not be empty")]
    EmptyName,

    /// An item unit price was zero or negative
    ///
    /// This is a recoverable error - the item is not created or updated.
    #[error("Invalid unit price {price}: must be greater than zero")]
    InvalidPrice {
        /// The rejected price
        price: Decimal,
    },

    /// An item quantity was below one
    ///
    /// This is a recoverable error - the item is not created or updated.
    #[error("Invalid quantity {quantity}: must be at least 1")]
    InvalidQuantity {
        /// The rejected quantity
        quantity: u32,
    },

    /// A payment was initiated with a resolved amount of zero or less
    ///
    /// No transaction is created; the ledger never contains a zero-amount
    /// transaction.
    #[error("Cannot initiate a payment for a non-positive amount")]
    ZeroAmount,

    /// A payment was initiated with no receive-account configured
    ///
    /// This is a recoverable error - add an account and retry.
    #[error("No receive-account configured")]
    NoAccount,

    /// A dictated amount contained no parseable number
    ///
    /// Unlike a typed amount (which falls back silently to the session
    /// total), a deliberately spoken amount that fails to parse is a
    /// reportable failure. The previous override is left untouched.
    #[error("Could not extract an amount from transcript '{transcript}'")]
    Recognition {
        /// The transcript that yielded no numeric substring
        transcript: String,
    },

    /// QR code generation failed
    ///
    /// Typically the URI exceeds the encodable capacity for the chosen
    /// error-correction level. The caller keeps its prior rendered image.
    #[error("QR render failed: {message}")]
    Render {
        /// Description of the render failure
        message: String,
    },

    /// The local key-value store failed to read or write
    #[error("Storage error: {message}")]
    Storage {
        /// Description of the storage failure
        message: String,
    },

    /// I/O error while writing CLI output (QR image files, etc.)
    #[error("I/O error: {message}")]
    Io {
        /// Description of the I/O error
        message: String,
    },
}

impl From<std::io::Error> for SessionError {
    fn from(error: std::io::Error) -> Self {
        SessionError::Io {
            message: error.to_string(),
        }
    }
}

impl From<sled::Error> for SessionError {
    fn from(error: sled::Error) -> Self {
        SessionError::Storage {
            message: error.to_string(),
        }
    }
}

impl From<serde_json::Error> for SessionError {
    fn from(error: serde_json::Error) -> Self {
        SessionError::Storage {
            message: error.to_string(),
        }
    }
}

// Helper functions for creating common errors

impl SessionError {
    /// Create an InvalidHandle error
    pub fn invalid_handle(handle: &str) -> Self {
        SessionError::InvalidHandle {
            handle: handle.to_string(),
        }
    }

    /// Create an InvalidPrice error
    pub fn invalid_price(price: Decimal) -> Self {
        SessionError::InvalidPrice { price }
    }

    /// Create an InvalidQuantity error
    pub fn invalid_quantity(quantity: u32) -> Self {
        SessionError::InvalidQuantity { quantity }
    }

    /// Create a Recognition error
    pub fn recognition(transcript: &str) -> Self {
        SessionError::Recognition {
            transcript: transcript.to_string(),
        }
    }

    /// Create a Render error
    pub fn render(message: impl Into<String>) -> Self {
        SessionError::Render {
            message: message.into(),
        }
    }

    /// Create a Storage error
    pub fn storage(message: impl Into<String>) -> Self {
        SessionError::Storage {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal::Decimal;

    #[rstest]
    #[case::invalid_handle(
        SessionError::InvalidHandle { handle: "no-at-sign".to_string() },
        "Invalid UPI handle 'no-at-sign': expected local@provider"
    )]
    #[case::empty_name(SessionError::EmptyName, "Name must not be empty")]
    #[case::invalid_price(
        SessionError::InvalidPrice { price: Decimal::ZERO },
        "Invalid unit price 0: must be greater than zero"
    )]
    #[case::invalid_quantity(
        SessionError::InvalidQuantity { quantity: 0 },
        "Invalid quantity 0: must be at least 1"
    )]
    #[case::zero_amount(
        SessionError::ZeroAmount,
        "Cannot initiate a payment for a non-positive amount"
    )]
    #[case::no_account(SessionError::NoAccount, "No receive-account configured")]
    #[case::recognition(
        SessionError::Recognition { transcript: "please pay two hundred".to_string() },
        "Could not extract an amount from transcript 'please pay two hundred'"
    )]
    #[case::render(
        SessionError::Render { message: "data too long".to_string() },
        "QR render failed: data too long"
    )]
    #[case::storage(
        SessionError::Storage { message: "tree unavailable".to_string() },
        "Storage error: tree unavailable"
    )]
    fn test_error_display(#[case] error: SessionError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[rstest]
    #[case::invalid_handle(
        SessionError::invalid_handle("bad"),
        SessionError::InvalidHandle { handle: "bad".to_string() }
    )]
    #[case::invalid_price(
        SessionError::invalid_price(Decimal::NEGATIVE_ONE),
        SessionError::InvalidPrice { price: Decimal::NEGATIVE_ONE }
    )]
    #[case::invalid_quantity(
        SessionError::invalid_quantity(0),
        SessionError::InvalidQuantity { quantity: 0 }
    )]
    #[case::recognition(
        SessionError::recognition("pay up"),
        SessionError::Recognition { transcript: "pay up".to_string() }
    )]
    fn test_helper_functions(#[case] result: SessionError, #[case] expected: SessionError) {
        assert_eq!(result, expected);
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "Permission denied");
        let error: SessionError = io_error.into();
        assert!(matches!(error, SessionError::Io { .. }));
        assert_eq!(error.to_string(), "I/O error: Permission denied");
    }

    #[test]
    fn test_serde_error_conversion() {
        let json_error = serde_json::from_str::<Vec<u32>>("not json").unwrap_err();
        let error: SessionError = json_error.into();
        assert!(matches!(error, SessionError::Storage { .. }));
    }
}
