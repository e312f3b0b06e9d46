//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `account`: Receive-account types and handle validation
//! - `item`: Bill item types and typed partial updates
//! - `transaction`: Transaction types, statuses, and identifiers
//! - `error`: Error types for the session engine

pub mod account;
pub mod error;
pub mod item;
pub mod transaction;

pub use account::{AccountId, ReceiveAccount};
pub use error::SessionError;
pub use item::{Item, ItemId, ItemUpdate};
pub use transaction::{Transaction, TransactionDraft, TxId, TxStatus};
