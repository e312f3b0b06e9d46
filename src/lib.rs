//! UPI Session Engine Library
//! # Overview
//!
//! This library lets a merchant configure receive-accounts, build an
//! itemized bill, encode a UPI payment request as a scannable QR code or an
//! embeddable snippet, and track the resulting transaction through a
//! simulated settlement lifecycle.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (ReceiveAccount, Item, Transaction, errors)
//! - [`cli`] - CLI arguments parsing
//! - [`core`] - Business logic components:
//!   - [`core::ledger`] - The persisted collections and their invariants
//!   - [`core::amount`] - Session-total vs. override amount resolution
//!   - [`core::encode`] - Deterministic `upi://pay` URI encoding
//!   - [`core::render`] - QR bitmap and embeddable snippet materialization
//!   - [`core::session`] - Orchestration and the settlement lifecycle
//! - [`io`] - Durable key-value storage for the ledger collections
//!
//! # Transaction Lifecycle
//!
//! Every payment request is recorded as a `Pending` transaction with a
//! `UPI`-prefixed reference code, then resolved to `Completed` or `Failed`
//! by an injectable settlement policy after a simulated delay. Terminal
//! statuses are immutable; a failed payment is re-initiated as a brand-new
//! transaction.

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod types;

pub use crate::core::{
    AmountResolver, LedgerStore, PaymentSession, PendingSettlement, RandomSettlement,
    RenderOptions, SessionEvent, Settlement, SettlementPolicy,
};
pub use types::{
    AccountId, Item, ItemId, ItemUpdate, ReceiveAccount, SessionError, Transaction, TxId, TxStatus,
};
