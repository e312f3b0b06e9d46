//! Transaction types for the UPI session engine
//!
//! A transaction records one payment request through its simulated
//! settlement lifecycle. Transactions are created pending, transition to a
//! terminal status exactly once, and are immutable afterwards.

use crate::types::item::Item;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Transaction identifier
///
/// Assigned by the ledger store on append, monotonically increasing.
pub type TxId = u64;

/// Settlement status of a transaction
///
/// The only legal transitions are `Pending -> Completed` and
/// `Pending -> Failed`. A failed transaction is terminal; retrying means
/// initiating a brand-new transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxStatus {
    /// Awaiting simulated settlement
    Pending,

    /// Settlement succeeded
    Completed,

    /// Settlement failed; terminal, no retry
    Failed,
}

impl TxStatus {
    /// Whether this status is terminal (no further transitions allowed)
    pub fn is_terminal(&self) -> bool {
        matches!(self, TxStatus::Completed | TxStatus::Failed)
    }
}

/// A recorded payment request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Identifier assigned by the ledger store
    pub id: TxId,

    /// Payable amount, strictly positive
    pub amount: Decimal,

    /// Settlement status
    pub status: TxStatus,

    /// Snapshot of the bill items at creation time
    ///
    /// Empty when the payment used an override amount instead of the
    /// session total.
    pub items: Vec<Item>,

    /// The receive-account handle the request was addressed to
    pub handle: String,

    /// Creation time
    pub timestamp: DateTime<Utc>,

    /// Human-facing reference code, `UPI` followed by six digits
    pub reference: String,
}

/// A transaction draft prior to id assignment
///
/// The ledger store turns a draft into a [`Transaction`] by assigning the
/// next id, stamping the current time, and setting the status to
/// `Pending`.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDraft {
    /// Payable amount, strictly positive
    pub amount: Decimal,

    /// Snapshot of the bill items, empty under an override amount
    pub items: Vec<Item>,

    /// The receive-account handle
    pub handle: String,

    /// Reference code issued by the lifecycle
    pub reference: String,
}

impl TransactionDraft {
    /// Create a draft for a pending payment request
    pub fn new(
        amount: Decimal,
        items: Vec<Item>,
        handle: impl Into<String>,
        reference: impl Into<String>,
    ) -> Self {
        TransactionDraft {
            amount,
            items,
            handle: handle.into(),
            reference: reference.into(),
        }
    }
}
