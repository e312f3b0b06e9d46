//! Core business logic module
//!
//! This module contains the payment session components:
//! - `traits` - Collaborator and capability seams (events, speech, clipboard, share)
//! - `ledger` - The persisted collections and their invariants
//! - `amount` - Session-total vs. override amount resolution
//! - `encode` - Deterministic payment-request URI encoding
//! - `render` - QR bitmap and embeddable snippet materialization
//! - `session` - Orchestration and the transaction settlement lifecycle

pub mod amount;
pub mod encode;
pub mod ledger;
pub mod render;
pub mod session;
pub mod traits;

pub use amount::AmountResolver;
pub use ledger::LedgerStore;
pub use render::RenderOptions;
pub use session::{PaymentSession, PendingSettlement, RandomSettlement, Settlement, SettlementPolicy};
pub use traits::{EventSink, LogSink, NoopEnvironment, NullSink, SessionEvent};
