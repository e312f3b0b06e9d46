//! Payment session orchestration and transaction lifecycle
//!
//! The `PaymentSession` coordinates the ledger store, the amount resolver,
//! the request encoder, and the code renderer, and drives each payment
//! request through its simulated settlement lifecycle:
//!
//! ```text
//! pending -> completed | failed      (terminal, exactly once)
//! ```
//!
//! Settlement is simulated randomness behind an injectable policy, not a
//! network call, so there is no retry path: a failed transaction stays
//! failed and the caller initiates a brand-new one. The settlement delay is
//! the session's only asynchronous suspension point and is non-cancelable
//! once started; if the transaction vanishes before resolution the status
//! update is a no-op, not a crash.

use crate::core::amount::AmountResolver;
use crate::core::encode::{self, NOTE_PAYMENT};
use crate::core::ledger::LedgerStore;
use crate::core::render::{self, RenderOptions};
use crate::core::traits::{
    Clipboard, EventSink, NullSink, SessionEvent, ShareTarget, SpeechInput,
};
use crate::types::{
    AccountId, Item, ItemId, ItemUpdate, ReceiveAccount, SessionError, TransactionDraft, TxId,
    TxStatus,
};
use rand::Rng;
use rust_decimal::Decimal;
use std::time::Duration;
use tracing::info;

/// A settlement decision: how long to wait and how it ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settlement {
    /// Simulated settlement delay
    pub delay: Duration,

    /// Whether the transaction completes or fails
    pub success: bool,
}

/// Injectable settlement policy
///
/// Production uses [`RandomSettlement`]; tests supply deterministic
/// policies instead of real timers and randomness.
pub trait SettlementPolicy {
    /// Decide the delay and outcome for a payment of the given amount
    fn decide(&self, amount: Decimal) -> Settlement;
}

/// Random settlement: fixed delay, completes with probability `success_rate`
#[derive(Debug, Clone)]
pub struct RandomSettlement {
    /// Probability of a `Completed` outcome, in `[0, 1]`; out-of-range
    /// values saturate to the nearest bound
    pub success_rate: f64,

    /// Fixed simulated settlement delay
    pub delay: Duration,
}

impl Default for RandomSettlement {
    fn default() -> Self {
        RandomSettlement {
            success_rate: 0.8,
            delay: Duration::from_secs(2),
        }
    }
}

impl SettlementPolicy for RandomSettlement {
    fn decide(&self, _amount: Decimal) -> Settlement {
        // gen_bool panics outside [0, 1]; an out-of-range rate saturates
        let rate = self.success_rate.clamp(0.0, 1.0);
        Settlement {
            delay: self.delay,
            success: rand::thread_rng().gen_bool(rate),
        }
    }
}

/// A recorded pending payment awaiting settlement
///
/// Returned by [`PaymentSession::initiate`]; hand it to
/// [`PaymentSession::settle`] to drive the transaction to its terminal
/// status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSettlement {
    /// The recorded transaction
    pub tx_id: TxId,

    /// The issued reference code
    pub reference: String,

    /// The policy's decision for this payment
    pub settlement: Settlement,
}

/// Orchestrates one merchant's active payment session
///
/// Owns the ledger and the override state; passed explicitly to all
/// consumers (no ambient singletons). Mutating operations emit structured
/// [`SessionEvent`]s for the notification collaborator.
pub struct PaymentSession {
    ledger: LedgerStore,
    resolver: AmountResolver,
    policy: Box<dyn SettlementPolicy + Send + Sync>,
    events: Box<dyn EventSink + Send + Sync>,
}

impl PaymentSession {
    /// Create a session over a ledger with the default random settlement
    /// policy and no notification sink
    pub fn new(ledger: LedgerStore) -> Self {
        PaymentSession {
            ledger,
            resolver: AmountResolver::new(),
            policy: Box::new(RandomSettlement::default()),
            events: Box::new(NullSink),
        }
    }

    /// Replace the settlement policy
    pub fn with_policy(mut self, policy: impl SettlementPolicy + Send + Sync + 'static) -> Self {
        self.policy = Box::new(policy);
        self
    }

    /// Replace the notification sink
    pub fn with_events(mut self, events: impl EventSink + Send + Sync + 'static) -> Self {
        self.events = Box::new(events);
        self
    }

    /// Read access to the underlying ledger
    pub fn ledger(&self) -> &LedgerStore {
        &self.ledger
    }

    // ------------------------------------------------------------------
    // Receive-accounts
    // ------------------------------------------------------------------

    /// Add a receive-account; see [`LedgerStore::add_account`]
    pub fn add_account(
        &mut self,
        handle: &str,
        name: &str,
        make_default: bool,
    ) -> Result<ReceiveAccount, SessionError> {
        let account = self.ledger.add_account(handle, name, make_default)?;
        self.events.emit(SessionEvent::AccountAdded {
            handle: account.handle.clone(),
            name: account.name.clone(),
        });
        Ok(account)
    }

    /// Remove a receive-account; see [`LedgerStore::remove_account`]
    pub fn remove_account(&mut self, id: AccountId) -> Result<bool, SessionError> {
        match self.ledger.remove_account(id)? {
            Some(removed) => {
                self.events.emit(SessionEvent::AccountRemoved {
                    handle: removed.handle,
                    name: removed.name,
                });
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Change the default receive-account; see
    /// [`LedgerStore::set_default_account`]
    pub fn set_default_account(&mut self, id: AccountId) -> Result<bool, SessionError> {
        let changed = self.ledger.set_default_account(id)?;
        if changed {
            if let Some(account) = self.ledger.default_account() {
                self.events.emit(SessionEvent::DefaultChanged {
                    handle: account.handle.clone(),
                });
            }
        }
        Ok(changed)
    }

    // ------------------------------------------------------------------
    // Items and amounts
    // ------------------------------------------------------------------

    /// Add a bill item; see [`LedgerStore::add_item`]
    pub fn add_item(
        &mut self,
        name: &str,
        unit_price: Decimal,
        quantity: u32,
    ) -> Result<Item, SessionError> {
        let item = self.ledger.add_item(name, unit_price, quantity)?;
        self.events.emit(SessionEvent::ItemAdded {
            name: item.name.clone(),
            amount: item.line_total(),
        });
        Ok(item)
    }

    /// Apply a partial item update; see [`LedgerStore::update_item`]
    pub fn update_item(&mut self, id: ItemId, update: &ItemUpdate) -> Result<bool, SessionError> {
        self.ledger.update_item(id, update)
    }

    /// Remove a bill item; see [`LedgerStore::remove_item`]
    pub fn remove_item(&mut self, id: ItemId) -> Result<bool, SessionError> {
        match self.ledger.remove_item(id)? {
            Some(removed) => {
                self.events
                    .emit(SessionEvent::ItemRemoved { name: removed.name });
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Set the override amount from typed input (forgiving; see
    /// [`AmountResolver::set_override`])
    pub fn set_amount(&mut self, raw: &str) {
        self.resolver.set_override(raw);
    }

    /// Set the override amount from a captured utterance
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Recognition` when nothing was heard or the
    /// transcript contains no parseable amount; the previous override is
    /// untouched either way.
    pub fn dictate_amount(&mut self, speech: &dyn SpeechInput) -> Result<Decimal, SessionError> {
        let transcript = speech.capture().ok_or_else(|| SessionError::recognition(""))?;
        self.resolver.set_override_from_speech(&transcript)
    }

    /// Clear the override; the payable amount reverts to the session total
    pub fn clear_amount(&mut self) {
        self.resolver.clear_override();
    }

    /// The payable amount for the session right now
    pub fn resolved_amount(&self) -> Decimal {
        self.resolver.resolve(self.ledger.session_total())
    }

    // ------------------------------------------------------------------
    // Encoding and rendering
    // ------------------------------------------------------------------

    /// The payment-request URI for the current session state
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoAccount` when no receive-account is
    /// configured.
    pub fn payment_uri(&self) -> Result<String, SessionError> {
        let account = self.ledger.default_account().ok_or(SessionError::NoAccount)?;
        let note = encode::payment_note(
            self.ledger.items(),
            self.resolver.is_overridden(),
            NOTE_PAYMENT,
        );
        Ok(encode::encode(account, self.resolved_amount(), &note))
    }

    /// Render the current payment request as a PNG QR code
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoAccount` without an account, or
    /// `SessionError::Render` when the URI exceeds QR capacity.
    pub fn qr_png(&self, options: &RenderOptions) -> Result<Vec<u8>, SessionError> {
        render::render_qr(&self.payment_uri()?, options)
    }

    /// The embeddable HTML snippet for the current default account and
    /// resolved amount
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoAccount` when no receive-account is
    /// configured.
    pub fn embed_snippet(&self) -> Result<String, SessionError> {
        let account = self.ledger.default_account().ok_or(SessionError::NoAccount)?;
        Ok(render::embed_snippet(account, self.resolved_amount()))
    }

    /// Copy the payment URI through the clipboard capability
    pub fn copy_uri(&self, clipboard: &dyn Clipboard) -> Result<(), SessionError> {
        clipboard.copy(&self.payment_uri()?);
        Ok(())
    }

    /// Offer the payment URI to the platform share surface
    pub fn share_request(&self, target: &dyn ShareTarget) -> Result<(), SessionError> {
        let account = self.ledger.default_account().ok_or(SessionError::NoAccount)?;
        let title = account.name.clone();
        target.share(&title, &self.payment_uri()?);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Transaction lifecycle
    // ------------------------------------------------------------------

    /// Record a pending payment request
    ///
    /// Issues a reference code, snapshots the bill items (empty when an
    /// override amount is active), appends the transaction in `Pending`
    /// status, and asks the settlement policy for its decision.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::ZeroAmount` when the resolved amount is not
    /// strictly positive (no transaction is created), or
    /// `SessionError::NoAccount` without a receive-account.
    pub fn initiate(&mut self) -> Result<PendingSettlement, SessionError> {
        let amount = self.resolved_amount();
        if amount <= Decimal::ZERO {
            return Err(SessionError::ZeroAmount);
        }
        let handle = self
            .ledger
            .default_account()
            .ok_or(SessionError::NoAccount)?
            .handle
            .clone();

        let items = if self.resolver.is_overridden() {
            Vec::new()
        } else {
            self.ledger.items().to_vec()
        };

        let reference = new_reference_code();
        let tx_id = self.ledger.append_transaction(TransactionDraft::new(
            amount,
            items,
            handle,
            reference.clone(),
        ))?;

        let settlement = self.policy.decide(amount);
        info!(tx_id, %reference, %amount, "payment initiated");
        self.events.emit(SessionEvent::TransactionInitiated {
            id: tx_id,
            reference: reference.clone(),
            amount,
        });

        Ok(PendingSettlement {
            tx_id,
            reference,
            settlement,
        })
    }

    /// Drive a pending payment to its terminal status
    ///
    /// Sleeps the policy's delay, then applies the outcome through the
    /// ledger's status update (a no-op if the transaction disappeared or
    /// was already terminal). Non-cancelable once started.
    pub async fn settle(&mut self, pending: PendingSettlement) -> Result<TxStatus, SessionError> {
        tokio::time::sleep(pending.settlement.delay).await;

        let status = if pending.settlement.success {
            TxStatus::Completed
        } else {
            TxStatus::Failed
        };

        let applied = self.ledger.update_transaction_status(pending.tx_id, status)?;
        if applied {
            info!(tx_id = pending.tx_id, ?status, "payment settled");
            self.events.emit(SessionEvent::TransactionSettled {
                id: pending.tx_id,
                reference: pending.reference,
                status,
            });
        }
        Ok(status)
    }
}

/// Issue a reference code: `UPI` followed by six random digits
fn new_reference_code() -> String {
    format!("UPI{:06}", rand::thread_rng().gen_range(0..1_000_000))
}
