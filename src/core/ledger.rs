//! Ledger store for the payment session
//!
//! This module provides the `LedgerStore`, the exclusive owner of the three
//! persisted collections: receive-accounts, bill items, and transactions.
//!
//! The LedgerStore is responsible for:
//! - Validating input before any mutation (invalid input leaves state unchanged)
//! - Enforcing the single-default invariant over receive-accounts
//! - Recomputing the session total from live items on every read
//! - Persisting the entire affected collection synchronously after each mutation
//!
//! There is exactly one logical writer (the active session), so no locking
//! is needed; each operation is atomic with respect to its own collection.

use crate::io::kv::{KvStore, ACCOUNTS_KEY, ITEMS_KEY, TRANSACTIONS_KEY};
use crate::types::account::is_valid_handle;
use crate::types::{
    AccountId, Item, ItemId, ItemUpdate, ReceiveAccount, SessionError, Transaction,
    TransactionDraft, TxId, TxStatus,
};
use chrono::Utc;
use rust_decimal::Decimal;
use std::path::Path;
use tracing::debug;

/// Owner of the persisted session collections
///
/// In-memory state is hydrated from the key-value store on open and is the
/// working copy. Every mutating operation stages the change on a candidate
/// collection, persists that candidate, and only then swaps it in — so a
/// failed write leaves the caller's view and the disk agreeing, with the
/// operation simply not applied.
pub struct LedgerStore {
    kv: KvStore,
    accounts: Vec<ReceiveAccount>,
    items: Vec<Item>,
    /// Most-recent-first; `append_transaction` inserts at the head
    transactions: Vec<Transaction>,
}

impl LedgerStore {
    /// Open a ledger backed by a sled database at the given path
    ///
    /// Hydrates all three collections from durable storage; a fresh path
    /// yields an empty ledger.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the database cannot be opened or
    /// a stored collection fails to deserialize.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SessionError> {
        Self::from_kv(KvStore::open(path)?)
    }

    /// Open a ledger backed by an ephemeral store
    ///
    /// Nothing survives drop; used by tests and throwaway sessions.
    pub fn temporary() -> Result<Self, SessionError> {
        Self::from_kv(KvStore::temporary()?)
    }

    fn from_kv(kv: KvStore) -> Result<Self, SessionError> {
        let accounts: Vec<ReceiveAccount> = kv.load(ACCOUNTS_KEY)?;
        let items: Vec<Item> = kv.load(ITEMS_KEY)?;
        let transactions: Vec<Transaction> = kv.load(TRANSACTIONS_KEY)?;

        debug!(
            accounts = accounts.len(),
            items = items.len(),
            transactions = transactions.len(),
            "ledger hydrated"
        );

        Ok(LedgerStore {
            kv,
            accounts,
            items,
            transactions,
        })
    }

    // ------------------------------------------------------------------
    // Receive-accounts
    // ------------------------------------------------------------------

    /// Add a receive-account
    ///
    /// If the collection is empty the new account is forced default
    /// regardless of `make_default`. If `make_default` is true, every other
    /// account loses default status atomically with the insert.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The handle does not match the `local@provider` pattern
    /// - The display name is empty or whitespace-only
    /// - Persisting the collection fails
    pub fn add_account(
        &mut self,
        handle: &str,
        name: &str,
        make_default: bool,
    ) -> Result<ReceiveAccount, SessionError> {
        if !is_valid_handle(handle) {
            return Err(SessionError::invalid_handle(handle));
        }
        if name.trim().is_empty() {
            return Err(SessionError::EmptyName);
        }

        let mut account = ReceiveAccount::new(self.next_account_id(), handle, name.trim());

        let mut accounts = self.accounts.clone();
        if accounts.is_empty() || make_default {
            for existing in &mut accounts {
                existing.is_default = false;
            }
            account.is_default = true;
        }
        accounts.push(account.clone());

        self.commit_accounts(accounts)?;
        Ok(account)
    }

    /// Remove a receive-account by id
    ///
    /// Unknown ids are a no-op (`Ok(None)`), not an error. If the removed
    /// account was the default and others remain, the first remaining
    /// account in insertion order becomes the new default.
    pub fn remove_account(&mut self, id: AccountId) -> Result<Option<ReceiveAccount>, SessionError> {
        let Some(position) = self.accounts.iter().position(|a| a.id == id) else {
            return Ok(None);
        };

        let mut accounts = self.accounts.clone();
        let removed = accounts.remove(position);
        if removed.is_default {
            if let Some(first) = accounts.first_mut() {
                first.is_default = true;
            }
        }

        self.commit_accounts(accounts)?;
        Ok(Some(removed))
    }

    /// Make the given account the default
    ///
    /// Unknown ids change nothing and return `Ok(false)`. Otherwise exactly
    /// one account ends up default.
    pub fn set_default_account(&mut self, id: AccountId) -> Result<bool, SessionError> {
        if !self.accounts.iter().any(|a| a.id == id) {
            return Ok(false);
        }

        let mut accounts = self.accounts.clone();
        for account in &mut accounts {
            account.is_default = account.id == id;
        }

        self.commit_accounts(accounts)?;
        Ok(true)
    }

    /// All receive-accounts in insertion order
    pub fn accounts(&self) -> &[ReceiveAccount] {
        &self.accounts
    }

    /// The current default receive-account, if any
    pub fn default_account(&self) -> Option<&ReceiveAccount> {
        self.accounts.iter().find(|a| a.is_default)
    }

    // ------------------------------------------------------------------
    // Items
    // ------------------------------------------------------------------

    /// Add a bill item
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The name is empty or whitespace-only
    /// - The unit price is not strictly positive
    /// - The quantity is below 1
    /// - Persisting the collection fails
    pub fn add_item(
        &mut self,
        name: &str,
        unit_price: Decimal,
        quantity: u32,
    ) -> Result<Item, SessionError> {
        let item = Item {
            id: self.next_item_id(),
            name: name.trim().to_string(),
            unit_price,
            quantity,
        };
        Self::validate_item(&item)?;

        let mut items = self.items.clone();
        items.push(item.clone());

        self.commit_items(items)?;
        Ok(item)
    }

    /// Apply a partial update to an item
    ///
    /// The update is merged field-by-field and the merged result validated
    /// before anything is committed; an invalid update leaves the stored
    /// item untouched. Unknown ids are a silent no-op (`Ok(false)`).
    ///
    /// # Errors
    ///
    /// Returns a validation error if the merged item has an empty name,
    /// non-positive price, or zero quantity.
    pub fn update_item(&mut self, id: ItemId, update: &ItemUpdate) -> Result<bool, SessionError> {
        let Some(position) = self.items.iter().position(|i| i.id == id) else {
            return Ok(false);
        };

        let mut merged = update.merged_into(&self.items[position]);
        merged.name = merged.name.trim().to_string();
        Self::validate_item(&merged)?;

        let mut items = self.items.clone();
        items[position] = merged;

        self.commit_items(items)?;
        Ok(true)
    }

    /// Remove a bill item by id
    ///
    /// Unknown ids are a no-op (`Ok(None)`), not an error.
    pub fn remove_item(&mut self, id: ItemId) -> Result<Option<Item>, SessionError> {
        let Some(position) = self.items.iter().position(|i| i.id == id) else {
            return Ok(None);
        };

        let mut items = self.items.clone();
        let removed = items.remove(position);

        self.commit_items(items)?;
        Ok(Some(removed))
    }

    /// All bill items in insertion order
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// The sum of `unit_price * quantity` over current items
    ///
    /// Recomputed from the live collection on every call; never cached.
    pub fn session_total(&self) -> Decimal {
        self.items.iter().map(Item::line_total).sum()
    }

    fn validate_item(item: &Item) -> Result<(), SessionError> {
        if item.name.is_empty() {
            return Err(SessionError::EmptyName);
        }
        if item.unit_price <= Decimal::ZERO {
            return Err(SessionError::invalid_price(item.unit_price));
        }
        if item.quantity < 1 {
            return Err(SessionError::invalid_quantity(item.quantity));
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Transactions
    // ------------------------------------------------------------------

    /// Record a pending transaction from a draft
    ///
    /// Assigns the next id, stamps the current time, and inserts at the
    /// head of the list; reads are most-recent-first by construction.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if persisting the collection fails.
    pub fn append_transaction(&mut self, draft: TransactionDraft) -> Result<TxId, SessionError> {
        let id = self.next_tx_id();
        let transaction = Transaction {
            id,
            amount: draft.amount,
            status: TxStatus::Pending,
            items: draft.items,
            handle: draft.handle,
            timestamp: Utc::now(),
            reference: draft.reference,
        };

        let mut transactions = self.transactions.clone();
        transactions.insert(0, transaction);

        self.commit_transactions(transactions)?;
        Ok(id)
    }

    /// Update a transaction's settlement status
    ///
    /// This is the only mutation path for transactions. Unknown ids and
    /// transactions already in a terminal status are silent no-ops
    /// (`Ok(false)`), so a settlement resolving after its transaction
    /// disappeared, or resolving twice, cannot crash or re-flip state.
    pub fn update_transaction_status(
        &mut self,
        id: TxId,
        status: TxStatus,
    ) -> Result<bool, SessionError> {
        let Some(position) = self.transactions.iter().position(|t| t.id == id) else {
            return Ok(false);
        };
        if self.transactions[position].status.is_terminal() {
            return Ok(false);
        }

        let mut transactions = self.transactions.clone();
        transactions[position].status = status;

        self.commit_transactions(transactions)?;
        Ok(true)
    }

    /// All transactions, most recent first
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Look up a transaction by id
    pub fn transaction(&self, id: TxId) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id)
    }

    // ------------------------------------------------------------------
    // Persistence and id assignment
    // ------------------------------------------------------------------

    // Persist the candidate collection first and swap it in only once the
    // write succeeded; on failure the in-memory state is untouched.

    fn commit_accounts(&mut self, accounts: Vec<ReceiveAccount>) -> Result<(), SessionError> {
        self.kv.save(ACCOUNTS_KEY, &accounts)?;
        self.accounts = accounts;
        Ok(())
    }

    fn commit_items(&mut self, items: Vec<Item>) -> Result<(), SessionError> {
        self.kv.save(ITEMS_KEY, &items)?;
        self.items = items;
        Ok(())
    }

    fn commit_transactions(&mut self, transactions: Vec<Transaction>) -> Result<(), SessionError> {
        self.kv.save(TRANSACTIONS_KEY, &transactions)?;
        self.transactions = transactions;
        Ok(())
    }

    // Ids are max + 1 over the hydrated collection, so they stay unique
    // across process restarts without a separate counter key.

    fn next_account_id(&self) -> AccountId {
        self.accounts.iter().map(|a| a.id).max().unwrap_or(0) + 1
    }

    fn next_item_id(&self) -> ItemId {
        self.items.iter().map(|i| i.id).max().unwrap_or(0) + 1
    }

    fn next_tx_id(&self) -> TxId {
        self.transactions.iter().map(|t| t.id).max().unwrap_or(0) + 1
    }
}
