//! Durable key-value storage for the ledger collections
//!
//! This module wraps a local `sled` database behind a small typed API. The
//! three ledger collections (accounts, items, transactions) are each stored
//! under a fixed key as one JSON-serialized blob; every write replaces the
//! whole collection and flushes before returning, so the store is always the
//! single source of truth on the next load.

use crate::types::SessionError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
#[cfg(test)]
use std::sync::atomic::{AtomicBool, Ordering};

/// Storage key for the receive-account collection
pub const ACCOUNTS_KEY: &str = "accounts";

/// Storage key for the bill item collection
pub const ITEMS_KEY: &str = "items";

/// Storage key for the transaction collection
pub const TRANSACTIONS_KEY: &str = "transactions";

/// Typed wrapper around a sled database
///
/// Values are serialized with `serde_json`; a missing key loads as the
/// type's `Default` (an empty collection), so a fresh database behaves like
/// an empty ledger.
pub struct KvStore {
    db: sled::Db,
    #[cfg(test)]
    fail_saves: AtomicBool,
}

impl KvStore {
    /// Open (or create) a store at the given filesystem path
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if sled cannot open the directory
    /// (permissions, lock held by another process, corruption).
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SessionError> {
        Ok(Self::from_db(sled::open(path)?))
    }

    /// Open an ephemeral store backed by a temporary sled tree
    ///
    /// Used by tests and non-persistent sessions; nothing survives drop.
    pub fn temporary() -> Result<Self, SessionError> {
        Ok(Self::from_db(sled::Config::new().temporary(true).open()?))
    }

    fn from_db(db: sled::Db) -> Self {
        KvStore {
            db,
            #[cfg(test)]
            fail_saves: AtomicBool::new(false),
        }
    }

    /// Make every subsequent `save` fail, to exercise error paths
    #[cfg(test)]
    pub(crate) fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::Relaxed);
    }

    /// Load a value by key, defaulting when the key is absent
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the read fails or the stored
    /// bytes do not deserialize into `T`.
    pub fn load<T>(&self, key: &str) -> Result<T, SessionError>
    where
        T: DeserializeOwned + Default,
    {
        match self.db.get(key)? {
            Some(bytes) => Ok(serde_json::from_slice(&bytes)?),
            None => Ok(T::default()),
        }
    }

    /// Serialize and persist a value under a key, flushing to disk
    ///
    /// The write is synchronous: when this returns `Ok`, the value is on
    /// disk. Mutating ledger operations call this before returning to the
    /// caller.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if serialization, the write, or the
    /// flush fails.
    pub fn save<T>(&self, key: &str, value: &T) -> Result<(), SessionError>
    where
        T: Serialize,
    {
        #[cfg(test)]
        if self.fail_saves.load(Ordering::Relaxed) {
            return Err(SessionError::storage("save failure injected"));
        }

        let bytes = serde_json::to_vec(value)?;
        self.db.insert(key, bytes)?;
        self.db.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Item, ReceiveAccount};
    use rust_decimal::Decimal;
    use tempfile::TempDir;

    #[test]
    fn test_missing_key_loads_default() {
        let store = KvStore::temporary().unwrap();
        let accounts: Vec<ReceiveAccount> = store.load(ACCOUNTS_KEY).unwrap();
        assert!(accounts.is_empty());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let store = KvStore::temporary().unwrap();

        let items = vec![Item {
            id: 1,
            name: "Chai".to_string(),
            unit_price: Decimal::new(1000, 2),
            quantity: 2,
        }];

        store.save(ITEMS_KEY, &items).unwrap();
        let loaded: Vec<Item> = store.load(ITEMS_KEY).unwrap();
        assert_eq!(loaded, items);
    }

    #[test]
    fn test_save_replaces_whole_collection() {
        let store = KvStore::temporary().unwrap();

        store.save(ITEMS_KEY, &vec![1u64, 2, 3]).unwrap();
        store.save(ITEMS_KEY, &vec![9u64]).unwrap();

        let loaded: Vec<u64> = store.load(ITEMS_KEY).unwrap();
        assert_eq!(loaded, vec![9]);
    }

    #[test]
    fn test_persists_across_reopen() {
        let dir = TempDir::new().unwrap();

        {
            let store = KvStore::open(dir.path()).unwrap();
            let mut account = ReceiveAccount::new(1, "merchant@okbank", "Chai Stall");
            account.is_default = true;
            store.save(ACCOUNTS_KEY, &vec![account]).unwrap();
        }

        let store = KvStore::open(dir.path()).unwrap();
        let accounts: Vec<ReceiveAccount> = store.load(ACCOUNTS_KEY).unwrap();
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].handle, "merchant@okbank");
        assert!(accounts[0].is_default);
    }

    #[test]
    fn test_injected_save_failure_writes_nothing() {
        let store = KvStore::temporary().unwrap();

        store.fail_saves(true);
        assert!(matches!(
            store.save(ITEMS_KEY, &vec![1u64]).unwrap_err(),
            crate::types::SessionError::Storage { .. }
        ));

        store.fail_saves(false);
        let loaded: Vec<u64> = store.load(ITEMS_KEY).unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_corrupt_value_surfaces_storage_error() {
        let store = KvStore::temporary().unwrap();
        store.db.insert(ITEMS_KEY, &b"not json"[..]).unwrap();

        let result: Result<Vec<Item>, _> = store.load(ITEMS_KEY);
        assert!(matches!(
            result.unwrap_err(),
            crate::types::SessionError::Storage { .. }
        ));
    }
}
