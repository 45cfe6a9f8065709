//! `keyid` → key material lookup (component I).
//!
//! The default process-wide store is a plain `RwLock<HashMap<..>>` behind a
//! lazily-initialized singleton — readers never block each other, writes
//! (`save_key`) are serialized and expected to be quiescent while crypto calls
//! are in flight (§5). Every dispatch entry point also accepts an explicit
//! [`KeyStore`] so the global map is a default, not a hidden requirement.

use crate::ecdh::EcdhPrivateKey;
use crate::error::{Error, Result};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::RwLock;

/// What a `keyid` resolves to.
#[derive(Clone)]
pub enum KeyEntry {
    /// Raw, pre-shared content-key material.
    Raw(Vec<u8>),
    /// An ECDH key pair, optionally labeled for use in the `aesgcm` DH context blob.
    Ecdh {
        private: EcdhPrivateKey,
        label: Option<Vec<u8>>,
    },
}

/// A source of `keyid → KeyEntry` lookups, implemented by the process-wide
/// default store and usable by any caller-supplied alternative.
///
/// `lookup` returns an owned entry rather than a borrow: the default store
/// guards its map with an `RwLock`, whose read guard cannot outlive the call.
pub trait KeyStore: Send + Sync {
    fn lookup(&self, keyid: &str) -> Result<KeyEntry>;
    fn save(&self, keyid: &str, entry: KeyEntry);
}

/// A simple in-memory store, safe for concurrent readers with serialized writers.
///
/// Non-goal (§1): no persistence. Entries live only as long as the process.
#[derive(Default)]
pub struct MemoryKeyStore {
    entries: RwLock<HashMap<String, KeyEntry>>,
}

impl MemoryKeyStore {
    pub fn new() -> Self {
        MemoryKeyStore {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl KeyStore for MemoryKeyStore {
    fn lookup(&self, keyid: &str) -> Result<KeyEntry> {
        self.entries
            .read()
            .expect("keystore lock poisoned")
            .get(keyid)
            .cloned()
            .ok_or_else(|| Error::UnknownKeyId(keyid.to_string()))
    }

    fn save(&self, keyid: &str, entry: KeyEntry) {
        self.entries
            .write()
            .expect("keystore lock poisoned")
            .insert(keyid.to_string(), entry);
    }
}

/// The process-wide default keystore, created empty on first use.
static GLOBAL: Lazy<MemoryKeyStore> = Lazy::new(MemoryKeyStore::new);

/// The default, process-wide keystore.
pub fn global() -> &'static MemoryKeyStore {
    &GLOBAL
}
