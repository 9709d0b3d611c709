//! In-memory storage with on-demand re-encryption.
//!
//! The store maps client-chosen identifiers to (delegation token, wrapped
//! key, sealed payload) triples. Reads transform the wrapped key for the
//! delegatee; the stored entry itself never changes. Writers take the lock
//! exclusively, readers share it and clone the entry before doing the
//! pairing so the lock is never held across curve arithmetic.

use std::collections::HashMap;

use parking_lot::RwLock;
use tracing::{debug, info};

use crate::cipher::{FirstLevelKey, ReEncryptionKey, SecondLevelKey};
use crate::err::{Error, Result};
use crate::proxy;

/// One stored delegation: token, wrapped symmetric key, sealed payload.
#[derive(Clone, Debug)]
pub struct StoredEntry {
    /// Delegation token consumed by the proxy transform.
    pub rekey: ReEncryptionKey,
    /// Second-level wrapped symmetric key.
    pub key: SecondLevelKey,
    /// Sealed payload (nonce || ciphertext || tag).
    pub data: Vec<u8>,
}

/// Thread-safe id -> entry store.
#[derive(Debug, Default)]
pub struct ProxyStore {
    entries: RwLock<HashMap<String, StoredEntry>>,
}

impl ProxyStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes and stores an entry under `id`, replacing any previous entry
    /// with the same id (last writer wins). Both byte fields go through the
    /// strict canonical decoders; any failure rejects the call without
    /// touching the map.
    pub fn store(&self, id: &str, rekey: &[u8], key: &[u8], data: Vec<u8>) -> Result<String> {
        let entry = StoredEntry {
            rekey: ReEncryptionKey::from_bytes(rekey)?,
            key: SecondLevelKey::from_bytes(key)?,
            data,
        };
        self.entries.write().insert(id.to_owned(), entry);
        info!(id, "stored delegation entry");
        Ok(id.to_owned())
    }

    /// Looks up `id` and returns the transformed wrapped key together with
    /// the sealed payload. Read-only and deterministic; the same entry can
    /// serve any number of requests.
    pub fn request(&self, id: &str) -> Result<(FirstLevelKey, Vec<u8>)> {
        let entry = self
            .entries
            .read()
            .get(id)
            .cloned()
            .ok_or(Error::NotFound)?;

        let transformed = proxy::re_encrypt(&entry.key, &entry.rekey);
        debug!(id, "served re-encryption request");
        Ok((transformed, entry.data))
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
