//! Identity Store: the only writer of identity state.
//!
//! Holds the current [`Identity`] (or none) and keeps the persisted record
//! in step with it. Every storage failure is logged and degrades to "no
//! session"; nothing here returns an error to the caller.

use tracing::{debug, info, warn};

use crate::identity::{decode_record, encode_record, Identity};

use super::storage::SessionStorage;

/// Fixed key of the persisted session record.
pub const DEFAULT_STORAGE_KEY: &str = "smart_health_user";

/// Written in place of a record that could not be removed. Never decodes.
const TOMBSTONE: &str = "";

/// Current identity plus the medium it is persisted to.
pub struct IdentityStore {
    storage: Box<dyn SessionStorage>,
    key: String,
    current: Option<Identity>,
}

impl std::fmt::Debug for IdentityStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityStore")
            .field("key", &self.key)
            .field("current", &self.current.as_ref().map(Identity::id))
            .finish()
    }
}

impl IdentityStore {
    /// Rehydrate from `storage` under the default key.
    pub fn initialize(storage: Box<dyn SessionStorage>) -> Self {
        Self::initialize_with_key(storage, DEFAULT_STORAGE_KEY)
    }

    /// Rehydrate from `storage` under `key`.
    ///
    /// A missing record yields no identity. A record that fails to decode
    /// is removed from storage and also yields no identity.
    pub fn initialize_with_key(storage: Box<dyn SessionStorage>, key: &str) -> Self {
        let mut store = Self {
            storage,
            key: key.to_owned(),
            current: None,
        };
        let current = store.rehydrate();
        store.current = current;
        store
    }

    fn rehydrate(&mut self) -> Option<Identity> {
        let raw = match self.storage.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key = %self.key, "no persisted session");
                return None;
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "failed to read persisted session");
                let _discarded = self.discard_record();
                return None;
            }
        };

        match decode_record(&raw) {
            Ok(identity) => {
                info!(id = %identity.id(), role = %identity.role(), "session rehydrated");
                Some(identity)
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "discarding corrupt session record");
                let _discarded = self.discard_record();
                None
            }
        }
    }

    /// Remove the persisted record, or failing that overwrite it with a
    /// tombstone the next rehydrate rejects.
    ///
    /// Returns `false` only if neither write reached storage, in which case
    /// a stale identity may still rehydrate.
    fn discard_record(&mut self) -> bool {
        let Err(e) = self.storage.remove(&self.key) else {
            return true;
        };
        warn!(key = %self.key, error = %e, "failed to remove session record");
        match self.storage.set(&self.key, TOMBSTONE) {
            Ok(()) => {
                debug!(key = %self.key, "session record tombstoned");
                true
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "failed to tombstone session record");
                false
            }
        }
    }

    /// Make `identity` current and write it through to storage.
    ///
    /// If the record cannot be written, the store falls back to no identity
    /// so memory never disagrees with storage.
    pub fn establish(&mut self, identity: Identity) {
        let written = encode_record(&identity)
            .map_err(|e| e.to_string())
            .and_then(|raw| {
                self.storage
                    .set(&self.key, &raw)
                    .map_err(|e| e.to_string())
            });

        match written {
            Ok(()) => {
                info!(id = %identity.id(), role = %identity.role(), "session established");
                self.current = Some(identity);
            }
            Err(e) => {
                warn!(id = %identity.id(), error = %e, "failed to persist session, staying signed out");
                self.current = None;
                let _discarded = self.discard_record();
            }
        }
    }

    /// Drop the current identity and remove the persisted record.
    ///
    /// Returns `false` if the record could be neither removed nor
    /// tombstoned, so a later [`IdentityStore::initialize`] may still find it.
    #[must_use = "a false result means the persisted identity survived"]
    pub fn clear(&mut self) -> bool {
        if let Some(identity) = self.current.take() {
            info!(id = %identity.id(), "session cleared");
        }
        self.discard_record()
    }

    /// The present identity, if any.
    pub fn current(&self) -> Option<&Identity> {
        self.current.as_ref()
    }

    /// Storage key of the persisted record.
    pub fn key(&self) -> &str {
        &self.key
    }
}
