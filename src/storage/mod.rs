//! Durable-storage boundary and the local participation store.
//!
//! The embedding application supplies a flat string key-value backend
//! (browser localStorage, a file, a database); the core serializes its
//! own structures on top and degrades to an in-process map when the
//! backend faults.

pub mod participation;

pub use participation::{JoinRequest, ParticipationStore};

use dashmap::DashMap;

/// Fault from the durable key-value backend.
#[derive(Debug, thiserror::Error)]
#[error("storage backend error: {0}")]
pub struct StorageError(pub String);

/// Flat string key-value persistence supplied by the host application.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// In-memory reference implementation, also used as the degraded-mode
/// fallback inside [`ParticipationStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    map: DashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.map.get(key).map(|v| v.value().clone()))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.map.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.map.remove(key);
        Ok(())
    }
}

/// Storage key layout.
pub mod keys {
    /// Per-event participant map: identity -> participant record.
    pub fn participants(event_id: &str) -> String {
        format!("participants:{}", event_id)
    }

    /// Per-user joined-events index: event id -> joined entry.
    pub fn joined(identity: &str) -> String {
        format!("joined:{}", identity)
    }

    /// Index of every event id with a participant map, so `clear` can
    /// enumerate a flat key-value backend.
    pub const EVENT_INDEX: &str = "index:events";
    /// Index of every identity with a joined-events map.
    pub const IDENTITY_INDEX: &str = "index:identities";
}
