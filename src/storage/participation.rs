// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Local participation store.
//!
//! Durable, synchronous persistence of join/leave actions so the UI can
//! answer "am I in this event?" without the network. A faulting backend
//! flips the store into degraded mode: an in-process map takes over for
//! the rest of the process lifetime and callers never see the fault.
//!
//! Validation policy is strict and uniform: `join` rejects empty event
//! ids and identities. `leave` stays permissive; leaving an event you
//! never joined is a no-op success.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use validator::Validate;

use crate::error::{Result, TrackerError};
use crate::models::{JoinedEvent, ParticipantRecord, ParticipantSource, ParticipantStatus};
use crate::storage::{keys, KeyValueStore, MemoryStore, StorageError};
use crate::time_utils::now_ms;

/// Validated input for a join operation.
#[derive(Debug, Clone, Validate)]
pub struct JoinRequest {
    #[validate(length(min = 1, message = "event id must not be empty"))]
    pub event_id: String,
    #[validate(length(min = 1, message = "identity must not be empty"))]
    pub identity: String,
    pub team_id: Option<String>,
    pub event_name: Option<String>,
}

/// Durable join/leave store with in-memory degraded-mode fallback.
pub struct ParticipationStore {
    primary: Arc<dyn KeyValueStore>,
    fallback: MemoryStore,
    degraded: AtomicBool,
}

impl ParticipationStore {
    pub fn new(primary: Arc<dyn KeyValueStore>) -> Self {
        Self {
            primary,
            fallback: MemoryStore::new(),
            degraded: AtomicBool::new(false),
        }
    }

    /// Record a join. Idempotent: a repeat join overwrites `joined_at`
    /// without creating a duplicate entry. Updates both the per-event
    /// participant map and the per-user joined-events index.
    pub fn join(&self, request: &JoinRequest) -> Result<bool> {
        request
            .validate()
            .map_err(|e| TrackerError::Validation(e.to_string()))?;

        let joined_at = now_ms();
        let record = ParticipantRecord {
            identity: request.identity.clone(),
            joined_at,
            status: ParticipantStatus::Active,
            source: ParticipantSource::Local,
            team_id: request.team_id.clone(),
            event_name: request.event_name.clone(),
        };

        let mut participants: BTreeMap<String, ParticipantRecord> =
            self.read_map(&keys::participants(&request.event_id));
        participants.insert(request.identity.clone(), record);
        self.write_map(&keys::participants(&request.event_id), &participants);

        let mut joined: BTreeMap<String, JoinedEvent> =
            self.read_map(&keys::joined(&request.identity));
        joined.insert(
            request.event_id.clone(),
            JoinedEvent {
                joined_at,
                team_id: request.team_id.clone(),
                event_name: request.event_name.clone(),
            },
        );
        self.write_map(&keys::joined(&request.identity), &joined);

        self.index_add(keys::EVENT_INDEX, &request.event_id);
        self.index_add(keys::IDENTITY_INDEX, &request.identity);

        tracing::info!(
            event_id = %request.event_id,
            identity = %request.identity,
            "Joined event locally"
        );
        Ok(true)
    }

    /// Remove a participant entry and its joined-events index entry.
    /// Succeeds whether or not the user was ever a participant.
    pub fn leave(&self, event_id: &str, identity: &str) -> Result<bool> {
        let mut participants: BTreeMap<String, ParticipantRecord> =
            self.read_map(&keys::participants(event_id));
        if participants.remove(identity).is_some() {
            self.write_map(&keys::participants(event_id), &participants);
        }

        let mut joined: BTreeMap<String, JoinedEvent> = self.read_map(&keys::joined(identity));
        if joined.remove(event_id).is_some() {
            self.write_map(&keys::joined(identity), &joined);
        }

        tracing::debug!(event_id, identity, "Left event locally");
        Ok(true)
    }

    /// Pure read: is this identity a local participant of the event?
    pub fn is_participating(&self, event_id: &str, identity: &str) -> bool {
        self.read_map::<ParticipantRecord>(&keys::participants(event_id))
            .contains_key(identity)
    }

    /// Pure read, order-insensitive.
    pub fn list_participants(&self, event_id: &str) -> Vec<ParticipantRecord> {
        self.read_map::<ParticipantRecord>(&keys::participants(event_id))
            .into_values()
            .collect()
    }

    /// Per-user joined-events index: event id -> entry.
    pub fn list_joined_events(&self, identity: &str) -> BTreeMap<String, JoinedEvent> {
        self.read_map(&keys::joined(identity))
    }

    /// Wipe all local participation state. Diagnostic/test use.
    pub fn clear(&self) {
        for event_id in self.index_read(keys::EVENT_INDEX) {
            self.kv_remove(&keys::participants(&event_id));
        }
        for identity in self.index_read(keys::IDENTITY_INDEX) {
            self.kv_remove(&keys::joined(&identity));
        }
        self.kv_remove(keys::EVENT_INDEX);
        self.kv_remove(keys::IDENTITY_INDEX);
        tracing::info!("Cleared local participation state");
    }

    /// Whether the store has fallen back to in-memory storage.
    pub fn is_degraded(&self) -> bool {
        self.degraded.load(Ordering::Relaxed)
    }

    // ─── Backend access with degraded-mode fallback ──────────────

    fn enter_degraded(&self, error: &StorageError) {
        if !self.degraded.swap(true, Ordering::Relaxed) {
            tracing::warn!(
                error = %error,
                "Durable storage unavailable, falling back to in-memory store"
            );
        }
    }

    fn kv_get(&self, key: &str) -> Option<String> {
        if self.is_degraded() {
            return self.fallback.get(key).unwrap_or(None);
        }
        match self.primary.get(key) {
            Ok(value) => value,
            Err(e) => {
                self.enter_degraded(&e);
                self.fallback.get(key).unwrap_or(None)
            }
        }
    }

    fn kv_set(&self, key: &str, value: &str) {
        if !self.is_degraded() {
            match self.primary.set(key, value) {
                Ok(()) => return,
                Err(e) => self.enter_degraded(&e),
            }
        }
        // MemoryStore writes cannot fail.
        let _ = self.fallback.set(key, value);
    }

    fn kv_remove(&self, key: &str) {
        if !self.is_degraded() {
            match self.primary.remove(key) {
                Ok(()) => return,
                Err(e) => self.enter_degraded(&e),
            }
        }
        let _ = self.fallback.remove(key);
    }

    // ─── JSON map (de)serialization ──────────────────────────────

    fn read_map<T: DeserializeOwned>(&self, key: &str) -> BTreeMap<String, T> {
        let Some(raw) = self.kv_get(key) else {
            return BTreeMap::new();
        };
        match serde_json::from_str(&raw) {
            Ok(map) => map,
            Err(e) => {
                tracing::warn!(key, error = %e, "Corrupt stored map, treating as empty");
                BTreeMap::new()
            }
        }
    }

    fn write_map<T: Serialize>(&self, key: &str, map: &BTreeMap<String, T>) {
        match serde_json::to_string(map) {
            Ok(raw) => self.kv_set(key, &raw),
            Err(e) => tracing::warn!(key, error = %e, "Failed to serialize stored map"),
        }
    }

    fn index_read(&self, key: &str) -> Vec<String> {
        let Some(raw) = self.kv_get(key) else {
            return Vec::new();
        };
        serde_json::from_str(&raw).unwrap_or_default()
    }

    fn index_add(&self, key: &str, value: &str) {
        let mut index = self.index_read(key);
        if !index.iter().any(|v| v == value) {
            index.push(value.to_string());
            if let Ok(raw) = serde_json::to_string(&index) {
                self.kv_set(key, &raw);
            }
        }
    }
}
