// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared test harness: in-process network fake, deterministic signer,
//! and a fault-injecting storage backend.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Once};

use async_trait::async_trait;

use runclub_core::config::Config;
use runclub_core::protocol::{
    kinds, Filter, NetworkClient, NetworkError, PublishAck, Record, RecordDraft, Signer, Tag,
};
use runclub_core::storage::{KeyValueStore, MemoryStore, StorageError};
use runclub_core::TrackerContext;

static INIT_TRACING: Once = Once::new();

/// Install a test log subscriber once per binary. Honors `RUST_LOG`;
/// output is captured per test by the harness.
pub fn init_tracing() {
    INIT_TRACING.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .init();
    });
}

/// In-process pub-sub fake. Holds a flat record set, evaluates filters
/// locally, and can be flipped into failure mode per direction.
#[derive(Default)]
pub struct MockNetwork {
    records: Mutex<Vec<Record>>,
    fail_queries: AtomicBool,
    fail_publishes: AtomicBool,
}

impl MockNetwork {
    #[allow(dead_code)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a record as if some other client had published it.
    #[allow(dead_code)]
    pub fn add_record(&self, record: Record) {
        self.records.lock().unwrap().push(record);
    }

    #[allow(dead_code)]
    pub fn set_fail_queries(&self, fail: bool) {
        self.fail_queries.store(fail, Ordering::Relaxed);
    }

    #[allow(dead_code)]
    pub fn set_fail_publishes(&self, fail: bool) {
        self.fail_publishes.store(fail, Ordering::Relaxed);
    }

    #[allow(dead_code)]
    pub fn record_count(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

#[async_trait]
impl NetworkClient for MockNetwork {
    async fn query(&self, filter: &Filter) -> Result<Vec<Record>, NetworkError> {
        if self.fail_queries.load(Ordering::Relaxed) {
            return Err(NetworkError::Transport("relay unreachable".into()));
        }
        let records = self.records.lock().unwrap();
        Ok(records.iter().filter(|r| filter.matches(r)).cloned().collect())
    }

    async fn publish(&self, record: Record) -> Result<PublishAck, NetworkError> {
        if self.fail_publishes.load(Ordering::Relaxed) {
            return Err(NetworkError::Transport("relay rejected write".into()));
        }
        self.records.lock().unwrap().push(record);
        Ok(PublishAck {
            accepted: 1,
            relay_ids: vec!["wss://relay.test".to_string()],
        })
    }
}

/// Deterministic signer: stamps the configured public key and a
/// sequential record id. No real cryptography in tests.
pub struct TestSigner {
    key: String,
    counter: AtomicU64,
}

impl TestSigner {
    pub fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            counter: AtomicU64::new(0),
        }
    }
}

impl Signer for TestSigner {
    fn public_key(&self) -> String {
        self.key.clone()
    }

    fn sign(&self, draft: RecordDraft) -> anyhow::Result<Record> {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        Ok(Record {
            id: format!("signed-{}-{}", self.key.chars().take(8).collect::<String>(), n),
            author: self.key.clone(),
            kind: draft.kind,
            created_at: draft.created_at,
            tags: draft.tags,
            content: draft.content,
        })
    }
}

/// Storage backend where every call fails, for degraded-mode tests.
#[allow(dead_code)]
pub struct FailingKv;

impl KeyValueStore for FailingKv {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError("quota exceeded".into()))
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError("quota exceeded".into()))
    }

    fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError("quota exceeded".into()))
    }
}

/// A valid 64-char hex identity derived from one byte.
#[allow(dead_code)]
pub fn identity(n: u8) -> String {
    format!("{:02x}", n).repeat(32)
}

/// Full context wired to the mock network, an in-memory store, and a
/// deterministic signer for `signer_key`.
#[allow(dead_code)]
pub fn test_context(network: Arc<MockNetwork>, signer_key: &str) -> TrackerContext {
    init_tracing();
    TrackerContext::new(
        Config::default(),
        Arc::new(MemoryStore::new()),
        network,
        Arc::new(TestSigner::new(signer_key)),
    )
}

/// A workout record published by `author` at `created_at`, with the
/// structured fields carried as discrete tags.
#[allow(dead_code)]
pub fn activity_record(
    id: &str,
    author: &str,
    created_at: i64,
    distance_km: f64,
    duration_secs: u64,
    exercise: &str,
) -> Record {
    Record {
        id: id.to_string(),
        author: author.to_string(),
        kind: kinds::ACTIVITY,
        created_at,
        tags: vec![
            Tag::from_parts(&["distance", &distance_km.to_string(), "km"]),
            Tag::from_parts(&["duration", &duration_secs.to_string()]),
            Tag::from_parts(&["exercise", exercise]),
        ],
        content: String::new(),
    }
}
