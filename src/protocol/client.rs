// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client traits the embedding application supplies.
//!
//! The core never opens sockets or touches key material: it talks to
//! the pub-sub network through [`NetworkClient`] and obtains signed
//! records through [`Signer`]. Both are injected at construction
//! (no module-level singletons).

use async_trait::async_trait;

use crate::protocol::{Filter, Record, RecordDraft};

/// Transport-level failure from the pub-sub network.
#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    #[error("query timed out")]
    Timeout,

    #[error("transport error: {0}")]
    Transport(String),
}

/// Relay acknowledgment summary for a publish.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishAck {
    /// Number of relays that accepted the record.
    pub accepted: usize,
    /// Identifiers of the accepting relays.
    pub relay_ids: Vec<String>,
}

/// Pub-sub network access. Every call is fallible and may suspend at
/// the I/O boundary; callers apply their own timeouts.
#[async_trait]
pub trait NetworkClient: Send + Sync {
    /// Fetch the set of records matching `filter`.
    async fn query(&self, filter: &Filter) -> Result<Vec<Record>, NetworkError>;

    /// Publish one signed record, returning the relay acknowledgments.
    async fn publish(&self, record: Record) -> Result<PublishAck, NetworkError>;
}

/// Identity and signing capability. Implementations hold the private
/// key; the core only ever sees the public key and finished records.
pub trait Signer: Send + Sync {
    /// Hex-encoded public key of the current identity.
    fn public_key(&self) -> String;

    /// Sign a draft, producing a complete record with id and author set.
    fn sign(&self, draft: RecordDraft) -> anyhow::Result<Record>;
}
