// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Official roster fetching and publication.
//!
//! Rosters are snapshot-style records a team captain publishes: one
//! `d` tag naming the event, one `p` tag per member. The most recently
//! created publication is authoritative; earlier ones are discarded.
//!
//! Reads are best-effort and degrade to an empty list. Writes fail
//! loudly; a roster publish the captain believes succeeded must not
//! have silently gone nowhere.

use std::collections::HashSet;
use std::sync::Arc;

use dashmap::DashMap;

use crate::config::Config;
use crate::error::{Result, TrackerError};
use crate::models::{ParticipantRecord, ParticipantSource, ParticipantStatus};
use crate::protocol::{kinds, Filter, NetworkClient, PublishAck, Record, RecordDraft, Signer, Tag};
use crate::services::is_valid_identity;
use crate::time_utils::now_ms;

/// Fetches and publishes captain-authored event rosters.
pub struct RosterService {
    network: Arc<dyn NetworkClient>,
    signer: Arc<dyn Signer>,
    config: Config,
    /// Non-empty fetch results, keyed by `event_id:captain`. Explicitly
    /// invalidated via [`clear_cache`](Self::clear_cache) and on our own
    /// publishes; captains update rosters at unpredictable times, so no
    /// time-based expiry.
    cache: DashMap<String, Vec<ParticipantRecord>>,
}

impl RosterService {
    pub fn new(network: Arc<dyn NetworkClient>, signer: Arc<dyn Signer>, config: Config) -> Self {
        Self {
            network,
            signer,
            config,
            cache: DashMap::new(),
        }
    }

    /// Fetch the authoritative roster for an event.
    ///
    /// Absence, network failure, and timeout all yield `Ok(vec![])`:
    /// "no official roster yet" is a displayable empty state, not an
    /// error. Only malformed arguments error.
    pub async fn fetch_official_roster(
        &self,
        event_id: &str,
        captain: &str,
    ) -> Result<Vec<ParticipantRecord>> {
        if event_id.is_empty() {
            return Err(TrackerError::Validation("event id must not be empty".into()));
        }
        if captain.is_empty() {
            return Err(TrackerError::Validation(
                "captain identity must not be empty".into(),
            ));
        }

        let cache_key = cache_key(event_id, captain);
        if let Some(cached) = self.cache.get(&cache_key) {
            return Ok(cached.value().clone());
        }

        let filter = Filter::new()
            .kinds(&[kinds::ROSTER])
            .authors([captain])
            .tag("d", event_id);

        let records = match tokio::time::timeout(
            self.config.query_timeout,
            self.network.query(&filter),
        )
        .await
        {
            Ok(Ok(records)) => records,
            Ok(Err(e)) => {
                tracing::warn!(event_id, captain, error = %e, "Roster query failed");
                return Ok(Vec::new());
            }
            Err(_) => {
                tracing::warn!(event_id, captain, "Roster query timed out");
                return Ok(Vec::new());
            }
        };

        // Relays are not trusted to honor the author/tag filter exactly;
        // a record from anyone but the captain must never win.
        let records: Vec<Record> = records.into_iter().filter(|r| filter.matches(r)).collect();

        let roster = match newest_roster(records) {
            Some(roster) => roster,
            None => {
                tracing::debug!(event_id, captain, "No official roster published yet");
                return Ok(Vec::new());
            }
        };

        let participants = roster_participants(&roster);
        tracing::debug!(
            event_id,
            captain,
            members = participants.len(),
            "Fetched official roster"
        );

        if !participants.is_empty() {
            self.cache.insert(cache_key, participants.clone());
        }
        Ok(participants)
    }

    /// Whether an identity appears on the event's official roster.
    pub async fn is_member(&self, event_id: &str, captain: &str, identity: &str) -> Result<bool> {
        let roster = self.fetch_official_roster(event_id, captain).await?;
        Ok(roster.iter().any(|p| p.identity == identity))
    }

    /// Publish a roster snapshot for an event. Captain-only; the record
    /// is authored by the injected signer's identity.
    ///
    /// Unlike the read path, failure here propagates: a malformed draft,
    /// a signing failure, or zero accepting relays is an error.
    pub async fn publish_official_roster(
        &self,
        event_id: &str,
        members: &[String],
        event_name: &str,
    ) -> Result<PublishAck> {
        if event_id.is_empty() {
            return Err(TrackerError::Validation("event id must not be empty".into()));
        }

        let mut tags = vec![Tag::from_parts(&["d", event_id])];
        if !event_name.is_empty() {
            tags.push(Tag::from_parts(&["name", event_name]));
        }

        let mut seen = HashSet::new();
        for member in members {
            if !is_valid_identity(member, self.config.identity_key_len) {
                tracing::warn!(event_id, member = %member, "Skipping malformed member identity");
                continue;
            }
            if seen.insert(member.as_str()) {
                tags.push(Tag::from_parts(&["p", member]));
            }
        }

        let draft = RecordDraft {
            kind: kinds::ROSTER,
            created_at: now_ms(),
            tags,
            content: String::new(),
        };

        let record = self.signer.sign(draft).map_err(|e| TrackerError::Publish {
            event_id: event_id.to_string(),
            message: format!("signing failed: {}", e),
        })?;

        let ack = self
            .network
            .publish(record)
            .await
            .map_err(|e| TrackerError::Publish {
                event_id: event_id.to_string(),
                message: e.to_string(),
            })?;

        if ack.accepted == 0 {
            return Err(TrackerError::Publish {
                event_id: event_id.to_string(),
                message: "no relay accepted the roster".to_string(),
            });
        }

        // Our own view of this roster is now stale.
        self.cache
            .remove(&cache_key(event_id, &self.signer.public_key()));

        tracing::info!(
            event_id,
            members = members.len(),
            relays = ack.accepted,
            "Published official roster"
        );
        Ok(ack)
    }

    /// Drop every cached roster result.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}

fn cache_key(event_id: &str, captain: &str) -> String {
    format!("{}:{}", event_id, captain)
}

/// Pick the authoritative (newest) roster publication. Ties on
/// `created_at` break by record id so the choice is deterministic.
fn newest_roster(records: Vec<Record>) -> Option<Record> {
    records
        .into_iter()
        .filter(|r| r.kind == kinds::ROSTER)
        .max_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        })
}

/// Expand a roster record into participant records. Members share the
/// publication's creation time; rosters are snapshots, not per-member
/// timestamped.
fn roster_participants(roster: &Record) -> Vec<ParticipantRecord> {
    let event_name = roster.tag_value("name").map(str::to_string);
    let mut seen = HashSet::new();
    roster
        .tag_values("p")
        .filter(|identity| !identity.is_empty() && seen.insert(identity.to_string()))
        .map(|identity| ParticipantRecord {
            identity: identity.to_string(),
            joined_at: roster.created_at,
            status: ParticipantStatus::Active,
            source: ParticipantSource::Official,
            team_id: None,
            event_name: event_name.clone(),
        })
        .collect()
}
