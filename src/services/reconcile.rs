// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Participation reconciliation.
//!
//! Merges the optimistic local join store with the eventually-consistent
//! captain roster into one deduplicated, provenance-annotated list. The
//! contract: no identity appears twice, and `source` accurately reflects
//! where each record came from after the merge.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{Result, TrackerError};
use crate::models::{ParticipantRecord, ParticipantSource};
use crate::services::RosterService;
use crate::storage::ParticipationStore;

/// Merge local and remote participant sets, keyed by identity.
///
/// Local entries seed the output in their given order; remote entries
/// overlay in theirs. An identity on both sides becomes one `Hybrid`
/// record: remote-supplied fields (`joined_at`, `status`) win, and
/// local-only enrichments (`team_id`, `event_name`) fill in where the
/// remote record carries none. Output order is the insertion order of
/// the merge; callers wanting stable display order sort explicitly.
pub fn merge_participants(
    local: Vec<ParticipantRecord>,
    remote: Vec<ParticipantRecord>,
) -> Vec<ParticipantRecord> {
    let mut merged: Vec<ParticipantRecord> = Vec::with_capacity(local.len() + remote.len());
    let mut index: HashMap<String, usize> = HashMap::with_capacity(local.len() + remote.len());

    for record in local {
        // Duplicate identities within the local input: first wins.
        if !index.contains_key(&record.identity) {
            index.insert(record.identity.clone(), merged.len());
            merged.push(record);
        }
    }

    for record in remote {
        match index.get(&record.identity) {
            Some(&i) => {
                let combined = merge_pair(&merged[i], record);
                merged[i] = combined;
            }
            None => {
                index.insert(record.identity.clone(), merged.len());
                merged.push(ParticipantRecord {
                    source: ParticipantSource::Official,
                    ..record
                });
            }
        }
    }

    merged
}

/// Explicit precedence for an identity present on both sides.
fn merge_pair(local: &ParticipantRecord, remote: ParticipantRecord) -> ParticipantRecord {
    ParticipantRecord {
        identity: remote.identity,
        joined_at: remote.joined_at,
        status: remote.status,
        source: ParticipantSource::Hybrid,
        team_id: remote.team_id.or_else(|| local.team_id.clone()),
        event_name: remote.event_name.or_else(|| local.event_name.clone()),
    }
}

/// Produces the canonical participant view for an event.
#[derive(Clone)]
pub struct ParticipationReconciler {
    store: Arc<ParticipationStore>,
    roster: Arc<RosterService>,
}

impl ParticipationReconciler {
    pub fn new(store: Arc<ParticipationStore>, roster: Arc<RosterService>) -> Self {
        Self { store, roster }
    }

    /// One canonical participant list for the event.
    ///
    /// The local snapshot is read once up front and never re-read
    /// mid-merge. The remote roster is best-effort: when it cannot be
    /// fetched the local-only view is returned, never an error. Pass
    /// `None` for `captain` when the event has no official roster
    /// source.
    pub async fn reconcile(
        &self,
        event_id: &str,
        captain: Option<&str>,
    ) -> Result<Vec<ParticipantRecord>> {
        if event_id.is_empty() {
            return Err(TrackerError::Validation("event id must not be empty".into()));
        }

        let local = self.store.list_participants(event_id);

        let remote = match captain.filter(|c| !c.is_empty()) {
            Some(captain) => match self.roster.fetch_official_roster(event_id, captain).await {
                Ok(remote) => remote,
                Err(e) if e.is_transient() => {
                    tracing::warn!(event_id, error = %e, "Roster unavailable, using local-only view");
                    Vec::new()
                }
                Err(e) => return Err(e),
            },
            None => Vec::new(),
        };

        Ok(merge_participants(local, remote))
    }
}
