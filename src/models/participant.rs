// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Participant and joined-event models.

use serde::{Deserialize, Serialize};

/// Participation status. Only active membership is modeled; leaving an
/// event deletes the record rather than soft-deleting it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticipantStatus {
    Active,
}

/// Provenance of a participant record after reconciliation.
///
/// `Hybrid` marks an identity present in both the local join store and
/// the captain-published roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticipantSource {
    Local,
    Official,
    Hybrid,
}

/// One participant of one event.
///
/// `identity` is unique within an event's participant set. `team_id`
/// and `event_name` are local enrichments; roster snapshots never carry
/// a team assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantRecord {
    /// Hex-encoded public key of the participant.
    pub identity: String,
    /// When participation began (ms since epoch). For roster-derived
    /// records this is the roster publication time.
    pub joined_at: i64,
    pub status: ParticipantStatus,
    pub source: ParticipantSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_name: Option<String>,
}

/// Per-user joined-events index entry, keyed by event id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinedEvent {
    pub joined_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_participant_serde_round_trip() {
        let record = ParticipantRecord {
            identity: "ab".repeat(32),
            joined_at: 1_700_000_000_000,
            status: ParticipantStatus::Active,
            source: ParticipantSource::Local,
            team_id: Some("team-tortoise".to_string()),
            event_name: None,
        };

        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"source\":\"local\""));
        assert!(!json.contains("event_name")); // None fields omitted

        let back: ParticipantRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
