// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - participation and leaderboard business logic.

pub mod activity;
pub mod leaderboard;
pub mod reconcile;
pub mod roster;

pub use activity::ActivityFetcher;
pub use leaderboard::{aggregate, ActivityTypeFilter, LeaderboardService};
pub use reconcile::{merge_participants, ParticipationReconciler};
pub use roster::RosterService;

/// An identity key is a hex-encoded public key of the configured
/// length (64 chars for a 32-byte key).
pub(crate) fn is_valid_identity(identity: &str, expected_len: usize) -> bool {
    identity.len() == expected_len && hex::decode(identity).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_validation() {
        let good = "ab".repeat(32);
        assert!(is_valid_identity(&good, 64));
        assert!(!is_valid_identity("too-short", 64));
        assert!(!is_valid_identity(&"zz".repeat(32), 64)); // not hex
        assert!(!is_valid_identity(&"ab".repeat(33), 64)); // wrong length
    }
}
