// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the participation and leaderboard core.

pub mod activity;
pub mod leaderboard;
pub mod participant;

pub use activity::{ActivityRecord, ActivityType};
pub use leaderboard::LeaderboardEntry;
pub use participant::{JoinedEvent, ParticipantRecord, ParticipantSource, ParticipantStatus};
