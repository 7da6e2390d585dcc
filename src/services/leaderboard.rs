// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Leaderboard aggregation.
//!
//! Reduces a flat list of activity records into per-identity totals and
//! a deterministic ranking. Nothing is persisted; every query recomputes
//! from scratch.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::Result;
use crate::models::{ActivityRecord, ActivityType, LeaderboardEntry};
use crate::services::{ActivityFetcher, ParticipationReconciler};

/// Optional single-discipline filter for aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActivityTypeFilter {
    #[default]
    All,
    Only(ActivityType),
}

impl ActivityTypeFilter {
    fn admits(self, activity_type: ActivityType) -> bool {
        match self {
            ActivityTypeFilter::All => true,
            ActivityTypeFilter::Only(t) => t == activity_type,
        }
    }

    /// Pace is the primary metric only for single-discipline run/walk
    /// views; cycling and mixed aggregates report speed.
    fn is_pace_based(self) -> bool {
        matches!(self, ActivityTypeFilter::Only(t) if t.is_pace_based())
    }
}

#[derive(Default)]
struct Totals {
    distance_meters: f64,
    duration_secs: f64,
    calories: f64,
    elevation_gain: f64,
    workout_count: u32,
    last_activity_at: i64,
}

/// Aggregate activity records into a ranked leaderboard.
///
/// Identities with no matching activity are simply absent; callers
/// wanting zero-row placeholders cross-reference the participant list
/// themselves. Ordering is total: distance desc, then workout count
/// desc, then most recent activity, then identity. Ranks are dense and
/// 1-based; ties never collapse.
pub fn aggregate(
    activities: &[ActivityRecord],
    type_filter: ActivityTypeFilter,
) -> Vec<LeaderboardEntry> {
    let mut totals: HashMap<&str, Totals> = HashMap::new();

    for activity in activities {
        if !type_filter.admits(activity.activity_type) {
            continue;
        }
        let entry = totals.entry(activity.identity.as_str()).or_default();
        entry.distance_meters += activity.distance_meters;
        entry.duration_secs += activity.duration_secs;
        entry.calories += activity.calories;
        entry.elevation_gain += activity.elevation_gain;
        entry.workout_count += 1;
        entry.last_activity_at = entry.last_activity_at.max(activity.created_at);
    }

    let pace_based = type_filter.is_pace_based();
    let mut entries: Vec<LeaderboardEntry> = totals
        .into_iter()
        .map(|(identity, t)| {
            let average_speed_kmh = if t.duration_secs > 0.0 {
                Some((t.distance_meters / 1000.0) / (t.duration_secs / 3600.0))
            } else {
                None
            };
            let average_pace_min_per_km =
                if pace_based && t.distance_meters > 0.0 && t.duration_secs > 0.0 {
                    Some((t.duration_secs / 60.0) / (t.distance_meters / 1000.0))
                } else {
                    None
                };

            LeaderboardEntry {
                identity: identity.to_string(),
                // Rounded for display stability across recomputations.
                total_distance_meters: (t.distance_meters * 100.0).round() / 100.0,
                total_duration_secs: t.duration_secs,
                total_calories: t.calories,
                total_elevation_gain: t.elevation_gain,
                workout_count: t.workout_count,
                last_activity_at: t.last_activity_at,
                average_speed_kmh,
                average_pace_min_per_km,
                rank: 0,
            }
        })
        .collect();

    entries.sort_by(|a, b| {
        b.total_distance_meters
            .total_cmp(&a.total_distance_meters)
            .then_with(|| b.workout_count.cmp(&a.workout_count))
            .then_with(|| b.last_activity_at.cmp(&a.last_activity_at))
            .then_with(|| a.identity.cmp(&b.identity))
    });
    for (i, entry) in entries.iter_mut().enumerate() {
        entry.rank = (i + 1) as u32;
    }

    entries
}

/// Orchestrates the full leaderboard query: reconcile participants,
/// fetch their activities for the window, aggregate and rank.
#[derive(Clone)]
pub struct LeaderboardService {
    reconciler: ParticipationReconciler,
    fetcher: Arc<ActivityFetcher>,
}

impl LeaderboardService {
    pub fn new(reconciler: ParticipationReconciler, fetcher: Arc<ActivityFetcher>) -> Self {
        Self {
            reconciler,
            fetcher,
        }
    }

    /// Ranked leaderboard for one event. An event with no participants
    /// or no matching activities yields an empty leaderboard, not an
    /// error.
    pub async fn event_leaderboard(
        &self,
        event_id: &str,
        captain: Option<&str>,
        start_ms: i64,
        end_ms: Option<i64>,
        type_filter: ActivityTypeFilter,
    ) -> Result<Vec<LeaderboardEntry>> {
        let participants = self.reconciler.reconcile(event_id, captain).await?;
        if participants.is_empty() {
            return Ok(Vec::new());
        }

        let identities: Vec<String> = participants.into_iter().map(|p| p.identity).collect();
        let activities = self
            .fetcher
            .fetch_activities(&identities, start_ms, end_ms)
            .await?;

        Ok(aggregate(&activities, type_filter))
    }
}
