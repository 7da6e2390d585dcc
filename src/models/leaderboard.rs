//! Leaderboard entry model.
//!
//! Entries are recomputed on every query; nothing here is persisted.

use serde::{Deserialize, Serialize};

/// One ranked row of an event leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// Participant public key (hex).
    pub identity: String,
    /// Total distance in meters, rounded to 2 decimal places.
    pub total_distance_meters: f64,
    /// Total duration in seconds.
    pub total_duration_secs: f64,
    pub total_calories: f64,
    pub total_elevation_gain: f64,
    pub workout_count: u32,
    /// Most recent activity timestamp (ms since epoch).
    pub last_activity_at: i64,
    /// km/h, present when total duration is positive.
    pub average_speed_kmh: Option<f64>,
    /// min/km, present only for pace-based (run/walk) aggregation with
    /// positive distance and duration.
    pub average_pace_min_per_km: Option<f64>,
    /// 1-based position. Dense: unique per row even on metric ties.
    pub rank: u32,
}

impl LeaderboardEntry {
    /// Display-time distance in kilometers. Canonical storage stays in
    /// meters; conversion happens only here.
    pub fn total_distance_km(&self) -> f64 {
        self.total_distance_meters / 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_km_display_conversion() {
        let entry = LeaderboardEntry {
            identity: "ab".repeat(32),
            total_distance_meters: 5210.0,
            total_duration_secs: 1800.0,
            total_calories: 0.0,
            total_elevation_gain: 0.0,
            workout_count: 1,
            last_activity_at: 0,
            average_speed_kmh: None,
            average_pace_min_per_km: None,
            rank: 1,
        };
        assert!((entry.total_distance_km() - 5.21).abs() < 1e-9);
    }
}
