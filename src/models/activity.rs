// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Activity (workout) record model and defensive wire parsing.
//!
//! Activity publications in the wild are partially tagged: some carry
//! structured tags, some carry a JSON payload in the content body, and
//! many omit fields. Parsing prefers tags, falls back to content, and
//! defaults anything missing rather than rejecting the record.

use serde::{Deserialize, Serialize};

use crate::protocol::Record;

/// Meters per statute mile, for wire values tagged in miles.
const METERS_PER_MILE: f64 = 1609.344;

/// Activity discipline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityType {
    Run,
    Walk,
    Cycle,
}

impl ActivityType {
    /// Parse a wire label. Unknown labels yield `None`; callers default
    /// to `Run` per the missing-field policy.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "run" | "running" => Some(ActivityType::Run),
            "walk" | "walking" => Some(ActivityType::Walk),
            "cycle" | "cycling" | "ride" | "bike" => Some(ActivityType::Cycle),
            _ => None,
        }
    }

    /// Running and walking report pace; cycling reports speed.
    pub fn is_pace_based(self) -> bool {
        matches!(self, ActivityType::Run | ActivityType::Walk)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ActivityType::Run => "run",
            ActivityType::Walk => "walk",
            ActivityType::Cycle => "cycle",
        }
    }
}

/// One immutable workout submission authored by an identity.
///
/// Canonical distance unit is meters; unit-suffixed wire values are
/// converted at parse time and never stored in display units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    /// Wire record id.
    pub id: String,
    /// Author public key (hex).
    pub identity: String,
    /// Creation time (ms since epoch).
    pub created_at: i64,
    /// Distance in meters.
    pub distance_meters: f64,
    /// Duration in seconds.
    pub duration_secs: f64,
    pub activity_type: ActivityType,
    /// Energy in kcal, zero when untagged.
    pub calories: f64,
    /// Climb in meters, zero when untagged.
    pub elevation_gain: f64,
}

impl ActivityRecord {
    /// Parse a raw wire record into an activity.
    ///
    /// Returns `None` only for records with no usable id or author;
    /// every structured field falls back to zero / `Run` when absent
    /// from both tags and content.
    pub fn from_record(record: &Record) -> Option<Self> {
        if record.id.is_empty() || record.author.is_empty() {
            return None;
        }

        let content = parse_content_object(&record.content);

        let distance_meters = record
            .tag(tags::DISTANCE)
            .and_then(|tag| {
                let value: f64 = tag.arg(1)?.parse().ok()?;
                Some(to_meters(value, tag.arg(2).unwrap_or("m")))
            })
            .or_else(|| {
                let value = content_number(content.as_ref(), "distance")?;
                let unit = content
                    .as_ref()
                    .and_then(|c| c.get("distance_unit"))
                    .and_then(|u| u.as_str())
                    .unwrap_or("m");
                Some(to_meters(value, unit))
            })
            .unwrap_or(0.0);

        let duration_secs = tag_number(record, tags::DURATION)
            .or_else(|| content_number(content.as_ref(), "duration"))
            .unwrap_or(0.0);

        let activity_type = record
            .tag_value(tags::EXERCISE)
            .or_else(|| record.tag_value("type"))
            .and_then(ActivityType::from_label)
            .or_else(|| {
                content
                    .as_ref()
                    .and_then(|c| c.get("type").or_else(|| c.get("exercise")))
                    .and_then(|v| v.as_str())
                    .and_then(ActivityType::from_label)
            })
            .unwrap_or(ActivityType::Run);

        let calories = tag_number(record, tags::CALORIES)
            .or_else(|| content_number(content.as_ref(), "calories"))
            .unwrap_or(0.0);

        let elevation_gain = tag_number(record, tags::ELEVATION_GAIN)
            .or_else(|| content_number(content.as_ref(), "elevation_gain"))
            .unwrap_or(0.0);

        Some(Self {
            id: record.id.clone(),
            identity: record.author.clone(),
            created_at: record.created_at,
            distance_meters,
            duration_secs,
            activity_type,
            calories,
            elevation_gain,
        })
    }
}

/// Tag names on activity records.
pub mod tags {
    pub const DISTANCE: &str = "distance";
    pub const DURATION: &str = "duration";
    pub const EXERCISE: &str = "exercise";
    pub const CALORIES: &str = "calories";
    pub const ELEVATION_GAIN: &str = "elevation_gain";
}

/// Convert a wire distance value to meters given its unit label.
fn to_meters(value: f64, unit: &str) -> f64 {
    match unit.trim().to_ascii_lowercase().as_str() {
        "km" => value * 1000.0,
        "mi" | "mile" | "miles" => value * METERS_PER_MILE,
        _ => value, // meters, or unknown unit taken at face value
    }
}

fn tag_number(record: &Record, name: &str) -> Option<f64> {
    record.tag_value(name)?.parse().ok()
}

fn parse_content_object(content: &str) -> Option<serde_json::Value> {
    if content.is_empty() {
        return None;
    }
    serde_json::from_str::<serde_json::Value>(content)
        .ok()
        .filter(|v| v.is_object())
}

fn content_number(content: Option<&serde_json::Value>, key: &str) -> Option<f64> {
    content?.get(key)?.as_f64()
}
