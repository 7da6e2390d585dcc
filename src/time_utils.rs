// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for millisecond timestamps.
//!
//! Every timestamp in this crate is an `i64` of milliseconds since the
//! Unix epoch, including the wire records' `created_at`.

use chrono::{DateTime, SecondsFormat, Utc};

/// Current wall-clock time in milliseconds since epoch.
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Format a millisecond timestamp as RFC3339 with a `Z` suffix, for
/// logging and display. Out-of-range values render as the epoch.
pub fn format_ms_rfc3339(ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(ms)
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
        .to_rfc3339_opts(SecondsFormat::Secs, true)
}
