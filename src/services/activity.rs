// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity fetching service.
//!
//! Retrieves workout records authored by a set of identities within a
//! half-open time window `[start, end)`. Fetching is always best-effort:
//! a failed or timed-out query contributes nothing rather than blocking
//! a leaderboard render. Bad arguments, by contrast, error immediately
//! so caller bugs surface early.

use std::sync::Arc;

use futures_util::{stream, StreamExt};

use crate::config::Config;
use crate::error::{Result, TrackerError};
use crate::models::ActivityRecord;
use crate::protocol::{kinds, Filter, NetworkClient};
use crate::services::is_valid_identity;
use crate::time_utils::{format_ms_rfc3339, now_ms};

/// Fetches time-windowed activity records from the network.
pub struct ActivityFetcher {
    network: Arc<dyn NetworkClient>,
    config: Config,
}

impl ActivityFetcher {
    pub fn new(network: Arc<dyn NetworkClient>, config: Config) -> Self {
        Self { network, config }
    }

    /// Fetch activities authored by `identities` within `[start_ms, end_ms)`.
    ///
    /// `end_ms` defaults to now for open-ended events. Malformed
    /// identities are dropped before querying; if none survive, resolves
    /// to an empty list without touching the network.
    pub async fn fetch_activities(
        &self,
        identities: &[String],
        start_ms: i64,
        end_ms: Option<i64>,
    ) -> Result<Vec<ActivityRecord>> {
        let end_ms = end_ms.unwrap_or_else(now_ms);
        self.validate_window(start_ms, end_ms)?;

        let mut valid: Vec<&String> = Vec::with_capacity(identities.len());
        for identity in identities {
            if is_valid_identity(identity, self.config.identity_key_len) {
                if !valid.contains(&identity) {
                    valid.push(identity);
                }
            } else {
                tracing::debug!(identity = %identity, "Dropping malformed identity");
            }
        }
        if valid.is_empty() {
            return Ok(Vec::new());
        }

        let chunks: Vec<Vec<String>> = valid
            .chunks(self.config.max_authors_per_query)
            .map(|chunk| chunk.iter().map(|s| s.to_string()).collect())
            .collect();

        let records: Vec<_> = stream::iter(chunks)
            .map(|authors| self.query_chunk(authors, start_ms, end_ms))
            .buffer_unordered(self.config.max_concurrent_queries)
            .collect::<Vec<_>>()
            .await
            .into_iter()
            .flatten()
            .collect();

        let mut activities: Vec<ActivityRecord> = records
            .iter()
            .filter_map(ActivityRecord::from_record)
            // Relays are not trusted to honor the window exactly.
            .filter(|a| a.created_at >= start_ms && a.created_at < end_ms)
            .collect();

        activities.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });

        tracing::debug!(
            identities = valid.len(),
            activities = activities.len(),
            window_start = %format_ms_rfc3339(start_ms),
            window_end = %format_ms_rfc3339(end_ms),
            "Fetched activities"
        );
        Ok(activities)
    }

    /// One best-effort chunk query: failure and timeout both degrade to
    /// an empty contribution with a logged warning.
    async fn query_chunk(
        &self,
        authors: Vec<String>,
        start_ms: i64,
        end_ms: i64,
    ) -> Vec<crate::protocol::Record> {
        let filter = Filter::new()
            .kinds(&[kinds::ACTIVITY])
            .authors(authors)
            .since(start_ms)
            .until(end_ms);

        match tokio::time::timeout(self.config.query_timeout, self.network.query(&filter)).await {
            Ok(Ok(records)) => records,
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Activity query failed, skipping chunk");
                Vec::new()
            }
            Err(_) => {
                tracing::warn!("Activity query timed out, skipping chunk");
                Vec::new()
            }
        }
    }

    fn validate_window(&self, start_ms: i64, end_ms: i64) -> Result<()> {
        if start_ms <= 0 {
            return Err(TrackerError::Validation(format!(
                "window start must be a positive timestamp, got {}",
                start_ms
            )));
        }
        if end_ms <= start_ms {
            return Err(TrackerError::Validation(format!(
                "window end {} must exceed start {}",
                end_ms, start_ms
            )));
        }
        let now = now_ms();
        if start_ms < now - self.config.max_window_past_ms {
            return Err(TrackerError::Validation(format!(
                "window start {} is unreasonably far in the past",
                format_ms_rfc3339(start_ms)
            )));
        }
        if end_ms > now + self.config.max_window_future_ms {
            return Err(TrackerError::Validation(format!(
                "window end {} is unreasonably far in the future",
                format_ms_rfc3339(end_ms)
            )));
        }
        Ok(())
    }
}
