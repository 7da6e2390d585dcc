// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent propagation rules.
//!
//! Read-path network failures are absorbed component-locally and never
//! reach callers as errors; validation and publish failures always do.

/// Core error type for participation and leaderboard operations.
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Publish failed for event {event_id}: {message}")]
    Publish { event_id: String, message: String },

    #[error("Durable storage unavailable: {0}")]
    StorageDegraded(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl TrackerError {
    /// True for errors a read path is allowed to absorb (degrade to
    /// empty/local data) rather than propagate.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            TrackerError::Network(_) | TrackerError::StorageDegraded(_)
        )
    }
}

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TrackerError>;
