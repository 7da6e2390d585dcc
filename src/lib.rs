// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Runclub core: hybrid participation and leaderboards for running
//! events on a decentralized pub-sub network.
//!
//! This crate is the non-UI core of a running-club application: an
//! optimistic local join/leave store, a best-effort fetcher for
//! captain-published event rosters, a reconciler that merges the two
//! into one deduplicated participant view, and a leaderboard built from
//! time-windowed workout records. Identity, signing, transport, and
//! durable storage are supplied by the embedding application through
//! the traits in [`protocol`] and [`storage`].

pub mod config;
pub mod error;
pub mod models;
pub mod protocol;
pub mod services;
pub mod storage;
pub mod time_utils;

use std::sync::Arc;

use config::Config;
use error::Result;
use protocol::{NetworkClient, Signer};
use services::{ActivityFetcher, LeaderboardService, ParticipationReconciler, RosterService};
use storage::{JoinRequest, KeyValueStore, ParticipationStore};

/// Composition root: every component, wired once from the injected
/// collaborators. Construct one per identity/session and share it;
/// there is no module-level singleton anywhere in the crate.
pub struct TrackerContext {
    pub config: Config,
    pub participation: Arc<ParticipationStore>,
    pub roster: Arc<RosterService>,
    pub activities: Arc<ActivityFetcher>,
    pub reconciler: ParticipationReconciler,
    pub leaderboard: LeaderboardService,
}

impl TrackerContext {
    pub fn new(
        config: Config,
        storage: Arc<dyn KeyValueStore>,
        network: Arc<dyn NetworkClient>,
        signer: Arc<dyn Signer>,
    ) -> Self {
        let participation = Arc::new(ParticipationStore::new(storage));
        let roster = Arc::new(RosterService::new(
            network.clone(),
            signer,
            config.clone(),
        ));
        let activities = Arc::new(ActivityFetcher::new(network, config.clone()));
        let reconciler = ParticipationReconciler::new(participation.clone(), roster.clone());
        let leaderboard = LeaderboardService::new(reconciler.clone(), activities.clone());

        Self {
            config,
            participation,
            roster,
            activities,
            reconciler,
            leaderboard,
        }
    }

    /// UI-facing join: validates and records the join locally.
    pub fn join_event(
        &self,
        event_id: &str,
        identity: &str,
        team_id: Option<&str>,
        event_name: Option<&str>,
    ) -> Result<bool> {
        self.participation.join(&JoinRequest {
            event_id: event_id.to_string(),
            identity: identity.to_string(),
            team_id: team_id.map(str::to_string),
            event_name: event_name.map(str::to_string),
        })
    }

    /// UI-facing leave: always a success, even if never joined.
    pub fn leave_event(&self, event_id: &str, identity: &str) -> Result<bool> {
        self.participation.leave(event_id, identity)
    }
}
