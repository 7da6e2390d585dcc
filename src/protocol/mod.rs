// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Network/pub-sub boundary: wire record shapes and the client traits
//! the embedding application implements.

pub mod client;
pub mod record;

pub use client::{NetworkClient, NetworkError, PublishAck, Signer};
pub use record::{kinds, Filter, Record, RecordDraft, Tag, TagFilter};
