// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Wire record and query filter types.
//!
//! Records are signed pub-sub events: an author key, a numeric kind,
//! free-form tags, and a content body. Timestamps are milliseconds
//! since epoch, matching the rest of the crate.

use serde::{Deserialize, Serialize};

/// Application-level record kinds.
pub mod kinds {
    /// Captain-authored roster snapshot: one `d` tag carrying the event
    /// id, one `p` tag per member identity.
    pub const ROSTER: u32 = 30000;
    /// Workout record with structured distance/duration/exercise tags
    /// or an equivalent JSON content body.
    pub const ACTIVITY: u32 = 1301;
}

/// Simple tag wrapper preserving tag fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tag(pub Vec<String>);

impl Tag {
    pub fn from_parts(parts: &[&str]) -> Self {
        Tag(parts.iter().map(|p| p.to_string()).collect())
    }

    /// Tag name (first field).
    pub fn name(&self) -> Option<&str> {
        self.arg(0)
    }

    /// Primary value (second field).
    pub fn value(&self) -> Option<&str> {
        self.arg(1)
    }

    pub fn arg(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }
}

/// A signed record as returned by the network.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Record {
    pub id: String,
    /// Author public key (hex).
    pub author: String,
    pub kind: u32,
    /// Creation time (ms since epoch).
    pub created_at: i64,
    pub tags: Vec<Tag>,
    pub content: String,
}

impl Record {
    /// First tag with the given name.
    pub fn tag(&self, name: &str) -> Option<&Tag> {
        self.tags.iter().find(|t| t.name() == Some(name))
    }

    /// Primary value of the first tag with the given name.
    pub fn tag_value(&self, name: &str) -> Option<&str> {
        self.tag(name).and_then(Tag::value)
    }

    /// Primary values of every tag with the given name, in tag order.
    pub fn tag_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> {
        self.tags
            .iter()
            .filter(move |t| t.name() == Some(name))
            .filter_map(Tag::value)
    }
}

/// An unsigned record awaiting a [`crate::protocol::Signer`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordDraft {
    pub kind: u32,
    pub created_at: i64,
    pub tags: Vec<Tag>,
    pub content: String,
}

/// Tag-equality constraint, e.g. event-id tag `d` equals `"5k-challenge"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagFilter {
    pub name: String,
    pub value: String,
}

/// Query filter over records.
///
/// Empty `kinds`/`authors` match any kind/author. The time range is
/// half-open: `since` inclusive, `until` exclusive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    pub kinds: Vec<u32>,
    pub authors: Vec<String>,
    pub tag: Option<TagFilter>,
    pub since: Option<i64>,
    pub until: Option<i64>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kinds(mut self, kinds: &[u32]) -> Self {
        self.kinds = kinds.to_vec();
        self
    }

    pub fn authors<I, S>(mut self, authors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.authors = authors.into_iter().map(Into::into).collect();
        self
    }

    pub fn tag(mut self, name: &str, value: &str) -> Self {
        self.tag = Some(TagFilter {
            name: name.to_string(),
            value: value.to_string(),
        });
        self
    }

    pub fn since(mut self, since: i64) -> Self {
        self.since = Some(since);
        self
    }

    pub fn until(mut self, until: i64) -> Self {
        self.until = Some(until);
        self
    }

    /// Whether a record satisfies this filter. Real transports evaluate
    /// filters server-side; this is used by in-process fakes and for
    /// defensive re-filtering of relay responses.
    pub fn matches(&self, record: &Record) -> bool {
        if !self.kinds.is_empty() && !self.kinds.contains(&record.kind) {
            return false;
        }
        if !self.authors.is_empty() && !self.authors.iter().any(|a| a == &record.author) {
            return false;
        }
        if let Some(tag) = &self.tag {
            if record.tag_value(&tag.name) != Some(tag.value.as_str()) {
                return false;
            }
        }
        if let Some(since) = self.since {
            if record.created_at < since {
                return false;
            }
        }
        if let Some(until) = self.until {
            if record.created_at >= until {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(kind: u32, author: &str, created_at: i64, tags: Vec<Tag>) -> Record {
        Record {
            id: "id".to_string(),
            author: author.to_string(),
            kind,
            created_at,
            tags,
            content: String::new(),
        }
    }

    #[test]
    fn test_tag_accessors() {
        let r = record(
            kinds::ROSTER,
            "cap",
            10,
            vec![
                Tag::from_parts(&["d", "5k-challenge"]),
                Tag::from_parts(&["p", "aaaa"]),
                Tag::from_parts(&["p", "bbbb"]),
            ],
        );
        assert_eq!(r.tag_value("d"), Some("5k-challenge"));
        assert_eq!(r.tag_values("p").collect::<Vec<_>>(), vec!["aaaa", "bbbb"]);
        assert_eq!(r.tag_value("missing"), None);
    }

    #[test]
    fn test_filter_matches_kind_author_tag() {
        let r = record(
            kinds::ROSTER,
            "cap",
            10,
            vec![Tag::from_parts(&["d", "5k"])],
        );

        assert!(Filter::new().kinds(&[kinds::ROSTER]).matches(&r));
        assert!(!Filter::new().kinds(&[kinds::ACTIVITY]).matches(&r));
        assert!(Filter::new().authors(["cap"]).matches(&r));
        assert!(!Filter::new().authors(["other"]).matches(&r));
        assert!(Filter::new().tag("d", "5k").matches(&r));
        assert!(!Filter::new().tag("d", "10k").matches(&r));
    }

    #[test]
    fn test_filter_time_range_half_open() {
        let r = record(kinds::ACTIVITY, "a", 100, vec![]);
        assert!(Filter::new().since(100).matches(&r)); // inclusive start
        assert!(!Filter::new().until(100).matches(&r)); // exclusive end
        assert!(Filter::new().since(50).until(101).matches(&r));
    }
}
