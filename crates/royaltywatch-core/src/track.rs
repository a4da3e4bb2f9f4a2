//! Shared tracking types for the watcher and the store.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A post that matched the royalty-share grammar and whose beneficiary
/// resolved to a concrete account.
///
/// Stored in `tracked_posts` and probed every cycle until notified.
/// Immutable after insert except for the `notified` flag, which flips to
/// true exactly once, after a notification was delivered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackedPost {
    pub post_id: String,
    pub beneficiary_handle: String,
    pub beneficiary_id: String,
    pub contract: String,
    /// ISO 8601 timestamp string.
    pub created_at: String,
    pub notified: bool,
}

/// Resolved identity of a beneficiary account.
///
/// Cached in memory per handle for the process lifetime; rebuilt lazily
/// after a restart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BeneficiaryIdentity {
    pub id: String,
    /// Missing when the social API omits public metrics.
    pub follower_count: Option<u64>,
    pub bio: String,
}

/// The engagement signal that triggered a notification.
///
/// Variant order matches probe priority: a retweet is reported even when a
/// reply or quote would independently match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngagementAction {
    Retweet,
    Reply,
    Quote,
}

impl EngagementAction {
    pub fn as_str(self) -> &'static str {
        match self {
            EngagementAction::Retweet => "retweet",
            EngagementAction::Reply => "reply",
            EngagementAction::Quote => "quote",
        }
    }
}

impl fmt::Display for EngagementAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
