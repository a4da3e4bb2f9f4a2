//! Capability traits for the external services the watcher consumes.
//!
//! The orchestrator only ever sees these traits, so tests substitute
//! in-memory fakes for every external call.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A post fetched from the social API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub text: String,
    /// ISO 8601 timestamp string, when the API provides one.
    pub created_at: Option<String>,
    /// Ids of posts this post retweets, replies to, or quotes.
    pub referenced_ids: Vec<String>,
}

/// Full profile returned by a handle lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub handle: String,
    pub follower_count: Option<u64>,
    pub bio: String,
}

/// Minimal identity as returned by list endpoints (retweeters).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRef {
    pub id: String,
    pub handle: String,
}

#[derive(Debug, Error)]
pub enum SocialError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("social API returned {status}: {body}")]
    Api { status: u16, body: String },
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("notification API returned {status}: {body}")]
    Api { status: u16, body: String },
}

/// Read access to the social platform.
///
/// Implementations must bound every request with a timeout; a hung call
/// would stall the single poll task.
#[async_trait]
pub trait SocialApi: Send + Sync {
    /// Look up an account by handle. `Ok(None)` means the handle does not
    /// exist; errors are reserved for transport/API failures.
    async fn user_by_handle(&self, handle: &str) -> Result<Option<UserProfile>, SocialError>;

    /// Most recent posts of an account, newest first.
    async fn recent_posts(&self, user_id: &str, limit: u32) -> Result<Vec<Post>, SocialError>;

    /// Accounts that directly re-shared the given post.
    async fn retweeted_by(&self, post_id: &str) -> Result<Vec<UserRef>, SocialError>;

    /// Recent posts by `author_handle` within the conversation rooted at
    /// `post_id`. Non-empty means the author replied in the thread.
    async fn replies_in_conversation(
        &self,
        post_id: &str,
        author_handle: &str,
    ) -> Result<Vec<Post>, SocialError>;
}

/// Outbound notification channel.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver one message. `text` may carry simple HTML markup.
    async fn send(&self, text: &str) -> Result<(), NotifyError>;
}
