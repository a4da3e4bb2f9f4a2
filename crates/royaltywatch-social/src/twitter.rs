//! Twitter API v2 client implementing the [`SocialApi`] capability.

use std::time::Duration;

use async_trait::async_trait;
use royaltywatch_core::{Post, SocialApi, SocialError, UserProfile, UserRef};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://api.twitter.com";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// The user-timeline endpoint rejects `max_results` outside this range.
const TIMELINE_MIN: u32 = 5;
const TIMELINE_MAX: u32 = 100;

const SEARCH_MAX_RESULTS: &str = "10";

/// Bearer-authenticated client for the Twitter API v2 endpoints the
/// watcher needs: user lookup, user timelines, retweeter lists, and
/// recent search scoped to a conversation.
pub struct TwitterClient {
    client: reqwest::Client,
    bearer: String,
    base_url: String,
}

// ── Wire DTOs ──

#[derive(Deserialize)]
struct UserEnvelope {
    data: Option<UserData>,
}

#[derive(Deserialize)]
struct UserData {
    id: String,
    username: String,
    description: Option<String>,
    public_metrics: Option<PublicMetrics>,
}

#[derive(Deserialize)]
struct PublicMetrics {
    followers_count: Option<u64>,
}

#[derive(Deserialize)]
struct TweetsEnvelope {
    data: Option<Vec<TweetData>>,
}

#[derive(Deserialize)]
struct TweetData {
    id: String,
    #[serde(default)]
    text: String,
    created_at: Option<String>,
    referenced_tweets: Option<Vec<ReferencedTweet>>,
}

#[derive(Deserialize)]
struct ReferencedTweet {
    id: String,
}

#[derive(Deserialize)]
struct UsersEnvelope {
    data: Option<Vec<UserListData>>,
}

#[derive(Deserialize)]
struct UserListData {
    id: String,
    username: String,
}

impl From<TweetData> for Post {
    fn from(t: TweetData) -> Self {
        Post {
            id: t.id,
            text: t.text,
            created_at: t.created_at,
            referenced_ids: t
                .referenced_tweets
                .unwrap_or_default()
                .into_iter()
                .map(|r| r.id)
                .collect(),
        }
    }
}

impl TwitterClient {
    /// Build a client against the production API.
    pub fn new(bearer: String) -> Result<Self, SocialError> {
        Self::with_base_url(bearer, DEFAULT_BASE_URL.to_string())
    }

    /// Build a client against a custom base URL (no trailing slash).
    pub fn with_base_url(bearer: String, base_url: String) -> Result<Self, SocialError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| SocialError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            bearer,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, SocialError> {
        let url = format!("{}/2{}", self.base_url, path);
        debug!(url = %url, "social API request");
        let resp = self
            .client
            .get(&url)
            .bearer_auth(&self.bearer)
            .query(query)
            .send()
            .await
            .map_err(|e| SocialError::Transport(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SocialError::Api {
                status: status.as_u16(),
                body,
            });
        }
        resp.json::<T>()
            .await
            .map_err(|e| SocialError::Transport(e.to_string()))
    }
}

#[async_trait]
impl SocialApi for TwitterClient {
    async fn user_by_handle(&self, handle: &str) -> Result<Option<UserProfile>, SocialError> {
        let path = format!("/users/by/username/{handle}");
        let envelope: UserEnvelope = match self
            .get_json(&path, &[("user.fields", "public_metrics,description")])
            .await
        {
            Ok(envelope) => envelope,
            Err(SocialError::Api { status: 404, .. }) => return Ok(None),
            Err(err) => return Err(err),
        };
        Ok(envelope.data.map(|u| UserProfile {
            id: u.id,
            handle: u.username,
            follower_count: u.public_metrics.and_then(|m| m.followers_count),
            bio: u.description.unwrap_or_default(),
        }))
    }

    async fn recent_posts(&self, user_id: &str, limit: u32) -> Result<Vec<Post>, SocialError> {
        let max_results = limit.clamp(TIMELINE_MIN, TIMELINE_MAX).to_string();
        let path = format!("/users/{user_id}/tweets");
        let envelope: TweetsEnvelope = self
            .get_json(
                &path,
                &[
                    ("max_results", max_results.as_str()),
                    ("tweet.fields", "conversation_id,created_at,referenced_tweets"),
                ],
            )
            .await?;
        let posts: Vec<Post> = envelope
            .data
            .unwrap_or_default()
            .into_iter()
            .take(limit as usize)
            .map(Post::from)
            .collect();
        Ok(posts)
    }

    async fn retweeted_by(&self, post_id: &str) -> Result<Vec<UserRef>, SocialError> {
        let path = format!("/tweets/{post_id}/retweeted_by");
        let envelope: UsersEnvelope = self
            .get_json(&path, &[("user.fields", "id,username")])
            .await?;
        Ok(envelope
            .data
            .unwrap_or_default()
            .into_iter()
            .map(|u| UserRef {
                id: u.id,
                handle: u.username,
            })
            .collect())
    }

    async fn replies_in_conversation(
        &self,
        post_id: &str,
        author_handle: &str,
    ) -> Result<Vec<Post>, SocialError> {
        let query = format!("conversation_id:{post_id} from:{author_handle}");
        let envelope: TweetsEnvelope = self
            .get_json(
                "/tweets/search/recent",
                &[
                    ("query", query.as_str()),
                    ("max_results", SEARCH_MAX_RESULTS),
                    ("tweet.fields", "author_id,created_at"),
                ],
            )
            .await?;
        Ok(envelope
            .data
            .unwrap_or_default()
            .into_iter()
            .map(Post::from)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_envelope_decodes_profile_fields() {
        let json = r#"{
            "data": {
                "id": "12345",
                "username": "Alice123",
                "description": "onchain artist",
                "public_metrics": {"followers_count": 4200, "tweet_count": 99}
            }
        }"#;
        let envelope: UserEnvelope = serde_json::from_str(json).unwrap();
        let user = envelope.data.unwrap();
        assert_eq!(user.id, "12345");
        assert_eq!(user.username, "Alice123");
        assert_eq!(user.public_metrics.unwrap().followers_count, Some(4200));
    }

    #[test]
    fn user_envelope_without_data_is_none() {
        let json = r#"{"errors": [{"title": "Not Found Error"}]}"#;
        let envelope: UserEnvelope = serde_json::from_str(json).unwrap();
        assert!(envelope.data.is_none());
    }

    #[test]
    fn tweets_envelope_maps_referenced_ids() {
        let json = r#"{
            "data": [
                {
                    "id": "900",
                    "text": "great launch",
                    "created_at": "2026-08-29T10:00:00Z",
                    "referenced_tweets": [{"type": "quoted", "id": "100"}]
                },
                {"id": "901", "text": "gm"}
            ]
        }"#;
        let envelope: TweetsEnvelope = serde_json::from_str(json).unwrap();
        let posts: Vec<Post> = envelope.data.unwrap().into_iter().map(Post::from).collect();
        assert_eq!(posts[0].referenced_ids, vec!["100".to_string()]);
        assert_eq!(posts[1].referenced_ids.len(), 0);
        assert_eq!(posts[1].created_at, None);
    }

    #[test]
    fn empty_search_result_decodes_to_no_posts() {
        let json = r#"{"meta": {"result_count": 0}}"#;
        let envelope: TweetsEnvelope = serde_json::from_str(json).unwrap();
        assert!(envelope.data.unwrap_or_default().is_empty());
    }
}
