//! Engagement probing: retweet, reply, and quote signals in priority order.

use std::sync::Arc;

use royaltywatch_core::{EngagementAction, SocialApi};
use tracing::warn;

/// How many of the beneficiary's recent posts the quote check scans.
const QUOTE_SCAN_WINDOW: u32 = 20;

/// Probes the three engagement signals for a tracked post.
///
/// Checks run in fixed priority order — retweet, then reply, then quote —
/// and the first positive one wins, which also decides the action label
/// reported when several signals would match. A failed capability call
/// counts as a negative result for that check only; probing never aborts
/// because one signal source is down.
pub struct EngagementProber {
    social: Arc<dyn SocialApi>,
}

impl EngagementProber {
    pub fn new(social: Arc<dyn SocialApi>) -> Self {
        Self { social }
    }

    pub async fn probe(
        &self,
        post_id: &str,
        beneficiary_handle: &str,
        beneficiary_id: &str,
    ) -> Option<EngagementAction> {
        if self.retweeted(post_id, beneficiary_id).await {
            return Some(EngagementAction::Retweet);
        }
        if self.replied(post_id, beneficiary_handle).await {
            return Some(EngagementAction::Reply);
        }
        if self.quoted(post_id, beneficiary_id).await {
            return Some(EngagementAction::Quote);
        }
        None
    }

    async fn retweeted(&self, post_id: &str, beneficiary_id: &str) -> bool {
        match self.social.retweeted_by(post_id).await {
            Ok(users) => users.iter().any(|u| u.id == beneficiary_id),
            Err(err) => {
                warn!(post_id, error = %err, "retweet check failed");
                false
            }
        }
    }

    async fn replied(&self, post_id: &str, beneficiary_handle: &str) -> bool {
        match self
            .social
            .replies_in_conversation(post_id, beneficiary_handle)
            .await
        {
            Ok(posts) => !posts.is_empty(),
            Err(err) => {
                warn!(post_id, error = %err, "reply check failed");
                false
            }
        }
    }

    async fn quoted(&self, post_id: &str, beneficiary_id: &str) -> bool {
        match self
            .social
            .recent_posts(beneficiary_id, QUOTE_SCAN_WINDOW)
            .await
        {
            Ok(posts) => posts
                .iter()
                .any(|p| p.referenced_ids.iter().any(|id| id == post_id)),
            Err(err) => {
                warn!(post_id, error = %err, "quote check failed");
                false
            }
        }
    }
}
