//! The poll-loop orchestrator.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use royaltywatch_core::{
    BeneficiaryIdentity, EngagementAction, Notifier, SocialApi, TrackedPost, extract_claim,
};
use royaltywatch_store::TrackingStore;
use tokio::time::sleep;
use tracing::{error, info, warn};

/// Runtime parameters for the poll loop.
#[derive(Debug, Clone)]
pub struct WatcherConfig {
    /// Handle of the monitored launch account, without leading `@`.
    pub account_handle: String,
    /// Sleep between successful cycles.
    pub poll_interval: Duration,
    /// How many recent posts of the launch account each cycle scans.
    pub fetch_window: u32,
    /// Sleep after a failed cycle; shorter than the poll interval so a
    /// transient outage is retried promptly.
    pub error_backoff: Duration,
}

impl WatcherConfig {
    pub fn new(account_handle: impl Into<String>, poll_interval: Duration) -> Self {
        Self {
            account_handle: account_handle.into(),
            poll_interval,
            fetch_window: 5,
            error_backoff: Duration::from_secs(10),
        }
    }
}

/// Ties extraction, tracking, probing, and notification together.
///
/// One cycle runs to completion before the next starts; the store's
/// `notified` flag is checked and set on this single task, which is what
/// makes the at-most-once notification guarantee hold.
pub struct Watcher {
    social: Arc<dyn SocialApi>,
    notifier: Arc<dyn Notifier>,
    store: TrackingStore,
    identities: super::IdentityCache,
    prober: super::EngagementProber,
    config: WatcherConfig,
    account_id: String,
}

impl Watcher {
    /// Resolve the monitored account once and build the watcher.
    ///
    /// Failure here is fatal by design: without the account id nothing
    /// useful can run, so the caller should exit.
    pub async fn connect(
        social: Arc<dyn SocialApi>,
        notifier: Arc<dyn Notifier>,
        store: TrackingStore,
        config: WatcherConfig,
    ) -> anyhow::Result<Self> {
        let profile = social
            .user_by_handle(&config.account_handle)
            .await
            .with_context(|| format!("resolving launch account @{}", config.account_handle))?
            .with_context(|| format!("launch account @{} not found", config.account_handle))?;
        info!(account = %config.account_handle, id = %profile.id, "resolved launch account");
        Ok(Self {
            prober: super::EngagementProber::new(social.clone()),
            social,
            notifier,
            store,
            identities: super::IdentityCache::new(),
            account_id: profile.id,
            config,
        })
    }

    /// Run cycles until the process is stopped.
    ///
    /// A failed cycle is logged and followed by the short back-off; the
    /// loop itself never exits on error.
    pub async fn run(&mut self) {
        loop {
            match self.cycle().await {
                Ok(()) => sleep(self.config.poll_interval).await,
                Err(err) => {
                    error!(error = ?err, "poll cycle failed");
                    sleep(self.config.error_backoff).await;
                }
            }
        }
    }

    /// One full poll cycle: track new royalty posts, then probe and
    /// notify unnotified ones.
    pub async fn cycle(&mut self) -> anyhow::Result<()> {
        self.track_new_posts().await.context("tracking new posts")?;
        self.dispatch_engagements()
            .await
            .context("dispatching engagement notifications")?;
        Ok(())
    }

    /// The store backing this watcher, for startup logging and tests.
    pub fn store(&self) -> &TrackingStore {
        &self.store
    }

    async fn track_new_posts(&mut self) -> anyhow::Result<()> {
        let mut posts = match self
            .social
            .recent_posts(&self.account_id, self.config.fetch_window)
            .await
        {
            Ok(posts) => posts,
            Err(err) => {
                warn!(error = %err, "recent-post fetch failed, skipping tracking this cycle");
                return Ok(());
            }
        };
        // Oldest first, so earlier announcements are tracked before later ones.
        posts.reverse();
        for post in posts {
            let Some(claim) = extract_claim(&post.text) else {
                continue;
            };
            let Some(identity) = self
                .identities
                .resolve(self.social.as_ref(), &claim.handle)
                .await
            else {
                // Retried next cycle while the post stays in the fetch window.
                continue;
            };
            let inserted =
                self.store
                    .insert_tracked(&post.id, &claim.handle, &identity.id, &claim.contract)?;
            if inserted {
                info!(
                    post_id = %post.id,
                    beneficiary = %claim.handle,
                    contract = %claim.contract,
                    "tracking post"
                );
            }
        }
        Ok(())
    }

    async fn dispatch_engagements(&mut self) -> anyhow::Result<()> {
        for tracked in self.store.list_unnotified()? {
            let Some(action) = self
                .prober
                .probe(
                    &tracked.post_id,
                    &tracked.beneficiary_handle,
                    &tracked.beneficiary_id,
                )
                .await
            else {
                continue;
            };
            let identity = self
                .identities
                .resolve(self.social.as_ref(), &tracked.beneficiary_handle)
                .await;
            let text = engagement_message(
                &self.config.account_handle,
                &tracked,
                identity.as_ref(),
                action,
            );
            match self.notifier.send(&text).await {
                Ok(()) => {
                    // Only a delivered notification flips the flag.
                    self.store.mark_notified(&tracked.post_id)?;
                    info!(post_id = %tracked.post_id, action = %action, "engagement notified");
                }
                Err(err) => {
                    warn!(
                        post_id = %tracked.post_id,
                        error = %err,
                        "notification dispatch failed, will retry next cycle"
                    );
                }
            }
        }
        Ok(())
    }
}

/// Compose the HTML notification for a detected engagement.
fn engagement_message(
    account_handle: &str,
    tracked: &TrackedPost,
    identity: Option<&BeneficiaryIdentity>,
    action: EngagementAction,
) -> String {
    let followers = identity
        .and_then(|i| i.follower_count)
        .map_or_else(|| "?".to_string(), |n| n.to_string());
    let bio = identity.map_or("", |i| i.bio.as_str());
    format!(
        "🚨 <b>Beneficiary action detected</b>\n\n\
         User: @{handle}\n\
         Followers: {followers}\n\
         Bio: {bio}\n\
         Contract: <code>{contract}</code>\n\
         Action: {action}\n\
         Tweet: https://twitter.com/{account_handle}/status/{post_id}",
        handle = tracked.beneficiary_handle,
        contract = tracked.contract,
        post_id = tracked.post_id,
    )
}
