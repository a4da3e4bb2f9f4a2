//! Lazy in-memory cache of resolved beneficiary identities.

use std::collections::HashMap;

use royaltywatch_core::{BeneficiaryIdentity, SocialApi};
use tracing::{info, warn};

/// Process-lifetime mapping from handle to resolved identity.
///
/// Each handle is looked up at most once per process lifetime. Failed
/// lookups (not found or API error) are deliberately NOT cached: a
/// transient API failure must not blacklist a handle, so the next
/// `resolve` call retries.
#[derive(Default)]
pub struct IdentityCache {
    entries: HashMap<String, BeneficiaryIdentity>,
}

impl IdentityCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a handle, hitting the social API only on cache miss.
    pub async fn resolve(
        &mut self,
        social: &dyn SocialApi,
        handle: &str,
    ) -> Option<BeneficiaryIdentity> {
        if let Some(identity) = self.entries.get(handle) {
            return Some(identity.clone());
        }
        match social.user_by_handle(handle).await {
            Ok(Some(profile)) => {
                let identity = BeneficiaryIdentity {
                    id: profile.id,
                    follower_count: profile.follower_count,
                    bio: profile.bio,
                };
                info!(handle, id = %identity.id, "resolved beneficiary");
                self.entries.insert(handle.to_string(), identity.clone());
                Some(identity)
            }
            Ok(None) => {
                warn!(handle, "beneficiary handle not found");
                None
            }
            Err(err) => {
                warn!(handle, error = %err, "beneficiary lookup failed");
                None
            }
        }
    }
}
