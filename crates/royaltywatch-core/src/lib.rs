pub mod api;
pub mod extract;
pub mod track;

pub use api::{Notifier, NotifyError, Post, SocialApi, SocialError, UserProfile, UserRef};
pub use extract::{RoyaltyClaim, extract_claim};
pub use track::{BeneficiaryIdentity, EngagementAction, TrackedPost};
