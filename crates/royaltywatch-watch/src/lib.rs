//! Watch layer: identity cache, engagement prober, and the poll loop.

mod cache;
mod probe;
mod watcher;

pub use cache::IdentityCache;
pub use probe::EngagementProber;
pub use watcher::{Watcher, WatcherConfig};
