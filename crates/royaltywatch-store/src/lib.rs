//! Durable tracking state: one SQLite table of tracked posts.

mod error;
mod tracking;

pub use error::StoreError;
pub use tracking::TrackingStore;
