//! Social platform access: the Twitter API v2 client.

mod twitter;

pub use twitter::TwitterClient;
