//! Royalty-claim extraction from free post text.

use std::sync::LazyLock;

use regex::Regex;

/// A (beneficiary handle, token contract) pair extracted from post text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoyaltyClaim {
    pub handle: String,
    pub contract: String,
}

/// Matches the announcement phrase, a handle, and — anywhere later in the
/// text — a base-58 token contract.
///
/// The phrase is case-insensitive and `.` spans newlines, but the base-58
/// class is exact: `0`, `O`, `I` and `l` never appear in a valid contract.
/// The span between handle and contract is deliberately unbounded; post
/// bodies on the platform are length-capped.
static CLAIM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?s)(?i:royalties\s+shared\s+with\s+)@([A-Za-z0-9_]{1,15}).*?([1-9A-HJ-NP-Za-km-z]{32,44})",
    )
    .unwrap()
});

/// Extract the first royalty claim from `text`, if any.
///
/// Pure; absence of a match is the only "failure" mode.
pub fn extract_claim(text: &str) -> Option<RoyaltyClaim> {
    let caps = CLAIM_RE.captures(text)?;
    Some(RoyaltyClaim {
        handle: caps[1].to_string(),
        contract: caps[2].to_string(),
    })
}
