//! One-time decision tokens for link-based confirmations.
//!
//! The plaintext token is embedded in the reviewer's decision link and never
//! stored; `session_confirmations.token_hash` holds its SHA-256 digest.

use rand::Rng;

use crate::hashing::sha256_hex;

/// Length of a generated decision token (alphanumeric characters).
pub const TOKEN_LENGTH: usize = 48;

/// A freshly generated decision token.
#[derive(Debug, Clone)]
pub struct DecisionToken {
    /// Sent to the reviewer exactly once, inside the decision link.
    pub plaintext: String,
    /// Persisted for lookup.
    pub hash: String,
}

/// Generate a new unguessable decision token.
pub fn generate_decision_token() -> DecisionToken {
    let plaintext: String = rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect();
    let hash = hash_decision_token(&plaintext);
    DecisionToken { plaintext, hash }
}

/// Compute the stored digest of a decision token.
pub fn hash_decision_token(token: &str) -> String {
    sha256_hex(token.as_bytes())
}

/// Build the public decision link for a token.
pub fn decision_url(base_url: &str, token: &str) -> String {
    format!("{}/confirmations/{token}", base_url.trim_end_matches('/'))
}
