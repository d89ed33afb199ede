//! Bearer-token verification.
//!
//! Accounts live in a separate service that signs HS256 access tokens. This
//! server only verifies them and reads two things: which user is calling
//! and whether they act as an admin. [`issue_token`] signs with the same
//! settings and is used by tooling and tests.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use catchlog_core::roles::Role;
use catchlog_core::types::DbId;

/// Default `iss` expected on access tokens.
const DEFAULT_ISSUER: &str = "catchlog-accounts";

/// Default lifetime of tokens signed by [`issue_token`].
const DEFAULT_TTL_MINS: i64 = 60;

/// Claims the review API relies on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// The caller's user id. Owner checks and reviewer identity use it.
    pub sub: DbId,
    pub role: Role,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
}

/// Token verification settings.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// Shared HS256 secret.
    pub secret: String,
    /// Required `iss` claim.
    pub issuer: String,
    /// Lifetime of tokens signed by [`issue_token`].
    pub ttl_mins: i64,
}

impl TokenConfig {
    /// Load from `JWT_SECRET` (required), `JWT_ISSUER` and `JWT_TTL_MINS`.
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is missing or empty, or `JWT_TTL_MINS` is not
    /// an integer.
    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET").expect("JWT_SECRET must be set");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        Self {
            secret,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| DEFAULT_ISSUER.into()),
            ttl_mins: std::env::var("JWT_TTL_MINS")
                .map(|v| v.parse().expect("JWT_TTL_MINS must be an integer"))
                .unwrap_or(DEFAULT_TTL_MINS),
        }
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_required_spec_claims(&["exp", "iss"]);
        validation
    }
}

/// Sign a token for `user_id` acting as `role`.
pub fn issue_token(
    user_id: DbId,
    role: Role,
    config: &TokenConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let iat = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user_id,
        role,
        iss: config.issuer.clone(),
        iat,
        exp: iat + config.ttl_mins * 60,
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Check signature, expiry and issuer, and decode the claims. A token
/// naming an unknown role fails to decode.
pub fn verify_token(
    token: &str,
    config: &TokenConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &config.validation(),
    )
    .map(|data| data.claims)
}
