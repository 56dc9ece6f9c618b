use chrono::{Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::config::JwtConfig;
use crate::errors::{BusinessError, codes};

/// Default access token lifetime (24 hours)
pub const ACCESS_TOKEN_TTL: i64 = 86_400;

/// Claims carried by an access token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Hex ObjectId of the authenticated user
    #[serde(rename = "userId")]
    pub user_id: String,
    pub exp: i64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token expired")]
    Expired,

    #[error("token invalid: {0}")]
    Invalid(String),
}

impl From<TokenError> for BusinessError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => codes::TOKEN_EXPIRED,
            TokenError::Invalid(_) => codes::TOKEN_INVALID,
        }
    }
}

/// Stateless HS256 token issuer and verifier.
///
/// Tokens are never stored server side, so logout cannot revoke them; a token
/// stays valid until `exp`.
#[derive(Clone)]
pub struct JwtAuth {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl JwtAuth {
    pub fn new(config: &JwtConfig) -> Self {
        tracing::info!(ttl_secs = config.ttl_secs, "JWT auth initialized");

        Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            ttl: Duration::seconds(config.ttl_secs),
        }
    }

    /// Sign a token for `user_id` expiring one TTL from now.
    pub fn issue(&self, user_id: &str) -> eyre::Result<String> {
        let claims = JwtClaims {
            user_id: user_id.to_string(),
            exp: (Utc::now() + self.ttl).timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;
        Ok(token)
    }

    /// Check signature and expiry, returning the embedded claims.
    pub fn verify(&self, token: &str) -> Result<JwtClaims, TokenError> {
        let validation = Validation::new(Algorithm::HS256);

        decode::<JwtClaims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|err| match err.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(err.to_string()),
            })
    }
}
