//! JWT session validation for the HTTP layer.
//!
//! Tokens are issued elsewhere; this service only verifies signatures and
//! expiry and extracts the username from the `sub` claim.

use anyhow::Result;
use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use mediabay_api::{CurrentUser, UserSessions};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    exp: u64,
}

/// Validates HS256 bearer tokens against a shared secret.
pub struct JwtSessions {
    key: DecodingKey,
    validation: Validation,
}

impl JwtSessions {
    /// Build a validator from the shared signing secret.
    #[must_use]
    pub fn new(secret: &[u8]) -> Self {
        Self {
            key: DecodingKey::from_secret(secret),
            validation: Validation::new(Algorithm::HS256),
        }
    }
}

#[async_trait]
impl UserSessions for JwtSessions {
    async fn authenticate(&self, token: &str) -> Result<Option<CurrentUser>> {
        match decode::<Claims>(token, &self.key, &self.validation) {
            Ok(data) => Ok(Some(CurrentUser {
                username: data.claims.sub,
            })),
            Err(err) => {
                debug!(error = %err, "token rejected");
                Ok(None)
            }
        }
    }
}
