//! Session authentication collaborator consumed by the auth middleware.
//!
//! The API never inspects credentials itself; it hands the bearer token to
//! an implementation of [`UserSessions`] and trusts the answer.

use anyhow::Result;
use async_trait::async_trait;

/// Authenticated user identity attached to each request after the
/// middleware has validated its credentials.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// Username recorded in the session credential.
    pub username: String,
}

/// External collaborator that validates session credentials.
#[async_trait]
pub trait UserSessions: Send + Sync {
    /// Resolve a bearer token to a user identity.
    ///
    /// `Ok(None)` means the credential is invalid or expired; `Err` means
    /// the validation backend itself failed.
    async fn authenticate(&self, token: &str) -> Result<Option<CurrentUser>>;
}
