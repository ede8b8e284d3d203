//! Refresh-token lookup is an externally-owned concern (Non-goal: user
//! registration and profile storage live outside this crate). This trait is
//! the contracted interface, mirroring how `LobbyStorage` is a trait with
//! both `InMemory` and `SeaOrm` implementations in the teacher crate.

use async_trait::async_trait;

use crate::domain::UserId;

use super::errors::AuthError;

#[async_trait]
pub trait RefreshTokenLookup: Send + Sync {
    /// Resolves an opaque refresh token (looked up by salted hash in the
    /// caller's persistent storage) to the user it belongs to.
    async fn resolve(&self, refresh_token: &str) -> Result<UserId, AuthError>;
}

/// A lookup that always reports the token as unknown. Used where no
/// refresh-token store is configured; access-token verification does not
/// depend on it.
pub struct NullRefreshTokenLookup;

#[async_trait]
impl RefreshTokenLookup for NullRefreshTokenLookup {
    async fn resolve(&self, _refresh_token: &str) -> Result<UserId, AuthError> {
        Err(AuthError::UnknownSubject)
    }
}
