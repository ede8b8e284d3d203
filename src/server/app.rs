//! Shared process state (C9), handed to every route and the WebSocket
//! handler via `axum::Extension` — grounded on `ServerContext<C>`
//! (`src/server/routes.rs`), minus its curve-generic parameter.

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::domain::VerifiedIdentity;
use crate::identity::IdentityVerifier;
use crate::record_sink::RecordSink;
use crate::session::SessionStore;
use crate::transport::ConnectionRegistry;

use super::bootstrap::ServerConfig;
use super::error::ApiError;

pub struct AppState {
    pub sessions: Arc<SessionStore>,
    pub identity: Arc<IdentityVerifier>,
    pub connections: Arc<ConnectionRegistry>,
    pub record_sink: Arc<dyn RecordSink>,
    pub config: ServerConfig,
}

/// Extracts and verifies the bearer token on every HTTP control-plane
/// route. The WebSocket route authenticates in-band instead (§4.5) and
/// does not use this extractor.
pub struct AuthedUser(pub VerifiedIdentity);

impl FromRequestParts<Arc<AppState>> for AuthedUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(ApiError::Unauthorized("INVALID_TOKEN"))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or(ApiError::Unauthorized("INVALID_TOKEN"))?;

        let identity = state.identity.verify(token)?;
        Ok(AuthedUser(identity))
    }
}
