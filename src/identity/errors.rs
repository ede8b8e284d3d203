//! Authentication error taxonomy (§7), grounded on `GameSetupError`
//! (`src/ledger/lobby/error.rs`): a flat `thiserror` enum with no token
//! material in any variant.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("token is malformed")]
    Malformed,
    #[error("token has expired")]
    Expired,
    #[error("token has been revoked")]
    Revoked,
    #[error("token subject is unknown")]
    UnknownSubject,
}

impl AuthError {
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::Malformed => "INVALID_TOKEN",
            AuthError::Expired => "TOKEN_EXPIRED",
            AuthError::Revoked => "USER_BANNED",
            AuthError::UnknownSubject => "INVALID_TOKEN",
        }
    }
}
