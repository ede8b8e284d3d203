//! HS256 JWT verification. Stateless for access tokens; tolerates clock
//! skew of up to 60 seconds.

use jsonwebtoken::{decode, errors::ErrorKind, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::domain::VerifiedIdentity;

use super::errors::AuthError;

const CLOCK_SKEW_SECONDS: u64 = 60;

#[derive(Debug, Serialize, Deserialize)]
struct AccessClaims {
    user_id: String,
    display_name: String,
    exp: i64,
    iat: i64,
}

/// Holds the process-wide signing secret. Constructed once at startup
/// (C9) and never logged.
pub struct IdentityVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl IdentityVerifier {
    pub fn new(jwt_secret: &str) -> Self {
        let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
        validation.leeway = CLOCK_SKEW_SECONDS;
        validation.set_required_spec_claims(&["exp"]);
        Self {
            decoding_key: DecodingKey::from_secret(jwt_secret.as_bytes()),
            validation,
        }
    }

    /// `verify(token) -> Result<VerifiedIdentity, AuthError>`, the sole
    /// operation this component exposes.
    pub fn verify(&self, token: &str) -> Result<VerifiedIdentity, AuthError> {
        let data = decode::<AccessClaims>(token, &self.decoding_key, &self.validation).map_err(
            |err| match err.kind() {
                ErrorKind::ExpiredSignature => AuthError::Expired,
                ErrorKind::InvalidSignature
                | ErrorKind::InvalidToken
                | ErrorKind::Json(_)
                | ErrorKind::Base64(_) => AuthError::Malformed,
                _ => AuthError::Malformed,
            },
        )?;

        if data.claims.user_id.is_empty() {
            return Err(AuthError::UnknownSubject);
        }

        Ok(VerifiedIdentity {
            user_id: data.claims.user_id,
            display_name: data.claims.display_name,
        })
    }
}
