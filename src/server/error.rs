use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use crate::game::GameError;
use crate::identity::AuthError;
use crate::session::SessionError;

const LOG_TARGET: &str = "server::error";

/// HTTP-edge error taxonomy (§7): every domain error lands on exactly one
/// status code, carrying the same stable `code` string the WebSocket
/// transport uses in `action_error` frames.
#[derive(Debug)]
pub enum ApiError {
    Unauthorized(&'static str),
    Forbidden(&'static str),
    NotFound,
    Conflict(&'static str),
    BadRequest(&'static str, String),
    Internal(String),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest("validation", message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal(message.into())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError::Unauthorized(err.code())
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::NotFound => ApiError::NotFound,
            SessionError::Busy | SessionError::Unresponsive => ApiError::Conflict("busy"),
            SessionError::Game(err) => ApiError::from(err),
        }
    }
}

impl From<GameError> for ApiError {
    fn from(err: GameError) -> Self {
        match err {
            GameError::NotCreator | GameError::NotParticipant => ApiError::Forbidden(err.code()),
            GameError::RoomFull
            | GameError::AlreadyJoined
            | GameError::NotEnoughPlayers
            | GameError::GameNotActive
            | GameError::RoundAlreadyActive
            | GameError::CannotLeaveInProgress => ApiError::Conflict(err.code()),
            GameError::NotYourTurn
            | GameError::NoActiveRound
            | GameError::RoundNotFound
            | GameError::RoundCompleted
            | GameError::CardNotInHand
            | GameError::InvalidTarget => ApiError::BadRequest(err.code(), err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            ApiError::Unauthorized(code) => (StatusCode::UNAUTHORIZED, code, code.to_string()),
            ApiError::Forbidden(code) => (StatusCode::FORBIDDEN, code, code.to_string()),
            ApiError::NotFound => (StatusCode::NOT_FOUND, "room_not_found", "not found".to_string()),
            ApiError::Conflict(code) => (StatusCode::CONFLICT, code, code.to_string()),
            ApiError::BadRequest(code, message) => (StatusCode::BAD_REQUEST, code, message),
            ApiError::Internal(message) => {
                error!(target: LOG_TARGET, %message, "internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "server_error", message)
            }
        };
        (status, Json(json!({ "code": code, "message": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: ApiError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn forbidden_errors_map_to_403() {
        assert_eq!(status_of(GameError::NotCreator.into()), StatusCode::FORBIDDEN);
        assert_eq!(status_of(GameError::NotParticipant.into()), StatusCode::FORBIDDEN);
    }

    #[test]
    fn lifecycle_conflicts_map_to_409() {
        assert_eq!(status_of(GameError::RoomFull.into()), StatusCode::CONFLICT);
        assert_eq!(status_of(GameError::AlreadyJoined.into()), StatusCode::CONFLICT);
        assert_eq!(status_of(GameError::NotEnoughPlayers.into()), StatusCode::CONFLICT);
    }

    #[test]
    fn in_round_mistakes_map_to_400() {
        assert_eq!(status_of(GameError::NotYourTurn.into()), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(GameError::InvalidTarget.into()), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(GameError::RoundCompleted.into()), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn session_not_found_maps_to_404() {
        assert_eq!(status_of(SessionError::NotFound.into()), StatusCode::NOT_FOUND);
    }

    #[test]
    fn session_busy_maps_to_409() {
        assert_eq!(status_of(SessionError::Busy.into()), StatusCode::CONFLICT);
        assert_eq!(status_of(SessionError::Unresponsive.into()), StatusCode::CONFLICT);
    }
}
