use thiserror::Error;

use crate::game::GameError;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("room not found")]
    NotFound,
    #[error("room inbound queue is full")]
    Busy,
    #[error("room loop did not respond")]
    Unresponsive,
    #[error(transparent)]
    Game(#[from] GameError),
}

impl SessionError {
    pub fn code(&self) -> &'static str {
        match self {
            SessionError::NotFound => "room_not_found",
            SessionError::Busy => "busy",
            SessionError::Unresponsive => "busy",
            SessionError::Game(err) => err.code(),
        }
    }
}
