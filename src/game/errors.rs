//! Typed errors for the game state machine and room lifecycle, grounded on
//! `GameSetupError` in `src/ledger/lobby/error.rs`: a flat enum with
//! `#[error("...")]` messages, no nested causes, mapped to an outbound
//! `action_error` frame or an HTTP status at the edges.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("room is full")]
    RoomFull,
    #[error("already joined this room")]
    AlreadyJoined,
    #[error("room does not have enough players to start")]
    NotEnoughPlayers,
    #[error("only the creator may perform this action")]
    NotCreator,
    #[error("caller is not a participant in this room")]
    NotParticipant,
    #[error("game is not in progress")]
    GameNotActive,
    #[error("it is not your turn")]
    NotYourTurn,
    #[error("a round is already active")]
    RoundAlreadyActive,
    #[error("no active round")]
    NoActiveRound,
    #[error("round id does not match the active round")]
    RoundNotFound,
    #[error("round has already completed")]
    RoundCompleted,
    #[error("card is not in claimer's hand")]
    CardNotInHand,
    #[error("invalid target: self or already lost")]
    InvalidTarget,
    #[error("room can only be left while waiting")]
    CannotLeaveInProgress,
}

impl GameError {
    /// Stable wire code, used by the transport and HTTP layers.
    pub fn code(&self) -> &'static str {
        match self {
            GameError::RoomFull => "room_full",
            GameError::AlreadyJoined => "already_joined",
            GameError::NotEnoughPlayers => "validation",
            GameError::NotCreator => "not_creator",
            GameError::NotParticipant => "not_participant",
            GameError::GameNotActive => "game_not_active",
            GameError::NotYourTurn => "not_your_turn",
            GameError::RoundAlreadyActive => "round_already_active",
            GameError::NoActiveRound => "no_active_round",
            GameError::RoundNotFound => "round_not_found",
            GameError::RoundCompleted => "round_completed",
            GameError::CardNotInHand => "card_not_in_hand",
            GameError::InvalidTarget => "invalid_target",
            GameError::CannotLeaveInProgress => "validation",
        }
    }
}
