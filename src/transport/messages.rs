//! The wire protocol (§4.5/§6): JSON frames `{ "event": <name>,
//! ...payload }`, `snake_case` casing, tagged enums so decoding is total —
//! unknown event kinds are rejected with `InvalidEnum` rather than
//! silently ignored.

use serde::{Deserialize, Serialize};

use crate::domain::{CardId, ConnectionId, Creature, RoomId, RoundId, UserId};
use crate::game::PersonalizedGameState;
use crate::session::{ParticipantView, RoomSummary};

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum InboundEvent {
    Authenticate {
        access_token: String,
        device_info: Option<String>,
    },
    JoinRoom {
        room_id: RoomId,
    },
    LeaveRoom {
        room_id: RoomId,
    },
    Claim {
        room_id: RoomId,
        card_id: CardId,
        claimed_creature: Creature,
        target_user_id: UserId,
    },
    Respond {
        room_id: RoomId,
        round_id: RoundId,
        believe_claim: bool,
    },
    Pass {
        room_id: RoomId,
        round_id: RoundId,
        target_user_id: UserId,
        new_claim: Creature,
    },
    GetState {
        room_id: RoomId,
    },
    Heartbeat {
        timestamp: i64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthFailureCode {
    InvalidToken,
    TokenExpired,
    UserBanned,
    Displaced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidToken,
    NotParticipant,
    NotCreator,
    NotYourTurn,
    MissingField,
    InvalidEnum,
    InvalidUuid,
    OutOfRange,
    RoomNotFound,
    RoomFull,
    AlreadyJoined,
    GameNotActive,
    RoundCompleted,
    RoundNotFound,
    CardNotInHand,
    InvalidTarget,
    ClaimCreatureNotRecognized,
    Busy,
    RateLimited,
    ServerError,
}

impl ErrorCode {
    pub fn from_game_error_code(code: &str) -> Self {
        match code {
            "room_full" => ErrorCode::RoomFull,
            "already_joined" => ErrorCode::AlreadyJoined,
            "validation" => ErrorCode::OutOfRange,
            "not_creator" => ErrorCode::NotCreator,
            "not_participant" => ErrorCode::NotParticipant,
            "game_not_active" => ErrorCode::GameNotActive,
            "not_your_turn" => ErrorCode::NotYourTurn,
            "round_already_active" => ErrorCode::InvalidEnum,
            "no_active_round" => ErrorCode::RoundNotFound,
            "round_not_found" => ErrorCode::RoundNotFound,
            "round_completed" => ErrorCode::RoundCompleted,
            "card_not_in_hand" => ErrorCode::CardNotInHand,
            "invalid_target" => ErrorCode::InvalidTarget,
            "room_not_found" => ErrorCode::RoomNotFound,
            "busy" => ErrorCode::Busy,
            _ => ErrorCode::ServerError,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum OutboundEvent {
    Authenticated {
        user_id: UserId,
        display_name: String,
        server_time: i64,
        connection_id: ConnectionId,
    },
    AuthenticationFailed {
        code: AuthFailureCode,
        requires_login: bool,
    },
    RoomJoined {
        room_id: RoomId,
        room_state: RoomSummary,
        participants: Vec<ParticipantView>,
        your_participation: ParticipantView,
    },
    ParticipantJoined {
        room_id: RoomId,
        user_id: UserId,
        display_name: String,
        seat_index: u8,
    },
    ParticipantLeft {
        room_id: RoomId,
        user_id: UserId,
    },
    ParticipantStatusUpdate {
        room_id: RoomId,
        user_id: UserId,
        connected: bool,
    },
    GameStateUpdate {
        room_id: RoomId,
        game_state: PersonalizedGameState,
        timestamp: i64,
    },
    CardClaimed {
        room_id: RoomId,
        round_id: RoundId,
        claimer: UserId,
        claimed_creature: Creature,
        target: UserId,
    },
    ClaimResponded {
        room_id: RoomId,
        round_id: RoundId,
        actual_creature: Creature,
        was_correct: bool,
        penalty_receiver_id: UserId,
    },
    CardPassed {
        room_id: RoomId,
        round_id: RoundId,
        passer: UserId,
        new_target: UserId,
        new_claimed_creature: Creature,
        pass_count: u32,
    },
    RoundCompleted {
        room_id: RoomId,
        round_id: RoundId,
    },
    GameEnded {
        room_id: RoomId,
        winner_id: UserId,
        loser_id: UserId,
    },
    ActionError {
        code: ErrorCode,
        message: String,
        action_attempted: String,
    },
    HeartbeatAck {
        server_timestamp: i64,
        latency_ms: i64,
    },
}
