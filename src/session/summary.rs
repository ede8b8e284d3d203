//! Read-only room/participant snapshots handed out by `list_rooms` and
//! carried in `room_joined` outbound frames. At-most-stale bounded by one
//! state transition, same staleness bound `DemoSessionStore::
//! get_session_data` accepts by cloning under a read lock.

use serde::{Deserialize, Serialize};

use crate::domain::{RoomId, RoomStatus, UserId};
use crate::game::GameState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantView {
    pub user_id: UserId,
    pub display_name: String,
    pub seat_index: u8,
    pub has_lost: bool,
    pub cards_remaining: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomSummary {
    pub room_id: RoomId,
    pub creator_user_id: UserId,
    pub status: RoomStatus,
    pub turn_time_limit_seconds: u32,
    pub current_turn_user_id: Option<UserId>,
    pub participants: Vec<ParticipantView>,
}

pub fn summarize(state: &GameState) -> RoomSummary {
    RoomSummary {
        room_id: state.room_id,
        creator_user_id: state.creator_user_id.clone(),
        status: state.status,
        turn_time_limit_seconds: state.turn_time_limit_seconds,
        current_turn_user_id: state.current_turn_user_id.clone(),
        participants: state
            .slots
            .iter()
            .flatten()
            .map(|s| ParticipantView {
                user_id: s.user_id.clone(),
                display_name: s.display_name.clone(),
                seat_index: s.seat_index,
                has_lost: s.has_lost,
                cards_remaining: s.hand.len(),
            })
            .collect(),
    }
}
