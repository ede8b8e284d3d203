//! Request/response bodies for the HTTP control plane (§6/C8). Kept
//! separate from the domain/wire types so the JSON surface can evolve
//! independently of `GameState`.

use serde::{Deserialize, Serialize};

use crate::domain::RoomId;
use crate::game::PersonalizedGameState;
use crate::session::RoomSummary;

#[derive(Debug, Deserialize)]
pub struct CreateRoomRequest {
    pub turn_time_limit_seconds: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct RoomResponse {
    #[serde(flatten)]
    pub summary: RoomSummary,
}

impl From<RoomSummary> for RoomResponse {
    fn from(summary: RoomSummary) -> Self {
        Self { summary }
    }
}

#[derive(Debug, Serialize)]
pub struct RoomListResponse {
    pub rooms: Vec<RoomResponse>,
}

#[derive(Debug, Serialize)]
pub struct SeatResponse {
    pub room_id: RoomId,
    pub seat_index: u8,
}

#[derive(Debug, Serialize)]
pub struct GameStateResponse {
    #[serde(flatten)]
    pub state: PersonalizedGameState,
}
