//! The HTTP control plane (C8): room lifecycle over plain request/response,
//! mounted alongside the `/ws` upgrade. Grounded on `LegitPokerServer<C>`'s
//! route table (`src/server/routes.rs`), with the curve-generic parameter
//! and the demo-stream routes dropped.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, State, WebSocketUpgrade};
use axum::middleware;
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::{Any, CorsLayer};

use crate::domain::RoomId;
use crate::game::GameError;

use super::app::{AppState, AuthedUser};
use super::dto::{CreateRoomRequest, GameStateResponse, RoomListResponse, RoomResponse, SeatResponse};
use super::error::ApiError;

const DEFAULT_TURN_TIME_LIMIT_SECONDS: u32 = 60;

pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/rooms", post(create_room).get(list_rooms))
        .route("/rooms/:room_id", get(get_room))
        .route("/rooms/:room_id/join", post(join_room))
        .route("/rooms/:room_id/start", post(start_room))
        .route("/rooms/:room_id/leave", post(leave_room))
        .route("/games/:room_id/state", get(get_game_state))
        .route("/ws", get(ws_upgrade))
        .layer(middleware::from_fn(super::logging::log_requests))
        .layer(cors)
        .with_state(state)
}

async fn create_room(
    State(state): State<Arc<AppState>>,
    AuthedUser(identity): AuthedUser,
    Json(payload): Json<CreateRoomRequest>,
) -> Result<Json<RoomResponse>, ApiError> {
    let turn_time_limit = Duration::from_secs(
        payload
            .turn_time_limit_seconds
            .unwrap_or(DEFAULT_TURN_TIME_LIMIT_SECONDS) as u64,
    );
    let handle =
        state
            .sessions
            .create_room(identity.user_id, identity.display_name, turn_time_limit);
    Ok(Json(RoomResponse::from(handle.summary())))
}

async fn list_rooms(
    State(state): State<Arc<AppState>>,
    AuthedUser(_identity): AuthedUser,
) -> Json<RoomListResponse> {
    Json(RoomListResponse {
        rooms: state
            .sessions
            .list_rooms(100)
            .into_iter()
            .map(RoomResponse::from)
            .collect(),
    })
}

async fn get_room(
    State(state): State<Arc<AppState>>,
    AuthedUser(identity): AuthedUser,
    Path(room_id): Path<RoomId>,
) -> Result<Json<RoomResponse>, ApiError> {
    let handle = state.sessions.get_room(room_id)?;
    let summary = handle.summary();
    if !summary.participants.iter().any(|p| p.user_id == identity.user_id) {
        return Err(GameError::NotParticipant.into());
    }
    Ok(Json(RoomResponse::from(summary)))
}

async fn join_room(
    State(state): State<Arc<AppState>>,
    AuthedUser(identity): AuthedUser,
    Path(room_id): Path<RoomId>,
) -> Result<Json<SeatResponse>, ApiError> {
    let handle = state.sessions.get_room(room_id)?;
    let seat_index = handle.join(identity).await?;
    Ok(Json(SeatResponse {
        room_id,
        seat_index,
    }))
}

async fn start_room(
    State(state): State<Arc<AppState>>,
    AuthedUser(identity): AuthedUser,
    Path(room_id): Path<RoomId>,
) -> Result<Json<RoomResponse>, ApiError> {
    let handle = state.sessions.get_room(room_id)?;
    handle.start(identity.user_id).await?;
    Ok(Json(RoomResponse::from(handle.summary())))
}

async fn leave_room(
    State(state): State<Arc<AppState>>,
    AuthedUser(identity): AuthedUser,
    Path(room_id): Path<RoomId>,
) -> Result<Json<RoomResponse>, ApiError> {
    let handle = state.sessions.get_room(room_id)?;
    handle.leave(identity.user_id).await?;
    Ok(Json(RoomResponse::from(handle.summary())))
}

async fn get_game_state(
    State(state): State<Arc<AppState>>,
    AuthedUser(identity): AuthedUser,
    Path(room_id): Path<RoomId>,
) -> Result<Json<GameStateResponse>, ApiError> {
    let handle = state.sessions.get_room(room_id)?;
    if !handle
        .summary()
        .participants
        .iter()
        .any(|p| p.user_id == identity.user_id)
    {
        return Err(GameError::NotParticipant.into());
    }
    let personalized = handle.get_state(identity.user_id).await?;
    Ok(Json(GameStateResponse { state: personalized }))
}

async fn ws_upgrade(State(state): State<Arc<AppState>>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| super::super::transport::ws::handle_socket(socket, state))
}
