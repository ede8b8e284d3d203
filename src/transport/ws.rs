//! The WebSocket connection lifecycle (§4.5): accept, authenticate within
//! a 10s window, register (displacing any prior connection for the same
//! user), then dispatch inbound frames to the owning room's writer loop
//! and fan out personalized outbound frames.
//!
//! Uses `axum`'s WebSocket (the `"ws"` feature, already in `Cargo.toml`)
//! in place of the teacher's SSE-only demo stream (`src/server/demo/
//! stream.rs`), since the spec requires genuinely bidirectional intent
//! submission, not just server push.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::{Message, WebSocket};
use chrono::Utc;
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::domain::{RoomId, UserId, VerifiedIdentity};
use crate::game::{GameIntent, PersonalizedGameState, PublicGameEvent};
use crate::server::app::AppState;
use crate::session::RoomBroadcast;

use super::connection::ConnectionHandle;
use super::messages::{AuthFailureCode, ErrorCode, InboundEvent, OutboundEvent};

const LOG_TARGET: &str = "transport::ws";
const AUTH_TIMEOUT: Duration = Duration::from_secs(10);

pub async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sink, mut stream) = socket.split();
    let (outbound_tx, mut outbound_rx) = super::connection::ConnectionRegistry::outbound_channel();

    let writer = tokio::spawn(async move {
        while let Some(event) = outbound_rx.recv().await {
            let Ok(text) = serde_json::to_string(&event) else {
                continue;
            };
            if sink.send(Message::Text(text)).await.is_err() {
                break;
            }
        }
    });

    let identity = match authenticate(&mut stream, &outbound_tx, &state).await {
        Some(identity) => identity,
        None => {
            writer.abort();
            return;
        }
    };

    let connection_id = Uuid::new_v4();
    if let Some(previous) = state.connections.register(
        identity.user_id.clone(),
        ConnectionHandle {
            connection_id,
            outbound_tx: outbound_tx.clone(),
        },
    ) {
        let _ = previous.try_send(OutboundEvent::AuthenticationFailed {
            code: AuthFailureCode::Displaced,
            requires_login: false,
        });
    }

    let _ = outbound_tx
        .send(OutboundEvent::Authenticated {
            user_id: identity.user_id.clone(),
            display_name: identity.display_name.clone(),
            server_time: Utc::now().timestamp(),
            connection_id,
        })
        .await;

    let mut subscription: Option<(RoomId, tokio::task::JoinHandle<()>)> = None;
    // Scopes every intent this connection submits. Cancelled on teardown so
    // the room loop can drop anything still queued once this connection is
    // gone rather than apply it on behalf of nobody.
    let connection_cancellation = CancellationToken::new();

    while let Some(Ok(message)) = stream.next().await {
        let Message::Text(text) = message else {
            continue;
        };
        let inbound: InboundEvent = match serde_json::from_str(&text) {
            Ok(inbound) => inbound,
            Err(err) => {
                let _ = outbound_tx
                    .send(OutboundEvent::ActionError {
                        code: ErrorCode::InvalidEnum,
                        message: err.to_string(),
                        action_attempted: "decode".to_string(),
                    })
                    .await;
                continue;
            }
        };

        dispatch(
            inbound,
            &identity,
            &state,
            &outbound_tx,
            &mut subscription,
            &connection_cancellation,
        )
        .await;
    }

    connection_cancellation.cancel();
    if let Some((room_id, handle)) = subscription.take() {
        handle.abort();
        broadcast_status_update(&state, room_id, &identity.user_id, false).await;
    }
    state
        .connections
        .remove_if_current(&identity.user_id, connection_id);
    writer.abort();
}

/// Notifies every other participant of `room_id` that `user_id`'s
/// connection status changed. Best-effort: a participant with no live
/// connection simply misses it, same as any other `send_to` fan-out.
async fn broadcast_status_update(state: &Arc<AppState>, room_id: RoomId, user_id: &str, connected: bool) {
    let Ok(room) = state.sessions.get_room(room_id) else {
        return;
    };
    for participant in room.summary().participants {
        if participant.user_id == user_id {
            continue;
        }
        state.connections.send_to(
            &participant.user_id,
            OutboundEvent::ParticipantStatusUpdate {
                room_id,
                user_id: user_id.to_string(),
                connected,
            },
        );
    }
}

async fn authenticate(
    stream: &mut (impl futures::Stream<Item = Result<Message, axum::Error>> + Unpin),
    outbound_tx: &mpsc::Sender<OutboundEvent>,
    state: &Arc<AppState>,
) -> Option<VerifiedIdentity> {
    let first = tokio::time::timeout(AUTH_TIMEOUT, stream.next()).await;
    let Ok(Some(Ok(Message::Text(text)))) = first else {
        let _ = outbound_tx
            .send(OutboundEvent::AuthenticationFailed {
                code: AuthFailureCode::InvalidToken,
                requires_login: true,
            })
            .await;
        return None;
    };

    let Ok(InboundEvent::Authenticate { access_token, .. }) = serde_json::from_str(&text) else {
        let _ = outbound_tx
            .send(OutboundEvent::AuthenticationFailed {
                code: AuthFailureCode::InvalidToken,
                requires_login: true,
            })
            .await;
        return None;
    };

    match state.identity.verify(&access_token) {
        Ok(identity) => Some(identity),
        Err(err) => {
            tracing::info!(target: LOG_TARGET, %err, "authentication failed");
            let code = match err {
                crate::identity::AuthError::Expired => AuthFailureCode::TokenExpired,
                crate::identity::AuthError::Revoked => AuthFailureCode::UserBanned,
                _ => AuthFailureCode::InvalidToken,
            };
            let _ = outbound_tx
                .send(OutboundEvent::AuthenticationFailed {
                    code,
                    requires_login: true,
                })
                .await;
            None
        }
    }
}

async fn dispatch(
    inbound: InboundEvent,
    identity: &VerifiedIdentity,
    state: &Arc<AppState>,
    outbound_tx: &mpsc::Sender<OutboundEvent>,
    subscription: &mut Option<(RoomId, tokio::task::JoinHandle<()>)>,
    connection_cancellation: &CancellationToken,
) {
    let user_id = identity.user_id.clone();
    match inbound {
        InboundEvent::Authenticate { .. } => {}
        InboundEvent::Heartbeat { timestamp } => {
            let _ = outbound_tx
                .send(OutboundEvent::HeartbeatAck {
                    server_timestamp: Utc::now().timestamp(),
                    latency_ms: (Utc::now().timestamp_millis() - timestamp).max(0),
                })
                .await;
        }
        InboundEvent::JoinRoom { room_id } => {
            let Ok(room) = state.sessions.get_room(room_id) else {
                send_error(outbound_tx, "room_not_found", "join_room").await;
                return;
            };
            match room
                .join_with(
                    VerifiedIdentity {
                        user_id: user_id.clone(),
                        display_name: identity.display_name.clone(),
                    },
                    connection_cancellation.clone(),
                )
                .await
            {
                Ok(_) => {
                    if let Some((_, old)) = subscription.take() {
                        old.abort();
                    }
                    *subscription = Some((room_id, spawn_forwarder(room.subscribe(), user_id.clone(), outbound_tx.clone())));
                    let summary = room.summary();
                    let your_view = summary
                        .participants
                        .iter()
                        .find(|p| p.user_id == user_id)
                        .cloned();
                    if let Some(your_participation) = your_view {
                        let _ = outbound_tx
                            .send(OutboundEvent::RoomJoined {
                                room_id,
                                participants: summary.participants.clone(),
                                room_state: summary,
                                your_participation,
                            })
                            .await;
                    }
                    broadcast_status_update(state, room_id, &user_id, true).await;
                }
                Err(err) => send_session_error(outbound_tx, &err, "join_room").await,
            }
        }
        InboundEvent::LeaveRoom { room_id } => {
            if let Ok(room) = state.sessions.get_room(room_id) {
                if let Err(err) = room.leave_with(user_id.clone(), connection_cancellation.clone()).await {
                    send_session_error(outbound_tx, &err, "leave_room").await;
                } else if let Some((subscribed_room, handle)) = subscription.take() {
                    if subscribed_room == room_id {
                        handle.abort();
                    } else {
                        *subscription = Some((subscribed_room, handle));
                    }
                }
            }
        }
        InboundEvent::Claim {
            room_id,
            card_id,
            claimed_creature,
            target_user_id,
        } => {
            submit_game_intent(
                state,
                outbound_tx,
                room_id,
                GameIntent::Claim {
                    claimer: user_id,
                    card_id,
                    claimed_creature,
                    target: target_user_id,
                },
                "claim",
                connection_cancellation,
            )
            .await;
        }
        InboundEvent::Respond {
            room_id,
            round_id,
            believe_claim,
        } => {
            submit_game_intent(
                state,
                outbound_tx,
                room_id,
                GameIntent::Respond {
                    responder: user_id,
                    round_id,
                    believed: believe_claim,
                },
                "respond",
                connection_cancellation,
            )
            .await;
        }
        InboundEvent::Pass {
            room_id,
            round_id,
            target_user_id,
            new_claim,
        } => {
            submit_game_intent(
                state,
                outbound_tx,
                room_id,
                GameIntent::Pass {
                    passer: user_id,
                    round_id,
                    new_target: target_user_id,
                    new_claimed_creature: new_claim,
                },
                "pass",
                connection_cancellation,
            )
            .await;
        }
        InboundEvent::GetState { room_id } => {
            let Ok(room) = state.sessions.get_room(room_id) else {
                send_error(outbound_tx, "room_not_found", "get_state").await;
                return;
            };
            match room.get_state_with(user_id, connection_cancellation.clone()).await {
                Ok(personalized) => {
                    let _ = outbound_tx
                        .send(OutboundEvent::GameStateUpdate {
                            room_id,
                            game_state: personalized,
                            timestamp: Utc::now().timestamp(),
                        })
                        .await;
                }
                Err(err) => send_session_error(outbound_tx, &err, "get_state").await,
            }
        }
    }
}

async fn submit_game_intent(
    state: &Arc<AppState>,
    outbound_tx: &mpsc::Sender<OutboundEvent>,
    room_id: RoomId,
    intent: GameIntent,
    action: &str,
    cancellation: &CancellationToken,
) {
    let Ok(room) = state.sessions.get_room(room_id) else {
        send_error(outbound_tx, "room_not_found", action).await;
        return;
    };
    if let Err(err) = room.submit_with(intent, cancellation.clone()).await {
        send_session_error(outbound_tx, &err, action).await;
    }
}

fn spawn_forwarder(
    mut receiver: tokio::sync::broadcast::Receiver<RoomBroadcast>,
    viewer: UserId,
    outbound_tx: mpsc::Sender<OutboundEvent>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let broadcast = match receiver.recv().await {
                Ok(broadcast) => broadcast,
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                Err(tokio::sync::broadcast::error::RecvError::Lagged(_)) => continue,
            };
            for event in outbound_events_for(&broadcast, &viewer) {
                if outbound_tx.send(event).await.is_err() {
                    return;
                }
            }
        }
    })
}

fn outbound_events_for(broadcast: &RoomBroadcast, viewer: &str) -> Vec<OutboundEvent> {
    let room_id = broadcast.room_id;
    let mut events = Vec::new();
    match &broadcast.event {
        PublicGameEvent::ParticipantJoined {
            user_id,
            display_name,
            seat_index,
        } => events.push(OutboundEvent::ParticipantJoined {
            room_id,
            user_id: user_id.clone(),
            display_name: display_name.clone(),
            seat_index: *seat_index,
        }),
        PublicGameEvent::ParticipantLeft { user_id } => events.push(OutboundEvent::ParticipantLeft {
            room_id,
            user_id: user_id.clone(),
        }),
        PublicGameEvent::GameStarted { .. } => {}
        PublicGameEvent::CardClaimed {
            round_id,
            claimer,
            claimed_creature,
            target,
        } => events.push(OutboundEvent::CardClaimed {
            room_id,
            round_id: *round_id,
            claimer: claimer.clone(),
            claimed_creature: *claimed_creature,
            target: target.clone(),
        }),
        PublicGameEvent::CardPassed {
            round_id,
            passer,
            new_target,
            new_claimed_creature,
            pass_count,
        } => events.push(OutboundEvent::CardPassed {
            room_id,
            round_id: *round_id,
            passer: passer.clone(),
            new_target: new_target.clone(),
            new_claimed_creature: *new_claimed_creature,
            pass_count: *pass_count,
        }),
        PublicGameEvent::ClaimResponded {
            round_id,
            actual_creature,
            was_correct,
            penalty_receiver_id,
        } => {
            events.push(OutboundEvent::ClaimResponded {
                room_id,
                round_id: *round_id,
                actual_creature: *actual_creature,
                was_correct: *was_correct,
                penalty_receiver_id: penalty_receiver_id.clone(),
            });
            events.push(OutboundEvent::RoundCompleted {
                room_id,
                round_id: *round_id,
            });
        }
        PublicGameEvent::GameEnded { winner_id, loser_id } => {
            events.push(OutboundEvent::GameEnded {
                room_id,
                winner_id: winner_id.clone(),
                loser_id: loser_id.clone(),
            });
        }
    }

    events.push(OutboundEvent::GameStateUpdate {
        room_id,
        game_state: PersonalizedGameState::for_viewer(&broadcast.state, viewer),
        timestamp: Utc::now().timestamp(),
    });
    events
}

async fn send_error(outbound_tx: &mpsc::Sender<OutboundEvent>, code: &str, action: &str) {
    let _ = outbound_tx
        .send(OutboundEvent::ActionError {
            code: ErrorCode::from_game_error_code(code),
            message: code.to_string(),
            action_attempted: action.to_string(),
        })
        .await;
}

async fn send_session_error(
    outbound_tx: &mpsc::Sender<OutboundEvent>,
    err: &crate::session::SessionError,
    action: &str,
) {
    let _ = outbound_tx
        .send(OutboundEvent::ActionError {
            code: ErrorCode::from_game_error_code(err.code()),
            message: err.to_string(),
            action_attempted: action.to_string(),
        })
        .await;
}
