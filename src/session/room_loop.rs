//! The room's single-writer task. Owns the `GameState` exclusively,
//! draining a bounded `mpsc` channel of intents one at a time, running the
//! pure state machine (§4.3/§4.6), appending the audit trail (§4.7), and
//! publishing outbound broadcasts — directly grounded on
//! `LedgerWorker::run` (`src/ledger/worker.rs`):
//! `while let Some(event) = self.receiver.recv().await { ... }`.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio_util::sync::CancellationToken;

use crate::domain::{RoomId, UserId, VerifiedIdentity};
use crate::game::{state_machine, GameError, GameState, PersonalizedGameState, PublicGameEvent, SeatIndex};
use crate::record_sink::RecordSink;

use super::summary::{summarize, RoomSummary};

const LOG_TARGET: &str = "room::loop";

/// Broadcast emitted after every accepted transition. Carries the full
/// state so the transport layer can apply its own per-recipient privacy
/// projection (`PersonalizedGameState::for_viewer`) before emission.
#[derive(Debug, Clone)]
pub struct RoomBroadcast {
    pub room_id: RoomId,
    pub event: PublicGameEvent,
    pub state: GameState,
}

pub enum RoomIntent {
    Join {
        user: VerifiedIdentity,
        cancellation: CancellationToken,
        reply: oneshot::Sender<Result<SeatIndex, GameError>>,
    },
    Leave {
        user_id: UserId,
        cancellation: CancellationToken,
        reply: oneshot::Sender<Result<(), GameError>>,
    },
    Start {
        caller: UserId,
        cancellation: CancellationToken,
        reply: oneshot::Sender<Result<(), GameError>>,
    },
    Game {
        intent: crate::game::GameIntent,
        cancellation: CancellationToken,
        reply: oneshot::Sender<Result<(), GameError>>,
    },
    GetState {
        viewer: UserId,
        cancellation: CancellationToken,
        reply: oneshot::Sender<Result<PersonalizedGameState, GameError>>,
    },
}

impl RoomIntent {
    /// The cancellation scope this intent was submitted under — typically
    /// the owning connection's token. A connection that has already closed
    /// cancels it, so the loop can drop the intent without applying it.
    fn cancellation(&self) -> &CancellationToken {
        match self {
            RoomIntent::Join { cancellation, .. }
            | RoomIntent::Leave { cancellation, .. }
            | RoomIntent::Start { cancellation, .. }
            | RoomIntent::Game { cancellation, .. }
            | RoomIntent::GetState { cancellation, .. } => cancellation,
        }
    }
}

/// Clone-cheap reference to a running room: its inbound sender, its
/// broadcast sender (new subscribers call `.subscribe()`), and a `watch`
/// channel exposing the latest read-only summary.
#[derive(Clone)]
pub struct RoomHandle {
    pub room_id: RoomId,
    intent_tx: mpsc::Sender<RoomIntent>,
    broadcast_tx: broadcast::Sender<RoomBroadcast>,
    summary_rx: watch::Receiver<RoomSummary>,
    pub cancellation: CancellationToken,
}

const ENQUEUE_TIMEOUT: Duration = Duration::from_secs(2);

impl RoomHandle {
    pub fn subscribe(&self) -> broadcast::Receiver<RoomBroadcast> {
        self.broadcast_tx.subscribe()
    }

    pub fn summary(&self) -> RoomSummary {
        self.summary_rx.borrow().clone()
    }

    async fn send<T>(
        &self,
        cancellation: CancellationToken,
        build: impl FnOnce(CancellationToken, oneshot::Sender<Result<T, GameError>>) -> RoomIntent,
    ) -> Result<T, super::SessionError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        let intent = build(cancellation, reply_tx);

        match tokio::time::timeout(ENQUEUE_TIMEOUT, self.intent_tx.send(intent)).await {
            Ok(Ok(())) => {}
            Ok(Err(_)) => return Err(super::SessionError::NotFound),
            Err(_) => return Err(super::SessionError::Busy),
        }

        match tokio::time::timeout(ENQUEUE_TIMEOUT, reply_rx).await {
            Ok(Ok(result)) => result.map_err(super::SessionError::Game),
            Ok(Err(_)) => Err(super::SessionError::Unresponsive),
            Err(_) => Err(super::SessionError::Busy),
        }
    }

    pub async fn join(&self, user: VerifiedIdentity) -> Result<SeatIndex, super::SessionError> {
        self.join_with(user, CancellationToken::new()).await
    }

    /// Like `join`, but the intent carries the caller's own cancellation
    /// scope (e.g. a WebSocket connection's token) instead of a token that
    /// never fires, so the loop can drop it if that connection is already
    /// gone by the time the intent is dequeued.
    pub async fn join_with(
        &self,
        user: VerifiedIdentity,
        cancellation: CancellationToken,
    ) -> Result<SeatIndex, super::SessionError> {
        self.send(cancellation, |cancellation, reply| RoomIntent::Join {
            user,
            cancellation,
            reply,
        })
        .await
    }

    pub async fn leave(&self, user_id: UserId) -> Result<(), super::SessionError> {
        self.leave_with(user_id, CancellationToken::new()).await
    }

    pub async fn leave_with(
        &self,
        user_id: UserId,
        cancellation: CancellationToken,
    ) -> Result<(), super::SessionError> {
        self.send(cancellation, |cancellation, reply| RoomIntent::Leave {
            user_id,
            cancellation,
            reply,
        })
        .await
    }

    pub async fn start(&self, caller: UserId) -> Result<(), super::SessionError> {
        self.start_with(caller, CancellationToken::new()).await
    }

    pub async fn start_with(
        &self,
        caller: UserId,
        cancellation: CancellationToken,
    ) -> Result<(), super::SessionError> {
        self.send(cancellation, |cancellation, reply| RoomIntent::Start {
            caller,
            cancellation,
            reply,
        })
        .await
    }

    pub async fn submit(&self, intent: crate::game::GameIntent) -> Result<(), super::SessionError> {
        self.submit_with(intent, CancellationToken::new()).await
    }

    pub async fn submit_with(
        &self,
        intent: crate::game::GameIntent,
        cancellation: CancellationToken,
    ) -> Result<(), super::SessionError> {
        self.send(cancellation, |cancellation, reply| RoomIntent::Game {
            intent,
            cancellation,
            reply,
        })
        .await
    }

    pub async fn get_state(&self, viewer: UserId) -> Result<PersonalizedGameState, super::SessionError> {
        self.get_state_with(viewer, CancellationToken::new()).await
    }

    pub async fn get_state_with(
        &self,
        viewer: UserId,
        cancellation: CancellationToken,
    ) -> Result<PersonalizedGameState, super::SessionError> {
        self.send(cancellation, |cancellation, reply| RoomIntent::GetState {
            viewer,
            cancellation,
            reply,
        })
        .await
    }
}

pub struct RoomLoopConfig {
    pub queue_capacity: usize,
    pub rng_seed: Option<u64>,
    pub grace_period: Duration,
}

impl Default for RoomLoopConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 64,
            rng_seed: None,
            grace_period: Duration::from_secs(30),
        }
    }
}

/// Spawns the writer task for a freshly created room and returns a handle
/// to it. The task runs until the cancellation token trips or all senders
/// are dropped; `on_exit` fires exactly once with the room id right after
/// the task stops, whichever way it stopped, so the caller (normally
/// `SessionStore`) can evict its own registry entry without polling.
pub fn spawn(
    initial_state: GameState,
    config: RoomLoopConfig,
    record_sink: Arc<dyn RecordSink>,
    on_exit: impl FnOnce(RoomId) + Send + 'static,
) -> RoomHandle {
    let room_id = initial_state.room_id;
    let (intent_tx, intent_rx) = mpsc::channel(config.queue_capacity);
    let (broadcast_tx, _) = broadcast::channel(256);
    let (summary_tx, summary_rx) = watch::channel(summarize(&initial_state));
    let cancellation = CancellationToken::new();

    let handle = RoomHandle {
        room_id,
        intent_tx,
        broadcast_tx: broadcast_tx.clone(),
        summary_rx,
        cancellation: cancellation.clone(),
    };

    crate::tokio_tools::spawn_named_task(format!("room-loop-{room_id}"), async move {
        run(
            initial_state,
            intent_rx,
            broadcast_tx,
            summary_tx,
            record_sink,
            cancellation,
            config.rng_seed,
            config.grace_period,
        )
        .await;
        on_exit(room_id);
    });

    handle
}

async fn run(
    mut state: GameState,
    mut intent_rx: mpsc::Receiver<RoomIntent>,
    broadcast_tx: broadcast::Sender<RoomBroadcast>,
    summary_tx: watch::Sender<RoomSummary>,
    record_sink: Arc<dyn RecordSink>,
    cancellation: CancellationToken,
    rng_seed: Option<u64>,
    grace_period: Duration,
) {
    loop {
        let intent = tokio::select! {
            biased;
            _ = cancellation.cancelled() => {
                tracing::info!(target: LOG_TARGET, room_id = %state.room_id, "room loop cancelled");
                break;
            }
            received = intent_rx.recv() => match received {
                Some(intent) => intent,
                None => break,
            },
        };

        if intent.cancellation().is_cancelled() {
            tracing::debug!(target: LOG_TARGET, room_id = %state.room_id, "dropping intent cancelled by its connection");
            continue;
        }

        match intent {
            RoomIntent::Join { user, reply, .. } => {
                let outcome = state_machine::join(state.clone(), user.user_id, user.display_name);
                state = handle_lifecycle_outcome(
                    state,
                    outcome,
                    &broadcast_tx,
                    &summary_tx,
                    &record_sink,
                    |o| match &o.broadcast {
                        PublicGameEvent::ParticipantJoined { seat_index, .. } => *seat_index,
                        _ => 0,
                    },
                    reply,
                )
                .await;
            }
            RoomIntent::Leave { user_id, reply, .. } => {
                let outcome = state_machine::leave(state.clone(), user_id);
                state = handle_lifecycle_outcome(
                    state,
                    outcome,
                    &broadcast_tx,
                    &summary_tx,
                    &record_sink,
                    |_| (),
                    reply,
                )
                .await;
            }
            RoomIntent::Start { caller, reply, .. } => {
                let outcome = state_machine::start(state.clone(), caller, rng_seed);
                state = handle_lifecycle_outcome(
                    state,
                    outcome,
                    &broadcast_tx,
                    &summary_tx,
                    &record_sink,
                    |_| (),
                    reply,
                )
                .await;
            }
            RoomIntent::Game { intent, reply, .. } => {
                let outcome = state_machine::step(state.clone(), intent);
                state = handle_lifecycle_outcome(
                    state,
                    outcome,
                    &broadcast_tx,
                    &summary_tx,
                    &record_sink,
                    |_| (),
                    reply,
                )
                .await;
            }
            RoomIntent::GetState { viewer, reply, .. } => {
                let _ = reply.send(Ok(PersonalizedGameState::for_viewer(&state, &viewer)));
            }
        }

        if state.is_terminal() {
            let grace = tokio::time::sleep(grace_period);
            tokio::select! {
                _ = grace => {
                    tracing::info!(target: LOG_TARGET, room_id = %state.room_id, "grace window elapsed, evicting");
                    break;
                }
                _ = cancellation.cancelled() => break,
                received = intent_rx.recv() => {
                    match received {
                        Some(RoomIntent::GetState { viewer, reply, .. }) => {
                            let _ = reply.send(Ok(PersonalizedGameState::for_viewer(&state, &viewer)));
                        }
                        Some(other) => {
                            reject_terminal(other);
                        }
                        None => break,
                    }
                }
            }
        }
    }
}

fn reject_terminal(intent: RoomIntent) {
    match intent {
        RoomIntent::Join { reply, .. } => {
            let _ = reply.send(Err(GameError::GameNotActive));
        }
        RoomIntent::Leave { reply, .. } => {
            let _ = reply.send(Err(GameError::GameNotActive));
        }
        RoomIntent::Start { reply, .. } => {
            let _ = reply.send(Err(GameError::GameNotActive));
        }
        RoomIntent::Game { reply, .. } => {
            let _ = reply.send(Err(GameError::GameNotActive));
        }
        RoomIntent::GetState { .. } => {}
    }
}

/// Applies a state-machine outcome: swaps in the new state, publishes the
/// broadcast and summary, appends the audit trail, and replies to the
/// caller — or, on error, leaves state untouched and replies with the
/// error directly.
async fn handle_lifecycle_outcome<T>(
    state: GameState,
    outcome: Result<crate::game::StepOutcome, GameError>,
    broadcast_tx: &broadcast::Sender<RoomBroadcast>,
    summary_tx: &watch::Sender<RoomSummary>,
    record_sink: &Arc<dyn RecordSink>,
    extract_reply: impl FnOnce(&crate::game::StepOutcome) -> T,
    reply: oneshot::Sender<Result<T, GameError>>,
) -> GameState {
    match outcome {
        Ok(outcome) => {
            let reply_value = extract_reply(&outcome);
            let _ = summary_tx.send(summarize(&outcome.state));
            for entry in &outcome.audit {
                if let Err(err) = record_sink.append(entry.clone()).await {
                    tracing::warn!(target: LOG_TARGET, %err, "record sink append failed, continuing");
                }
            }
            let _ = broadcast_tx.send(RoomBroadcast {
                room_id: outcome.state.room_id,
                event: outcome.broadcast.clone(),
                state: outcome.state.clone(),
            });
            let next_state = outcome.state;
            let _ = reply.send(Ok(reply_value));
            next_state
        }
        Err(err) => {
            tracing::info!(target: LOG_TARGET, room_id = %state.room_id, %err, "intent rejected");
            let _ = reply.send(Err(err));
            state
        }
    }
}
