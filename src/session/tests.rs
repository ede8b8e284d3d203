#![cfg(test)]

//! Integration tests driving the real async room loop through `SessionStore`
//! and `RoomHandle` — the invariants and end-to-end scenarios from §8 that
//! only manifest once the single-writer task, its channels, and genuine
//! concurrency are in play (the pure-function cases already live in
//! `game::tests`).

use std::sync::Arc;
use std::time::Duration;

use crate::domain::{RoomStatus, VerifiedIdentity};
use crate::game::{GameIntent, PersonalizedGameState, PublicGameEvent};
use crate::record_sink::InMemoryRecordSink;

use super::store::{SessionStore, SessionStoreConfig};

fn identity(user_id: &str, display_name: &str) -> VerifiedIdentity {
    VerifiedIdentity {
        user_id: user_id.to_string(),
        display_name: display_name.to_string(),
    }
}

fn new_store(grace_period: Duration) -> Arc<SessionStore> {
    Arc::new(SessionStore::new(
        Arc::new(InMemoryRecordSink::new()),
        SessionStoreConfig {
            room_queue_capacity: 64,
            room_grace_period: grace_period,
        },
    ))
}

#[tokio::test]
async fn join_then_start_deals_nine_card_hands() {
    let store = new_store(Duration::from_secs(30));
    let room = store.create_room("u-a".into(), "Alice".into(), Duration::from_secs(60));
    room.join(identity("u-b", "Bob")).await.unwrap();
    room.start("u-a".into()).await.unwrap();

    let view_a = room.get_state("u-a".into()).await.unwrap();
    assert_eq!(view_a.status, RoomStatus::InProgress);
    assert_eq!(view_a.your_hand.unwrap().len(), 9);
    assert!(view_a.current_turn_user_id.is_some());
}

#[tokio::test]
async fn join_to_full_room_returns_room_full_and_leaves_slots_untouched() {
    let store = new_store(Duration::from_secs(30));
    let room = store.create_room("u-a".into(), "Alice".into(), Duration::from_secs(60));
    room.join(identity("u-b", "Bob")).await.unwrap();

    let before = room.summary();
    let err = room.join(identity("u-c", "Carl")).await.unwrap_err();
    assert_eq!(err.code(), "room_full");

    let after = room.summary();
    assert_eq!(before.participants.len(), after.participants.len());
}

#[tokio::test]
async fn start_with_one_occupant_returns_validation_and_stays_waiting() {
    let store = new_store(Duration::from_secs(30));
    let room = store.create_room("u-a".into(), "Alice".into(), Duration::from_secs(60));

    let err = room.start("u-a".into()).await.unwrap_err();
    assert_eq!(err.code(), "validation");
    assert_eq!(room.summary().status, RoomStatus::Waiting);
}

#[tokio::test]
async fn get_state_never_mutates_the_room() {
    let store = new_store(Duration::from_secs(30));
    let room = store.create_room("u-a".into(), "Alice".into(), Duration::from_secs(60));
    room.join(identity("u-b", "Bob")).await.unwrap();
    room.start("u-a".into()).await.unwrap();

    let before = room.summary();
    for _ in 0..5 {
        let _ = room.get_state("u-a".into()).await.unwrap();
        let _ = room.get_state("u-b".into()).await.unwrap();
    }
    let after = room.summary();
    assert_eq!(before.current_turn_user_id, after.current_turn_user_id);
    assert_eq!(before.status, after.status);
}

/// Scenario 6 — privacy: every frame delivered to the non-acting player
/// must omit the opponent's hand, and must not reveal the round card's
/// creature before `claim_responded`.
#[tokio::test]
async fn privacy_hides_opponent_hand_and_live_round_creature() {
    let store = new_store(Duration::from_secs(30));
    let room = store.create_room("u-a".into(), "Alice".into(), Duration::from_secs(60));
    room.join(identity("u-b", "Bob")).await.unwrap();
    room.start("u-a".into()).await.unwrap();

    let mut subscriber = room.subscribe();

    let hand_a = room
        .get_state("u-a".into())
        .await
        .unwrap()
        .your_hand
        .unwrap();
    let card = hand_a[0].clone();

    room.submit(GameIntent::Claim {
        claimer: "u-a".to_string(),
        card_id: card.id.clone(),
        claimed_creature: card.creature,
        target: "u-b".to_string(),
    })
    .await
    .unwrap();

    let broadcast = subscriber.recv().await.unwrap();
    let view_for_b = PersonalizedGameState::for_viewer(&broadcast.state, "u-b");
    assert!(view_for_b
        .your_hand
        .unwrap()
        .iter()
        .all(|c| !hand_a.iter().any(|h| h.id == c.id)));
    let live_round = view_for_b.active_round.unwrap();
    assert!(live_round.actual_creature.is_none());

    let round_id = match broadcast.event {
        PublicGameEvent::CardClaimed { round_id, .. } => round_id,
        other => panic!("expected CardClaimed, got {other:?}"),
    };

    room.submit(GameIntent::Respond {
        responder: "u-b".to_string(),
        round_id,
        believed: false,
    })
    .await
    .unwrap();

    let broadcast = subscriber.recv().await.unwrap();
    let view_for_b = PersonalizedGameState::for_viewer(&broadcast.state, "u-b");
    assert!(view_for_b.active_round.is_none());
    match broadcast.event {
        PublicGameEvent::ClaimResponded { actual_creature, .. } => {
            assert_eq!(actual_creature, card.creature);
        }
        other => panic!("expected ClaimResponded, got {other:?}"),
    }
}

/// Scenario 7 — ordering: events accepted in sequence are observed by a
/// subscriber in that same sequence.
#[tokio::test]
async fn subscriber_observes_events_in_acceptance_order() {
    let store = new_store(Duration::from_secs(30));
    let room = store.create_room("u-a".into(), "Alice".into(), Duration::from_secs(60));
    let mut subscriber = room.subscribe();

    room.join(identity("u-b", "Bob")).await.unwrap();
    room.start("u-a".into()).await.unwrap();

    let first = subscriber.recv().await.unwrap();
    let second = subscriber.recv().await.unwrap();

    assert!(matches!(
        first.event,
        PublicGameEvent::ParticipantJoined { .. }
    ));
    assert!(matches!(second.event, PublicGameEvent::GameStarted { .. }));
}

/// Scenario 5 — invariant under concurrent intents: two simultaneous claims
/// from the turn holder resolve to exactly one acceptance; the loser gets a
/// rejection, and the hand's card count is conserved either way.
#[tokio::test]
async fn only_one_of_two_concurrent_claims_is_accepted() {
    let store = new_store(Duration::from_secs(30));
    let room = store.create_room("u-a".into(), "Alice".into(), Duration::from_secs(60));
    room.join(identity("u-b", "Bob")).await.unwrap();
    room.start("u-a".into()).await.unwrap();

    let hand_a = room
        .get_state("u-a".into())
        .await
        .unwrap()
        .your_hand
        .unwrap();
    let first_card = hand_a[0].clone();
    let second_card = hand_a[1].clone();

    let room_one = room.clone();
    let room_two = room.clone();
    let claim_one = tokio::spawn(async move {
        room_one
            .submit(GameIntent::Claim {
                claimer: "u-a".to_string(),
                card_id: first_card.id,
                claimed_creature: first_card.creature,
                target: "u-b".to_string(),
            })
            .await
    });
    let claim_two = tokio::spawn(async move {
        room_two
            .submit(GameIntent::Claim {
                claimer: "u-a".to_string(),
                card_id: second_card.id,
                claimed_creature: second_card.creature,
                target: "u-b".to_string(),
            })
            .await
    });

    let (result_one, result_two) = tokio::join!(claim_one, claim_two);
    let outcomes = [result_one.unwrap(), result_two.unwrap()];
    assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
    assert_eq!(
        outcomes.iter().filter(|r| r.is_err()).count(),
        1,
        "the second claim must be rejected while a round is already active"
    );

    let remaining = room
        .get_state("u-a".into())
        .await
        .unwrap()
        .your_hand
        .unwrap();
    assert_eq!(remaining.len(), 8, "exactly one card left claimer's hand");
}

/// Scenario 4 — a third penalty card of the same creature ends the game;
/// the room keeps answering `get_state` during its grace window, rejects
/// further game intents, then evicts once the window elapses. Seeds B's
/// penalty pile directly (as `game::tests::scenario_third_penalty_card_ends_game`
/// does at the pure-function layer) so the outcome doesn't depend on a
/// particular shuffle producing the right hand shape.
#[tokio::test]
async fn game_ends_after_third_penalty_card_then_room_is_evicted() {
    use crate::domain::Creature;
    use crate::game::GameState;

    let mut state = GameState::new(
        uuid::Uuid::new_v4(),
        "u-a".to_string(),
        "Alice".to_string(),
        Duration::from_secs(60),
    );
    state = crate::game::state_machine::join(state, "u-b".to_string(), "Bob".to_string())
        .unwrap()
        .state;
    state = crate::game::state_machine::start(state, "u-a".to_string(), Some(1))
        .unwrap()
        .state;

    {
        let b = state.slots[1].as_mut().unwrap();
        b.penalty_pile.insert(
            Creature::Mouse,
            vec![
                crate::domain::Card { creature: Creature::Mouse, id: "mouse_x".into() },
                crate::domain::Card { creature: Creature::Mouse, id: "mouse_y".into() },
            ],
        );
        let a = state.slots[0].as_mut().unwrap();
        if !a.hand.iter().any(|c| c.creature == Creature::Mouse) {
            a.hand[0] = crate::domain::Card { creature: Creature::Mouse, id: "mouse_z".into() };
        }
        state.current_turn_user_id = Some("u-a".to_string());
    }
    let card_id = state.slots[0]
        .as_ref()
        .unwrap()
        .hand
        .iter()
        .find(|c| c.creature == Creature::Mouse)
        .unwrap()
        .id
        .clone();

    let room = super::room_loop::spawn(
        state,
        super::room_loop::RoomLoopConfig {
            queue_capacity: 16,
            rng_seed: Some(1),
            grace_period: Duration::from_millis(50),
        },
        Arc::new(InMemoryRecordSink::new()),
        |_room_id| {},
    );

    let mut subscriber = room.subscribe();

    room.submit(GameIntent::Claim {
        claimer: "u-a".to_string(),
        card_id,
        claimed_creature: Creature::Mouse,
        target: "u-b".to_string(),
    })
    .await
    .unwrap();
    let round_id = match subscriber.recv().await.unwrap().event {
        PublicGameEvent::CardClaimed { round_id, .. } => round_id,
        other => panic!("expected CardClaimed, got {other:?}"),
    };

    room.submit(GameIntent::Respond {
        responder: "u-b".to_string(),
        round_id,
        believed: true,
    })
    .await
    .unwrap();

    assert_eq!(room.summary().status, RoomStatus::Completed);

    let err = room
        .submit(GameIntent::Claim {
            claimer: "u-a".to_string(),
            card_id: "does-not-matter".to_string(),
            claimed_creature: Creature::Frog,
            target: "u-b".to_string(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.code(), "game_not_active");

    // still answers get_state during the grace window
    assert!(room.get_state("u-a".into()).await.is_ok());

    tokio::time::sleep(Duration::from_millis(200)).await;
    let evicted = room.get_state("u-a".into()).await;
    assert!(evicted.is_err(), "room loop should exit after its grace window");
}
