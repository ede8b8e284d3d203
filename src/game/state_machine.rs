//! Pure transitions over `GameState`. Every function here takes state by
//! value and returns a new value plus an outcome — no I/O, no shared
//! mutable access — grounded on `BettingEngineNL::apply_action`
//! (`src/engine/nl/engine.rs`), adapted to return a new state rather than
//! mutate in place since the caller (the room loop, §5) already owns
//! exclusive access and a value-returning core is simpler to unit test.

use rand::rngs::StdRng;
use rand::SeedableRng;
use uuid::Uuid;

use crate::deck::{build_deck, deal, shuffle, DEFAULT_HAND_SIZE};
use crate::domain::{ActorType, AuditEntry, Creature, RoomStatus, UserId};

use super::errors::GameError;
use super::events::{PublicGameEvent, StepOutcome};
use super::intent::GameIntent;
use super::state::{GameState, PlayerSlot, Round};

fn audit(state: &GameState, actor: &str, kind: &str, payload: serde_json::Value) -> AuditEntry {
    AuditEntry::new(state.room_id, ActorType::Player, actor, kind, payload)
}

/// Room Lifecycle (C6) — Join: reserves slot 1 atomically.
pub fn join(
    mut state: GameState,
    user_id: UserId,
    display_name: String,
) -> Result<StepOutcome, GameError> {
    if !matches!(state.status, RoomStatus::Waiting) {
        return Err(GameError::GameNotActive);
    }
    if state.is_participant(&user_id) {
        return Err(GameError::AlreadyJoined);
    }
    let free_slot = state
        .slots
        .iter()
        .position(|s| s.is_none())
        .ok_or(GameError::RoomFull)?;

    state.slots[free_slot] = Some(PlayerSlot {
        user_id: user_id.clone(),
        display_name: display_name.clone(),
        seat_index: free_slot as u8,
        hand: Vec::new(),
        penalty_pile: crate::domain::empty_penalty_pile(),
        has_lost: false,
    });

    let entry = audit(
        &state,
        &user_id,
        "join_game",
        serde_json::json!({ "seat_index": free_slot }),
    );

    Ok(StepOutcome {
        broadcast: PublicGameEvent::ParticipantJoined {
            user_id,
            display_name,
            seat_index: free_slot as u8,
        },
        audit: vec![entry],
        state,
    })
}

/// Room Lifecycle (C6) — Leave: permitted only while `Waiting`.
pub fn leave(mut state: GameState, user_id: UserId) -> Result<StepOutcome, GameError> {
    if !matches!(state.status, RoomStatus::Waiting) {
        return Err(GameError::CannotLeaveInProgress);
    }
    if !state.is_participant(&user_id) {
        return Err(GameError::NotParticipant);
    }

    for slot in state.slots.iter_mut() {
        if slot.as_ref().map(|s| s.user_id == user_id).unwrap_or(false) {
            *slot = None;
        }
    }
    if state.creator_user_id == user_id {
        state.status = RoomStatus::Cancelled;
    }

    let entry = audit(&state, &user_id, "leave_game", serde_json::json!({}));

    Ok(StepOutcome {
        broadcast: PublicGameEvent::ParticipantLeft { user_id },
        audit: vec![entry],
        state,
    })
}

/// Room Lifecycle (C6) — Start: only the creator, only once both slots are
/// occupied. Shuffles a fresh deck, deals hands, slot 0 takes first turn.
pub fn start(
    mut state: GameState,
    caller: UserId,
    rng_seed: Option<u64>,
) -> Result<StepOutcome, GameError> {
    if caller != state.creator_user_id {
        return Err(GameError::NotCreator);
    }
    if state.occupied_count() < 2 {
        return Err(GameError::NotEnoughPlayers);
    }
    if !matches!(state.status, RoomStatus::Waiting) {
        return Err(GameError::GameNotActive);
    }

    let mut rng = match rng_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut deck = build_deck();
    shuffle(&mut deck, &mut rng);
    let (hand_a, hand_b, reserve) = deal(deck, DEFAULT_HAND_SIZE);

    let first_turn = {
        let slot0 = state.slots[0].as_mut().expect("slot 0 occupied at start");
        slot0.hand = hand_a;
        slot0.user_id.clone()
    };
    if let Some(slot1) = state.slots[1].as_mut() {
        slot1.hand = hand_b;
    }
    state.reserve = reserve;
    state.status = RoomStatus::InProgress;
    state.current_turn_user_id = Some(first_turn.clone());

    let entry = audit(&state, &caller, "start_game", serde_json::json!({}));

    Ok(StepOutcome {
        broadcast: PublicGameEvent::GameStarted {
            current_turn_user_id: first_turn,
        },
        audit: vec![entry],
        state,
    })
}

/// Game State Machine (C3) — the three in-game intents.
pub fn step(state: GameState, intent: GameIntent) -> Result<StepOutcome, GameError> {
    match intent {
        GameIntent::Claim {
            claimer,
            card_id,
            claimed_creature,
            target,
        } => apply_claim(state, claimer, card_id, claimed_creature, target),
        GameIntent::Respond {
            responder,
            round_id,
            believed,
        } => apply_respond(state, responder, round_id, believed),
        GameIntent::Pass {
            passer,
            round_id,
            new_target,
            new_claimed_creature,
        } => apply_pass(state, passer, round_id, new_target, new_claimed_creature),
    }
}

fn apply_claim(
    mut state: GameState,
    claimer: UserId,
    card_id: String,
    claimed_creature: Creature,
    target: UserId,
) -> Result<StepOutcome, GameError> {
    if !matches!(state.status, RoomStatus::InProgress) {
        return Err(GameError::GameNotActive);
    }
    if state.active_round.is_some() {
        return Err(GameError::RoundAlreadyActive);
    }
    if state.current_turn_user_id.as_deref() != Some(claimer.as_str()) {
        return Err(GameError::NotYourTurn);
    }
    if target == claimer {
        return Err(GameError::InvalidTarget);
    }
    let target_has_lost = state
        .slot(&target)
        .map(|s| s.has_lost)
        .ok_or(GameError::InvalidTarget)?;
    if target_has_lost {
        return Err(GameError::InvalidTarget);
    }

    let claimer_slot = state.slot_mut(&claimer).ok_or(GameError::NotParticipant)?;
    let card_index = claimer_slot
        .hand
        .iter()
        .position(|c| c.id == card_id)
        .ok_or(GameError::CardNotInHand)?;
    let card = claimer_slot.hand.remove(card_index);

    let round_id = Uuid::new_v4();
    state.active_round = Some(Round {
        round_id,
        claimer_user_id: claimer.clone(),
        claimed_creature,
        target_user_id: target.clone(),
        card,
        pass_count: 0,
        is_completed: false,
    });
    state.current_turn_user_id = Some(target.clone());
    state.round_number += 1;

    let entry = audit(
        &state,
        &claimer,
        "make_claim",
        serde_json::json!({
            "round_id": round_id,
            "card_id": card_id,
            "claimed_creature": claimed_creature,
            "target": target,
        }),
    )
    .with_correlation(round_id.to_string());

    Ok(StepOutcome {
        broadcast: PublicGameEvent::CardClaimed {
            round_id,
            claimer,
            claimed_creature,
            target,
        },
        audit: vec![entry],
        state,
    })
}

fn apply_pass(
    mut state: GameState,
    passer: UserId,
    round_id: crate::domain::RoundId,
    new_target: UserId,
    new_claimed_creature: Creature,
) -> Result<StepOutcome, GameError> {
    if !matches!(state.status, RoomStatus::InProgress) {
        return Err(GameError::GameNotActive);
    }
    {
        let round = state.active_round.as_ref().ok_or(GameError::NoActiveRound)?;
        if round.round_id != round_id {
            return Err(GameError::RoundNotFound);
        }
        if round.is_completed {
            return Err(GameError::RoundCompleted);
        }
        if round.target_user_id != passer {
            return Err(GameError::NotYourTurn);
        }
    }
    if state.current_turn_user_id.as_deref() != Some(passer.as_str()) {
        return Err(GameError::NotYourTurn);
    }
    if new_target == passer {
        return Err(GameError::InvalidTarget);
    }
    let new_target_has_lost = state
        .slot(&new_target)
        .map(|s| s.has_lost)
        .ok_or(GameError::InvalidTarget)?;
    if new_target_has_lost {
        return Err(GameError::InvalidTarget);
    }

    let pass_count = {
        let round = state.active_round.as_mut().expect("checked above");
        round.target_user_id = new_target.clone();
        round.claimed_creature = new_claimed_creature;
        round.claimer_user_id = passer.clone();
        round.pass_count += 1;
        round.pass_count
    };
    state.current_turn_user_id = Some(new_target.clone());

    let entry = audit(
        &state,
        &passer,
        "pass_card",
        serde_json::json!({
            "round_id": round_id,
            "new_target": new_target,
            "new_claimed_creature": new_claimed_creature,
            "pass_count": pass_count,
        }),
    )
    .with_correlation(round_id.to_string());

    Ok(StepOutcome {
        broadcast: PublicGameEvent::CardPassed {
            round_id,
            passer,
            new_target,
            new_claimed_creature,
            pass_count,
        },
        audit: vec![entry],
        state,
    })
}

fn apply_respond(
    mut state: GameState,
    responder: UserId,
    round_id: crate::domain::RoundId,
    believed: bool,
) -> Result<StepOutcome, GameError> {
    if !matches!(state.status, RoomStatus::InProgress) {
        return Err(GameError::GameNotActive);
    }
    {
        let round = state.active_round.as_ref().ok_or(GameError::NoActiveRound)?;
        if round.round_id != round_id {
            return Err(GameError::RoundNotFound);
        }
        if round.is_completed {
            return Err(GameError::RoundCompleted);
        }
        if round.target_user_id != responder {
            return Err(GameError::NotYourTurn);
        }
    }
    if state.current_turn_user_id.as_deref() != Some(responder.as_str()) {
        return Err(GameError::NotYourTurn);
    }

    let mut round = state.active_round.take().expect("checked above");
    let truthful = round.card.creature == round.claimed_creature;
    // Receiver depends only on truthful: a true claim is accepted by the
    // responder, a lie goes back to whoever authored it. `believed` feeds
    // only `was_correct` (did the guess match reality), never the receiver.
    let responder_correct = believed == truthful;
    let receiver_id = if truthful {
        responder.clone()
    } else {
        round.claimer_user_id.clone()
    };

    let actual_creature = round.card.creature;
    let card = round.card.clone();
    round.is_completed = true;

    let mut game_ended = None;
    {
        let receiver_slot = state
            .slot_mut(&receiver_id)
            .expect("penalty receiver is always a participant");
        receiver_slot
            .penalty_pile
            .entry(actual_creature)
            .or_default()
            .push(card);

        if receiver_slot.penalty_pile[&actual_creature].len() >= 3 {
            receiver_slot.has_lost = true;
            game_ended = Some(receiver_id.clone());
        }
    }

    let mut audit_entries = vec![audit(
        &state,
        &responder,
        if believed { "guess_truth" } else { "guess_lie" },
        serde_json::json!({
            "round_id": round_id,
            "believed": believed,
            "actual_creature": actual_creature,
            "penalty_receiver_id": receiver_id,
        }),
    )
    .with_correlation(round_id.to_string())];
    audit_entries.push(
        audit(
            &state,
            &receiver_id,
            "receive_penalty",
            serde_json::json!({ "round_id": round_id, "creature": actual_creature }),
        )
        .with_correlation(round_id.to_string()),
    );

    let claim_responded = PublicGameEvent::ClaimResponded {
        round_id,
        actual_creature,
        was_correct: responder_correct,
        penalty_receiver_id: receiver_id.clone(),
    };

    if let Some(loser) = game_ended {
        let winner = state.opponent_of(&loser).expect("two-player game");
        state.status = RoomStatus::Completed;
        state.winner_user_id = Some(winner.clone());
        state.current_turn_user_id = None;
        state.active_round = None;

        audit_entries.push(
            audit(
                &state,
                "system",
                "game_end",
                serde_json::json!({ "winner_id": winner, "loser_id": loser }),
            )
            .with_correlation(round_id.to_string()),
        );

        return Ok(StepOutcome {
            broadcast: PublicGameEvent::GameEnded {
                winner_id: winner,
                loser_id: loser,
            },
            audit: audit_entries,
            state,
        });
    }

    state.current_turn_user_id = Some(receiver_id);
    state.active_round = None;

    Ok(StepOutcome {
        broadcast: claim_responded,
        audit: audit_entries,
        state,
    })
}
