//! Data model (§3): Room/Game, PlayerSlot, Round. A `Room` and a `Game` are
//! the same value across its lifecycle — `status` distinguishes them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::{empty_penalty_pile, Card, Creature, PenaltyPile, RoomId, RoomStatus, RoundId, UserId};

pub type SeatIndex = u8;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerSlot {
    pub user_id: UserId,
    pub display_name: String,
    pub seat_index: SeatIndex,
    pub hand: Vec<Card>,
    pub penalty_pile: PenaltyPile,
    pub has_lost: bool,
}

impl PlayerSlot {
    fn new(user_id: UserId, display_name: String, seat_index: SeatIndex) -> Self {
        Self {
            user_id,
            display_name,
            seat_index,
            hand: Vec::new(),
            penalty_pile: empty_penalty_pile(),
            has_lost: false,
        }
    }
}

/// A live claim in flight. The `card` field is server-private until the
/// round completes: never transmitted to the target before resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Round {
    pub round_id: RoundId,
    pub claimer_user_id: UserId,
    pub claimed_creature: Creature,
    pub target_user_id: UserId,
    pub card: Card,
    pub pass_count: u32,
    pub is_completed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub room_id: RoomId,
    pub creator_user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub turn_time_limit_seconds: u32,
    pub status: RoomStatus,
    pub slots: [Option<PlayerSlot>; 2],
    pub reserve: Vec<Card>,
    pub current_turn_user_id: Option<UserId>,
    pub round_number: u32,
    pub active_round: Option<Round>,
    pub winner_user_id: Option<UserId>,
}

impl GameState {
    /// Creates a fresh `Waiting` room with the creator occupying slot 0.
    pub fn new(
        room_id: RoomId,
        creator_user_id: UserId,
        creator_display_name: String,
        turn_time_limit: Duration,
    ) -> Self {
        let turn_time_limit_seconds = turn_time_limit.as_secs().clamp(30, 300) as u32;
        Self {
            room_id,
            creator_user_id: creator_user_id.clone(),
            created_at: Utc::now(),
            turn_time_limit_seconds,
            status: RoomStatus::Waiting,
            slots: [
                Some(PlayerSlot::new(creator_user_id, creator_display_name, 0)),
                None,
            ],
            reserve: Vec::new(),
            current_turn_user_id: None,
            round_number: 0,
            active_round: None,
            winner_user_id: None,
        }
    }

    pub fn slot(&self, user_id: &str) -> Option<&PlayerSlot> {
        self.slots.iter().flatten().find(|s| s.user_id == user_id)
    }

    pub fn slot_mut(&mut self, user_id: &str) -> Option<&mut PlayerSlot> {
        self.slots
            .iter_mut()
            .flatten()
            .find(|s| s.user_id == user_id)
    }

    pub fn is_participant(&self, user_id: &str) -> bool {
        self.slot(user_id).is_some()
    }

    pub fn occupied_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// The other slot's user id, if both slots are occupied.
    pub fn opponent_of(&self, user_id: &str) -> Option<UserId> {
        self.slots
            .iter()
            .flatten()
            .find(|s| s.user_id != user_id)
            .map(|s| s.user_id.clone())
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.status, RoomStatus::Completed)
    }
}

/// Privacy-filtered view of a `GameState` for one recipient (§4.5). Strips
/// the opponent's hand contents and, while the round is unresolved, the
/// round card's creature.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonalizedGameState {
    pub room_id: RoomId,
    pub status: RoomStatus,
    pub current_turn_user_id: Option<UserId>,
    pub round_number: u32,
    pub your_hand: Option<Vec<Card>>,
    pub penalty_piles: std::collections::BTreeMap<UserId, PenaltyPile>,
    pub has_lost: std::collections::BTreeMap<UserId, bool>,
    pub active_round: Option<PersonalizedRound>,
    pub winner_user_id: Option<UserId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonalizedRound {
    pub round_id: RoundId,
    pub claimer_user_id: UserId,
    pub claimed_creature: Creature,
    pub target_user_id: UserId,
    pub pass_count: u32,
    /// Only present once `is_completed` — never exposed on a live round.
    pub actual_creature: Option<Creature>,
}

impl PersonalizedGameState {
    pub fn for_viewer(state: &GameState, viewer: &str) -> Self {
        let your_hand = state.slot(viewer).map(|s| s.hand.clone());

        let penalty_piles = state
            .slots
            .iter()
            .flatten()
            .map(|s| (s.user_id.clone(), s.penalty_pile.clone()))
            .collect();

        let has_lost = state
            .slots
            .iter()
            .flatten()
            .map(|s| (s.user_id.clone(), s.has_lost))
            .collect();

        let active_round = state.active_round.as_ref().map(|round| PersonalizedRound {
            round_id: round.round_id,
            claimer_user_id: round.claimer_user_id.clone(),
            claimed_creature: round.claimed_creature,
            target_user_id: round.target_user_id.clone(),
            pass_count: round.pass_count,
            actual_creature: if round.is_completed {
                Some(round.card.creature)
            } else {
                None
            },
        });

        Self {
            room_id: state.room_id,
            status: state.status,
            current_turn_user_id: state.current_turn_user_id.clone(),
            round_number: state.round_number,
            your_hand,
            penalty_piles,
            has_lost,
            active_round,
            winner_user_id: state.winner_user_id.clone(),
        }
    }
}
