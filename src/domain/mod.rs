//! Core domain types shared across the session engine.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub mod transcript;

pub use transcript::*;

/// ---------- Common type aliases ----------
pub type RoomId = uuid::Uuid;
pub type UserId = String;
pub type RoundId = uuid::Uuid;
pub type ConnectionId = uuid::Uuid;
pub type CardId = String;
pub type CorrelationId = String;

/// The four creature tags. Closed set; card identity never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Creature {
    Cockroach,
    Mouse,
    Bat,
    Frog,
}

impl Creature {
    pub const ALL: [Creature; 4] = [
        Creature::Cockroach,
        Creature::Mouse,
        Creature::Bat,
        Creature::Frog,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Creature::Cockroach => "cockroach",
            Creature::Mouse => "mouse",
            Creature::Bat => "bat",
            Creature::Frog => "frog",
        }
    }
}

impl std::fmt::Display for Creature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A physical card: creature plus an opaque id unique within a deck.
/// Identity survives passes, reveals, and penalty-pile assignment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub creature: Creature,
    pub id: CardId,
}

/// Per-player accumulation of revealed cards, grouped by creature.
/// First pile to reach three loses the game.
pub type PenaltyPile = BTreeMap<Creature, Vec<Card>>;

pub fn empty_penalty_pile() -> PenaltyPile {
    Creature::ALL.into_iter().map(|c| (c, Vec::new())).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomStatus {
    Waiting,
    InProgress,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorType {
    Player,
    System,
}

/// Stable authenticated identity extracted from a bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiedIdentity {
    pub user_id: UserId,
    pub display_name: String,
}
