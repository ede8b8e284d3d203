//! Broadcast outputs of an accepted state transition. Already
//! privacy-filtered at the domain level: hands never appear here, and the
//! resolved card's creature appears only once a round has completed.

use serde::{Deserialize, Serialize};

use crate::domain::{AuditEntry, Creature, RoundId, UserId};

use super::state::GameState;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
#[allow(clippy::large_enum_variant)]
pub enum PublicGameEvent {
    ParticipantJoined {
        user_id: UserId,
        display_name: String,
        seat_index: u8,
    },
    ParticipantLeft {
        user_id: UserId,
    },
    GameStarted {
        current_turn_user_id: UserId,
    },
    CardClaimed {
        round_id: RoundId,
        claimer: UserId,
        claimed_creature: Creature,
        target: UserId,
    },
    CardPassed {
        round_id: RoundId,
        passer: UserId,
        new_target: UserId,
        new_claimed_creature: Creature,
        pass_count: u32,
    },
    ClaimResponded {
        round_id: RoundId,
        actual_creature: Creature,
        was_correct: bool,
        penalty_receiver_id: UserId,
    },
    GameEnded {
        winner_id: UserId,
        loser_id: UserId,
    },
}

/// Result of a single accepted transition: the new state, its public
/// broadcast, and the audit rows it produced.
#[derive(Debug, Clone)]
pub struct StepOutcome {
    pub state: GameState,
    pub broadcast: PublicGameEvent,
    pub audit: Vec<AuditEntry>,
}
