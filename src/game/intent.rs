//! Client intents the state machine accepts (§4.3).

use serde::{Deserialize, Serialize};

use crate::domain::{CardId, Creature, RoundId, UserId};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum GameIntent {
    Claim {
        claimer: UserId,
        card_id: CardId,
        claimed_creature: Creature,
        target: UserId,
    },
    Respond {
        responder: UserId,
        round_id: RoundId,
        believed: bool,
    },
    Pass {
        passer: UserId,
        round_id: RoundId,
        new_target: UserId,
        new_claimed_creature: Creature,
    },
}
