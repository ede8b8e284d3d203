//! Game State Machine (C3) and the Room Lifecycle (C6) operations that
//! share its state. Both are pure: `fn(&GameState, Intent) -> Result<...>`
//! with no I/O, mirroring `BettingEngineNL::apply_action`'s shape.

pub mod errors;
pub mod events;
pub mod intent;
pub mod state;
pub mod state_machine;

#[cfg(test)]
mod tests;

pub use errors::GameError;
pub use events::{PublicGameEvent, StepOutcome};
pub use intent::GameIntent;
pub use state::{GameState, PersonalizedGameState, PersonalizedRound, PlayerSlot, Round, SeatIndex};
