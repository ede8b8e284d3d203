pub mod game_actions;
pub mod game_participants;
pub mod game_rounds;
pub mod games;
