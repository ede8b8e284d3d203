//! `game_rounds` table (§6): one row per claim/respond/pass round.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "game_rounds")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub game_id: Uuid,
    pub round_number: i32,
    pub current_card: Json,
    pub claiming_player_id: String,
    pub claimed_creature_type: String,
    pub target_player_id: String,
    pub pass_count: i32,
    pub is_completed: bool,
    pub final_guesser_id: Option<String>,
    pub guess_is_truth: Option<bool>,
    pub actual_is_truth: Option<bool>,
    pub penalty_receiver_id: Option<String>,
    pub created_at: DateTimeUtc,
    pub completed_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
