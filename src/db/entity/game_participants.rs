//! `game_participants` table (§6): one row per seated player.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "game_participants")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub game_id: Uuid,
    pub player_id: String,
    pub position: i16,
    pub hand_cards: Json,
    pub penalty_cockroach: Json,
    pub penalty_mouse: Json,
    pub penalty_bat: Json,
    pub penalty_frog: Json,
    pub cards_remaining: i32,
    pub has_lost: bool,
    pub losing_creature_type: Option<String>,
    pub status: String,
    pub joined_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
