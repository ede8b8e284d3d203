//! Persistence boundary (§6): Postgres via `sea-orm`, reached only through
//! the `RecordSink` trait (§4.7). Schema for `games`, `game_participants`,
//! and `game_rounds` is part of the external contract this crate depends
//! on but does not migrate; only `game_actions` is written here.

pub mod entity;
pub mod record_sink;

use anyhow::{Context, Result};
use sea_orm::{Database, DatabaseConnection};

pub use record_sink::SeaOrmRecordSink;

pub async fn connect_to_postgres_db(database_url: &str) -> Result<DatabaseConnection> {
    Database::connect(database_url)
        .await
        .context("failed to connect to postgres")
}
