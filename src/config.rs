//! Process configuration (C9): CLI flags with environment-variable
//! fallbacks, parsed once at startup via `clap`'s derive API — grounded on
//! the `ServerConfig<C>` construction site in `src/server/bootstrap.rs`,
//! minus its curve-generic shuffler secrets (not part of this game). Field
//! names mirror the environment variables named in the external
//! interfaces: `PORT`, `JWT_SECRET`, `RECORD_SINK_URL`,
//! `ROOM_QUEUE_CAPACITY`, `ROOM_GRACE_PERIOD_SECS`.

use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "cockroach-poker-server", about = "Cockroach Poker game server")]
pub struct CliConfig {
    /// Port the HTTP/WebSocket listener binds to, on all interfaces.
    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// HMAC secret used to verify access tokens. Never logged.
    #[arg(long, env = "JWT_SECRET")]
    pub jwt_secret: String,

    /// Postgres connection string for the append-only action log. When
    /// absent, actions are logged and discarded (`NullRecordSink`).
    #[arg(long, env = "RECORD_SINK_URL")]
    pub record_sink_url: Option<String>,

    /// Bounded channel capacity for a room's inbound intent queue.
    #[arg(long, env = "ROOM_QUEUE_CAPACITY", default_value_t = 64)]
    pub room_queue_capacity: usize,

    /// How long a terminal room stays queryable before eviction.
    #[arg(long, env = "ROOM_GRACE_PERIOD_SECS", default_value_t = 30)]
    pub room_grace_period_secs: u64,

    /// Default turn time limit applied to newly created rooms, seconds.
    #[arg(long, env = "DEFAULT_TURN_TIME_LIMIT_SECONDS", default_value_t = 60)]
    pub default_turn_time_limit_seconds: u32,
}
