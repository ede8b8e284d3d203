//! HTTP Control Plane (C8) plus process bootstrap (C9).

pub mod app;
pub mod bootstrap;
pub mod dto;
pub mod error;
pub mod logging;
pub mod routes;

pub use app::{AppState, AuthedUser};
pub use bootstrap::{run_server, ServerConfig};
pub use error::ApiError;
