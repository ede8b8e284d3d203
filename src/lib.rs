pub mod config;
pub mod db;
pub mod deck;
pub mod domain;
pub mod game;
pub mod identity;
pub mod record_sink;
pub mod server;
pub mod session;
pub mod tokio_tools;
pub mod transport;
