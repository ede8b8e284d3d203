//! Transport Hub (C5): persistent bidirectional WebSocket connections,
//! authentication, and per-recipient outbound fan-out.

pub mod connection;
pub mod messages;
pub mod ws;

pub use connection::{ConnectionHandle, ConnectionRegistry};
pub use messages::{AuthFailureCode, ErrorCode, InboundEvent, OutboundEvent};
