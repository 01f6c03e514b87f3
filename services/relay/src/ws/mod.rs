//! WebSocket Ingress
//!
//! - `protocol`: the JSON event envelopes exchanged with socket clients.
//! - `session`: the per-connection loop relaying client events and broadcasts.

pub mod protocol;
pub mod session;

pub use session::ws_handler;
