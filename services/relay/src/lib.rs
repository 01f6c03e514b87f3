//! Chat Relay API Library Crate
//!
//! This library contains the HTTP and WebSocket surface of the chat relay:
//! configuration, shared application state, REST handlers, the socket event
//! protocol and routing. The `api` binary is a thin wrapper around it.

pub mod config;
pub mod handlers;
pub mod router;
pub mod state;
pub mod ws;
