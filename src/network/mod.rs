//! Network Module
//!
//! TCP transport to the daemon.
//!
//! ## Architecture
//! - One socket per `Connection`, no pooling
//! - `Gate` serializes request/response cycles from concurrent callers
//! - `Transport` trait lets the protocol layers run over test doubles

mod connection;
mod gate;
mod transport;

pub use connection::Connection;
pub use gate::{Gate, GatePermit};
pub use transport::Transport;
