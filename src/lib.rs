//! # mpdlink
//!
//! A client for the Music Player Daemon (MPD) control protocol with:
//! - Typed commands rendered to the daemon's line grammar
//! - Terminator-aware framing over a plain TCP byte stream
//! - A FIFO gate serializing concurrent callers onto one connection
//! - Chunked binary transfer for album art
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       MpdClient                              │
//! │        (status / queue / library / playback control)         │
//! └──────────────┬───────────────────────────────┬──────────────┘
//!                │                               │
//!                ▼                               ▼
//!   ┌─────────────────────────┐      ┌─────────────────────────┐
//!   │        Protocol         │      │      BinaryFetcher      │
//!   │ (Command → wire text,   │      │ (albumart offset loop)  │
//!   │  block → records)       │      └────────────┬────────────┘
//!   └────────────┬────────────┘                   │
//!                │                                │
//!                ▼                                ▼
//!   ┌─────────────────────────────────────────────────────────┐
//!   │                  Connection (Transport)                  │
//!   │          Gate (one cycle at a time) + TcpStream          │
//!   └─────────────────────────────────────────────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod network;
pub mod protocol;
pub mod model;
pub mod binary;
pub mod events;
pub mod client;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{MpdError, Result};
pub use config::ClientConfig;
pub use client::{ConnectionStatus, MpdClient};
pub use events::ClientEvent;
pub use model::{PlayState, QueueItem, Snapshot, Song, Status};
pub use network::{Connection, Transport};
pub use protocol::Command;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of mpdlink
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
