//! Error types for mpdlink
//!
//! Provides a unified error type for all operations.

use std::fmt;

use thiserror::Error;

/// Result type alias using MpdError
pub type Result<T> = std::result::Result<T, MpdError>;

/// Unified error type for mpdlink operations
#[derive(Debug, Error)]
pub enum MpdError {
    // -------------------------------------------------------------------------
    // Connection Errors
    // -------------------------------------------------------------------------
    #[error("Not connected")]
    NotConnected,

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    // -------------------------------------------------------------------------
    // Request/Response Errors
    // -------------------------------------------------------------------------
    #[error("Request malformed: {0}")]
    RequestMalformed(String),

    #[error("Receive failed: read returned no data")]
    ReceiveFailed,

    #[error("Response error: {0}")]
    ResponseError(String),

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl MpdError {
    /// The daemon's ACK, if this error carries one
    pub fn ack(&self) -> Option<&AckError> {
        match self {
            MpdError::Protocol(ProtocolError::Ack(ack)) => Some(ack),
            _ => None,
        }
    }
}

/// Errors reported by the daemon or found in the shape of its replies
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("{0}")]
    Ack(AckError),

    #[error("malformed binary response: {0}")]
    MalformedBinary(String),
}

/// A decoded `ACK [<code>@<index>] {<command>} <message>` line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AckError {
    /// MPD error code (e.g. 50 = no such file)
    pub code: u32,

    /// Index of the failing command inside a command list (0 otherwise)
    pub index: u32,

    /// Name of the command that failed, may be empty
    pub command: String,

    /// Human readable message from the daemon
    pub message: String,
}

impl fmt::Display for AckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ACK [{}@{}] {{{}}} {}",
            self.code, self.index, self.command, self.message
        )
    }
}
