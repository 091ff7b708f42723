//! Transport abstraction
//!
//! The byte-level surface the protocol layers run over. `Connection` is the
//! TCP implementation; tests drive the upper layers with scripted doubles.

use std::sync::Arc;

use bytes::Bytes;

use crate::error::Result;

/// One request/response session with the daemon
pub trait Transport: Send + Sync {
    /// Open the session and validate the daemon's greeting
    fn connect(&self) -> Result<()>;

    /// Tear down the session (no-op when already disconnected)
    fn disconnect(&self);

    /// Whether a session is currently open
    fn is_connected(&self) -> bool;

    /// Write one request and return its whole terminated reply
    fn send_and_receive(&self, payload: &[u8]) -> Result<Bytes>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn connect(&self) -> Result<()> {
        (**self).connect()
    }

    fn disconnect(&self) {
        (**self).disconnect()
    }

    fn is_connected(&self) -> bool {
        (**self).is_connected()
    }

    fn send_and_receive(&self, payload: &[u8]) -> Result<Bytes> {
        (**self).send_and_receive(payload)
    }
}
