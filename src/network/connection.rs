//! Connection
//!
//! One TCP session to the daemon.
//!
//! ## Concurrency
//! - `stream`: short-held lock around the socket handle; never held across I/O
//! - `gate`: held for a whole request/response cycle, so cycles never overlap
//!   on the wire
//! - `disconnect` does not take the gate: it shuts the socket down, which
//!   wakes any in-flight read and fails that cycle
//!
//! ## Failed cycles
//! A cycle that fails mid-way (write error, read error or timeout, peer
//! close) leaves an unknown part of its reply on the wire. The session is
//! dropped so a later request can never read that leftover as its own reply;
//! `connect` must be called again.

use std::io::{Read, Write};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::sync::Arc;
use std::time::Duration;

use bytes::{Bytes, BytesMut};
use parking_lot::Mutex;

use super::gate::Gate;
use super::Transport;
use crate::config::ClientConfig;
use crate::error::{MpdError, Result};
use crate::protocol::{TerminatorScanner, GREETING_PREFIX};

/// Longest greeting line accepted before giving up
const MAX_GREETING_LEN: usize = 1024;

/// A client connection to MPD
pub struct Connection {
    /// Endpoint, timeouts and read chunk size
    config: ClientConfig,

    /// Open socket (None when disconnected)
    stream: Mutex<Option<Arc<TcpStream>>>,

    /// Version announced in the greeting of the current session
    server_version: Mutex<Option<String>>,

    /// Admits one request/response cycle at a time
    gate: Gate,
}

impl Connection {
    /// Create a disconnected connection
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            stream: Mutex::new(None),
            server_version: Mutex::new(None),
            gate: Gate::new(1),
        }
    }

    /// Create a disconnected connection to `host:port` with default timeouts
    pub fn with_address(host: impl Into<String>, port: u16) -> Self {
        Self::new(ClientConfig::builder().host(host).port(port).build())
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Protocol version from the greeting (`OK MPD <version>`)
    pub fn server_version(&self) -> Option<String> {
        self.server_version.lock().clone()
    }

    /// Open the socket and validate the greeting
    ///
    /// An existing session is torn down first. On failure the connection is
    /// left disconnected and may be connected again.
    pub fn connect(&self) -> Result<()> {
        self.disconnect();

        let _permit = self.gate.acquire();
        let address = self.config.address();
        tracing::debug!("Connecting to MPD at {}", address);

        let stream = self.open_stream(&address)?;
        let version = match self.configure(&stream).and_then(|_| read_greeting(&stream)) {
            Ok(version) => version,
            Err(e) => {
                let _ = stream.shutdown(Shutdown::Both);
                tracing::warn!("MPD at {} rejected: {}", address, e);
                return Err(match e {
                    e @ MpdError::ConnectionFailed(_) => e,
                    other => MpdError::ConnectionFailed(other.to_string()),
                });
            }
        };

        tracing::debug!("Connected to MPD {} at {}", version, address);
        *self.server_version.lock() = Some(version);
        *self.stream.lock() = Some(Arc::new(stream));
        Ok(())
    }

    /// Shut down the socket; safe to call when already disconnected
    pub fn disconnect(&self) {
        let stream = self.stream.lock().take();
        if let Some(stream) = stream {
            // Wakes a cycle blocked in read on another thread
            let _ = stream.shutdown(Shutdown::Both);
            tracing::debug!("Disconnected from MPD at {}", self.config.address());
        }
        *self.server_version.lock() = None;
    }

    pub fn is_connected(&self) -> bool {
        self.stream.lock().is_some()
    }

    /// Write `payload` and read until the reply's terminator
    ///
    /// Holds the gate for the whole cycle; the permit is released on every
    /// return path.
    pub fn send_and_receive(&self, payload: &[u8]) -> Result<Bytes> {
        // Fail fast before queueing on the gate
        self.current_stream()?;

        let _permit = self.gate.acquire();
        let stream = self.current_stream()?;

        tracing::trace!(
            "MPD request: {:?}",
            String::from_utf8_lossy(payload).trim_end()
        );

        let mut writer: &TcpStream = &stream;
        if let Err(e) = writer.write_all(payload).and_then(|_| writer.flush()) {
            return Err(self.fail_cycle(&stream, MpdError::Io(e)));
        }

        let block = self.receive(&stream)?;
        tracing::trace!("MPD reply: {} bytes", block.len());
        Ok(block)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn current_stream(&self) -> Result<Arc<TcpStream>> {
        self.stream.lock().clone().ok_or(MpdError::NotConnected)
    }

    /// Drop the session a cycle failed on and return the error to report
    ///
    /// If `stream` was already replaced or torn down by `disconnect`, the
    /// cycle reports `NotConnected` instead.
    fn fail_cycle(&self, stream: &Arc<TcpStream>, error: MpdError) -> MpdError {
        let mut current = self.stream.lock();
        let is_current = current
            .as_ref()
            .map_or(false, |open| Arc::ptr_eq(open, stream));
        if !is_current {
            return MpdError::NotConnected;
        }

        current.take();
        drop(current);

        let _ = stream.shutdown(Shutdown::Both);
        *self.server_version.lock() = None;
        tracing::warn!(
            "Dropping MPD session at {} after failed cycle: {}",
            self.config.address(),
            error
        );
        error
    }

    fn open_stream(&self, address: &str) -> Result<TcpStream> {
        let addrs = address
            .to_socket_addrs()
            .map_err(|e| MpdError::ConnectionFailed(format!("{}: {}", address, e)))?;

        let mut last_error = None;
        for addr in addrs {
            let attempt = if self.config.connect_timeout_ms > 0 {
                TcpStream::connect_timeout(
                    &addr,
                    Duration::from_millis(self.config.connect_timeout_ms),
                )
            } else {
                TcpStream::connect(addr)
            };

            match attempt {
                Ok(stream) => return Ok(stream),
                Err(e) => {
                    tracing::debug!("Connect to {} failed: {}", addr, e);
                    last_error = Some(e);
                }
            }
        }

        Err(MpdError::ConnectionFailed(match last_error {
            Some(e) => format!("{}: {}", address, e),
            None => format!("{}: no addresses resolved", address),
        }))
    }

    /// Disable Nagle and apply timeouts (0 = none)
    fn configure(&self, stream: &TcpStream) -> Result<()> {
        stream.set_nodelay(true)?;

        let timeout = |ms: u64| (ms > 0).then(|| Duration::from_millis(ms));
        stream.set_read_timeout(timeout(self.config.read_timeout_ms))?;
        stream.set_write_timeout(timeout(self.config.write_timeout_ms))?;

        Ok(())
    }

    /// Chunked reads until the terminator scanner sees a complete reply
    fn receive(&self, stream: &Arc<TcpStream>) -> Result<Bytes> {
        let mut buffer = BytesMut::with_capacity(self.config.read_chunk_size);
        let mut chunk = vec![0u8; self.config.read_chunk_size];
        let mut scanner = TerminatorScanner::new();
        let mut reader: &TcpStream = stream;

        loop {
            let n = match reader.read(&mut chunk) {
                Ok(n) => n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    tracing::debug!("Read failed with {} reply bytes buffered", buffer.len());
                    return Err(self.fail_cycle(stream, MpdError::Io(e)));
                }
            };

            if n == 0 {
                return Err(self.fail_cycle(stream, MpdError::ReceiveFailed));
            }

            buffer.extend_from_slice(&chunk[..n]);

            if let Some(terminator) = scanner.scan(&buffer) {
                if terminator.end() < buffer.len() {
                    tracing::warn!(
                        "{} unexpected bytes after MPD terminator",
                        buffer.len() - terminator.end()
                    );
                }
                return Ok(buffer.freeze());
            }
        }
    }
}

/// Read the greeting line and return the announced version
fn read_greeting(stream: &TcpStream) -> Result<String> {
    let mut reader: &TcpStream = stream;
    let mut greeting = Vec::with_capacity(64);
    let mut chunk = [0u8; 128];

    while !greeting.contains(&b'\n') {
        let n = reader
            .read(&mut chunk)
            .map_err(|e| MpdError::ConnectionFailed(format!("reading greeting: {}", e)))?;
        if n == 0 {
            return Err(MpdError::ConnectionFailed(
                "connection closed before greeting".to_string(),
            ));
        }
        greeting.extend_from_slice(&chunk[..n]);
        if greeting.len() > MAX_GREETING_LEN {
            return Err(MpdError::ConnectionFailed("greeting too long".to_string()));
        }
    }

    let text = String::from_utf8_lossy(&greeting);
    let line = text.lines().next().unwrap_or_default().trim_end();

    match line.strip_prefix(GREETING_PREFIX) {
        Some(version) => Ok(version.trim().to_string()),
        None => Err(MpdError::ConnectionFailed(format!(
            "unexpected greeting: {:?}",
            line
        ))),
    }
}

impl Transport for Connection {
    fn connect(&self) -> Result<()> {
        Connection::connect(self)
    }

    fn disconnect(&self) {
        Connection::disconnect(self)
    }

    fn is_connected(&self) -> bool {
        Connection::is_connected(self)
    }

    fn send_and_receive(&self, payload: &[u8]) -> Result<Bytes> {
        Connection::send_and_receive(self, payload)
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.disconnect();
    }
}
