//! Client Module
//!
//! The API consumed by higher layers (UI, daemons, the CLI).
//!
//! ## Responsibilities
//! - Track connection status
//! - Render commands, run them over the transport, surface `ACK`s as errors
//! - Project replies into `Status`, queue and library types
//! - Emit `ClientEvent`s after connect, disconnect and refresh
//!
//! Nothing here retries or schedules work: callers decide when to refresh
//! and what to do with failures.

use bytes::Bytes;
use crossbeam::channel::Receiver;
use parking_lot::RwLock;

use crate::binary::BinaryFetcher;
use crate::config::ClientConfig;
use crate::error::Result;
use crate::events::{ClientEvent, EventBus};
use crate::model::{QueueItem, Snapshot, Song, Status};
use crate::network::{Connection, Transport};
use crate::protocol::{encode_command, ensure_ok, parse_library, parse_queue, parse_status, Command};

/// Lifecycle of the client's session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConnectionStatus {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

/// MPD client over a single transport
///
/// All methods take `&self`; share it between threads with `Arc`.
pub struct MpdClient<T: Transport = Connection> {
    transport: T,
    status: RwLock<ConnectionStatus>,

    /// Result of the last `fetch_library`
    library: RwLock<Vec<Song>>,

    events: EventBus,
}

impl MpdClient<Connection> {
    /// Create a disconnected client for the configured daemon
    pub fn new(config: ClientConfig) -> Self {
        Self::with_transport(Connection::new(config))
    }

    /// Version announced by the daemon, while connected
    pub fn server_version(&self) -> Option<String> {
        self.transport.server_version()
    }
}

impl Default for MpdClient<Connection> {
    fn default() -> Self {
        Self::new(ClientConfig::default())
    }
}

impl<T: Transport> MpdClient<T> {
    pub fn with_transport(transport: T) -> Self {
        Self {
            transport,
            status: RwLock::new(ConnectionStatus::Disconnected),
            library: RwLock::new(Vec::new()),
            events: EventBus::new(),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn connection_status(&self) -> ConnectionStatus {
        *self.status.read()
    }

    /// Receive `ClientEvent`s from now on
    pub fn subscribe(&self) -> Receiver<ClientEvent> {
        self.events.subscribe()
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Connect to the daemon; no-op when already connected
    pub fn connect(&self) -> Result<()> {
        if self.connection_status() == ConnectionStatus::Connected && self.transport.is_connected() {
            tracing::debug!("connect() called while already connected");
            return Ok(());
        }

        *self.status.write() = ConnectionStatus::Connecting;

        match self.transport.connect() {
            Ok(()) => {
                *self.status.write() = ConnectionStatus::Connected;
                self.events.emit(ClientEvent::Connected);
                Ok(())
            }
            Err(e) => {
                *self.status.write() = ConnectionStatus::Disconnected;
                tracing::warn!("Failed to connect to MPD: {}", e);
                Err(e)
            }
        }
    }

    /// Close the session; `Disconnected` is emitted only if one was open
    pub fn disconnect(&self) {
        self.transport.disconnect();

        let previous = std::mem::replace(
            &mut *self.status.write(),
            ConnectionStatus::Disconnected,
        );
        if previous != ConnectionStatus::Disconnected {
            self.events.emit(ClientEvent::Disconnected);
        }
    }

    // =========================================================================
    // Requests
    // =========================================================================

    /// Run one command and return its successful reply
    pub fn execute(&self, command: &Command) -> Result<Bytes> {
        let request = encode_command(command)?;

        let result = self
            .transport
            .send_and_receive(&request)
            .and_then(|block| ensure_ok(&block).map(|_| block));

        self.track_session(result)
    }

    fn fire(&self, command: Command) -> Result<()> {
        self.execute(&command).map(|_| ())
    }

    /// Notice a session the transport dropped while serving `result`
    fn track_session<R>(&self, result: Result<R>) -> Result<R> {
        if result.is_err() && !self.transport.is_connected() {
            self.note_lost_session();
        }
        result
    }

    /// Session vanished underneath us (e.g. disconnected mid-cycle)
    fn note_lost_session(&self) {
        let mut status = self.status.write();
        if *status == ConnectionStatus::Connected {
            *status = ConnectionStatus::Disconnected;
            drop(status);
            self.events.emit(ClientEvent::Disconnected);
        }
    }

    pub fn get_status(&self) -> Result<Status> {
        parse_status(&self.execute(&Command::Status)?)
    }

    pub fn get_queue(&self) -> Result<Vec<QueueItem>> {
        parse_queue(&self.execute(&Command::PlaylistInfo)?)
    }

    /// Every song in the database; also cached for `library()`
    pub fn fetch_library(&self) -> Result<Vec<Song>> {
        let songs = parse_library(&self.execute(&Command::search_all())?)?;
        tracing::debug!("Fetched {} songs from the library", songs.len());
        *self.library.write() = songs.clone();
        Ok(songs)
    }

    /// Library from the last successful `fetch_library`
    pub fn library(&self) -> Vec<Song> {
        self.library.read().clone()
    }

    /// Fetch status then queue, and publish them as `ClientEvent::Refreshed`
    pub fn refresh(&self) -> Result<Snapshot> {
        let status = self.get_status()?;
        let queue = self.get_queue()?;
        let snapshot = Snapshot { status, queue };

        self.events.emit(ClientEvent::Refreshed(snapshot.clone()));
        Ok(snapshot)
    }

    /// Cover image bytes for `path`
    pub fn fetch_album_art(&self, path: &str) -> Result<Bytes> {
        self.track_session(BinaryFetcher::new(&self.transport).fetch_album_art(path))
    }

    // =========================================================================
    // Playback
    // =========================================================================

    /// Start playback, at `position` when given
    pub fn play(&self, position: Option<u32>) -> Result<()> {
        self.fire(Command::Play { position })
    }

    pub fn pause(&self) -> Result<()> {
        self.fire(Command::Pause)
    }

    pub fn stop(&self) -> Result<()> {
        self.fire(Command::Stop)
    }

    pub fn next(&self) -> Result<()> {
        self.fire(Command::Next)
    }

    pub fn previous(&self) -> Result<()> {
        self.fire(Command::Previous)
    }

    pub fn set_volume(&self, volume: i32) -> Result<()> {
        self.fire(Command::SetVolume(volume))
    }

    /// Seek within the current song (whole seconds are sent)
    pub fn seek(&self, seconds: f64) -> Result<()> {
        self.fire(Command::SeekCurrent(seconds))
    }

    pub fn random(&self, enabled: bool) -> Result<()> {
        self.fire(Command::Random(enabled))
    }

    pub fn repeat(&self, enabled: bool) -> Result<()> {
        self.fire(Command::Repeat(enabled))
    }

    pub fn single(&self, enabled: bool) -> Result<()> {
        self.fire(Command::Single(enabled))
    }

    pub fn consume(&self, enabled: bool) -> Result<()> {
        self.fire(Command::Consume(enabled))
    }

    pub fn crossfade(&self, seconds: u32) -> Result<()> {
        self.fire(Command::Crossfade(seconds))
    }

    pub fn ping(&self) -> Result<()> {
        self.fire(Command::Ping)
    }

    // =========================================================================
    // Queue
    // =========================================================================

    pub fn add_to_queue(&self, uri: &str, position: Option<u32>) -> Result<()> {
        self.fire(Command::AddToQueue {
            uri: uri.to_string(),
            position,
        })
    }

    /// Append several songs in one atomic command list
    pub fn add_many<S: AsRef<str>>(&self, uris: &[S]) -> Result<()> {
        if uris.is_empty() {
            return Ok(());
        }

        let adds = uris
            .iter()
            .map(|uri| Command::AddToQueue {
                uri: uri.as_ref().to_string(),
                position: None,
            })
            .collect();
        self.command_list(adds)
    }

    /// Remove position `start`, or the range `start..end`
    pub fn remove_from_queue(&self, start: u32, end: Option<u32>) -> Result<()> {
        self.fire(Command::Delete { start, end })
    }

    pub fn clear(&self) -> Result<()> {
        self.fire(Command::Clear)
    }

    /// Execute `commands` as one atomic batch
    pub fn command_list(&self, commands: Vec<Command>) -> Result<()> {
        self.fire(Command::CommandList(commands))
    }
}
