//! Command definitions
//!
//! Represents commands sent to the daemon and their exact wire text.

use std::fmt;

/// A protocol command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Batch of commands executed by the daemon as one atomic unit
    CommandList(Vec<Command>),

    /// Current player status
    Status,

    /// Full playback queue with song metadata
    PlaylistInfo,

    /// Start playback, optionally at a queue position
    Play { position: Option<u32> },

    /// Toggle pause
    Pause,

    /// Stop playback
    Stop,

    /// Next song in the queue
    Next,

    /// Previous song in the queue
    Previous,

    Repeat(bool),
    Random(bool),
    Single(bool),
    Consume(bool),

    /// Crossfade in whole seconds
    Crossfade(u32),

    /// Set mixer volume (0-100)
    SetVolume(i32),

    /// Seek within the current song (seconds)
    SeekCurrent(f64),

    /// Read one chunk of the cover file for `uri` starting at `offset`
    AlbumArt { uri: String, offset: usize },

    /// Search the database with a filter expression
    Search { filter: String },

    /// Append (or insert at `position`) a song to the queue
    AddToQueue { uri: String, position: Option<u32> },

    /// Remove a queue position, or the range `start..end`
    Delete { start: u32, end: Option<u32> },

    /// Empty the queue
    Clear,

    /// No-op round trip
    Ping,
}

/// Filter matching every song in the database
pub const ALL_SONGS_FILTER: &str = "(base '')";

impl Command {
    /// Protocol name of the command
    pub fn name(&self) -> &'static str {
        match self {
            Command::CommandList(_) => "command_list",
            Command::Status => "status",
            Command::PlaylistInfo => "playlistinfo",
            Command::Play { .. } => "play",
            Command::Pause => "pause",
            Command::Stop => "stop",
            Command::Next => "next",
            Command::Previous => "previous",
            Command::Repeat(_) => "repeat",
            Command::Random(_) => "random",
            Command::Single(_) => "single",
            Command::Consume(_) => "consume",
            Command::Crossfade(_) => "crossfade",
            Command::SetVolume(_) => "setvol",
            Command::SeekCurrent(_) => "seekcur",
            Command::AlbumArt { .. } => "albumart",
            Command::Search { .. } => "search",
            Command::AddToQueue { .. } => "add",
            Command::Delete { .. } => "delete",
            Command::Clear => "clear",
            Command::Ping => "ping",
        }
    }

    /// Search matching the whole library
    pub fn search_all() -> Self {
        Command::Search {
            filter: ALL_SONGS_FILTER.to_string(),
        }
    }

    /// String arguments passed verbatim inside quotes
    pub(crate) fn string_args(&self) -> Vec<&str> {
        match self {
            Command::AlbumArt { uri, .. } | Command::AddToQueue { uri, .. } => vec![uri.as_str()],
            Command::Search { filter } => vec![filter.as_str()],
            _ => Vec::new(),
        }
    }
}

fn flag(enabled: bool) -> u8 {
    if enabled {
        1
    } else {
        0
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::CommandList(commands) => {
                writeln!(f, "command_list_begin")?;
                for command in commands {
                    writeln!(f, "{}", command)?;
                }
                write!(f, "command_list_end")
            }
            Command::Play { position: Some(pos) } => write!(f, "play {}", pos),
            Command::Repeat(enabled) => write!(f, "repeat {}", flag(*enabled)),
            Command::Random(enabled) => write!(f, "random {}", flag(*enabled)),
            Command::Single(enabled) => write!(f, "single {}", flag(*enabled)),
            Command::Consume(enabled) => write!(f, "consume {}", flag(*enabled)),
            Command::Crossfade(seconds) => write!(f, "crossfade {}", seconds),
            Command::SetVolume(volume) => write!(f, "setvol \"{}\"", volume),
            // whole seconds, truncated toward zero
            Command::SeekCurrent(position) => write!(f, "seekcur \"{}\"", position.trunc() as i64),
            Command::AlbumArt { uri, offset } => write!(f, "albumart \"{}\" {}", uri, offset),
            Command::Search { filter } => write!(f, "search \"{}\"", filter),
            Command::AddToQueue { uri, position: None } => write!(f, "add \"{}\"", uri),
            Command::AddToQueue {
                uri,
                position: Some(pos),
            } => write!(f, "add \"{}\" {}", uri, pos),
            Command::Delete { start, end: None } => write!(f, "delete {}", start),
            Command::Delete {
                start,
                end: Some(end),
            } => write!(f, "delete {} {}", start, end),
            Command::Play { position: None }
            | Command::Status
            | Command::PlaylistInfo
            | Command::Pause
            | Command::Stop
            | Command::Next
            | Command::Previous
            | Command::Clear
            | Command::Ping => f.write_str(self.name()),
        }
    }
}
