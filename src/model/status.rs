//! Player status

/// Playback state reported by the daemon
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PlayState {
    #[default]
    Unknown,
    Stop,
    Play,
    Pause,
}

impl PlayState {
    /// Map the wire value (`play`, `pause`, `stop`); anything else is Unknown
    pub fn from_wire(value: &str) -> Self {
        match value {
            "stop" => PlayState::Stop,
            "play" => PlayState::Play,
            "pause" => PlayState::Pause,
            _ => PlayState::Unknown,
        }
    }
}

/// Snapshot of the `status` reply
///
/// Each field defaults independently when the key is absent or unparsable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Status {
    /// Mixer volume, 0 when unknown (the daemon reports -1 without a mixer)
    pub volume: i32,
    pub repeat: bool,
    pub random: bool,
    pub single: bool,
    pub consume: bool,

    /// Crossfade in seconds
    pub crossfade: u32,
    pub state: PlayState,

    /// Queue version, bumped on every queue change
    pub playlist_version: u32,
    pub playlist_length: u32,

    /// Queue position of the current song
    pub song: Option<u32>,

    /// Queue id of the current song
    pub song_id: Option<u32>,

    /// Seconds into the current song
    pub elapsed: f64,

    /// Length of the current song in seconds
    pub duration: f64,
}
