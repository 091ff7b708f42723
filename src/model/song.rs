//! Song and queue entries

/// Placeholder for metadata the daemon did not report
pub const MISSING_FIELD: &str = "–";

/// A song from the library or the queue
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Song {
    pub artist: String,
    pub album: String,
    pub title: String,

    /// Path relative to the music directory (stable identity)
    pub uri: String,
}

impl Song {
    pub fn new(
        artist: impl Into<String>,
        album: impl Into<String>,
        title: impl Into<String>,
        uri: impl Into<String>,
    ) -> Self {
        Self {
            artist: artist.into(),
            album: album.into(),
            title: title.into(),
            uri: uri.into(),
        }
    }

    /// Identity key
    pub fn id(&self) -> &str {
        &self.uri
    }
}

/// A song in the playback queue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueItem {
    /// Queue id, stable while the song stays queued
    pub id: u32,

    /// Position in the queue
    pub pos: u32,

    pub song: Song,
}
