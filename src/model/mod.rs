//! Model Module
//!
//! Typed projections of the daemon's record groups.
//!
//! ## Types
//! - `Status`: flat snapshot of the `status` reply
//! - `Song`: one library entry, identified by its URI
//! - `QueueItem`: a song at a queue position with its queue id
//! - `Snapshot`: status + queue captured by one refresh
//!
//! These types hold no reference to the connection that produced them.

mod song;
mod status;

pub use song::{QueueItem, Song, MISSING_FIELD};
pub use status::{PlayState, Status};

/// Status and queue captured together by one refresh
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub status: Status,
    pub queue: Vec<QueueItem>,
}

impl Snapshot {
    /// Queue entry at the status' current song index, if any
    pub fn current_song(&self) -> Option<&Song> {
        let index = self.status.song? as usize;
        self.queue.get(index).map(|item| &item.song)
    }
}
