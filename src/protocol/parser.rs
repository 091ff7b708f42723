//! Response parser
//!
//! Turns a terminated reply into lines, records and typed results.
//!
//! ## Entity boundaries
//! The daemon sends multi-entity replies (library search, queue listing) as a
//! flat run of `Key: Value` lines with no delimiter between entities. A new
//! entity starts whenever a `file` key arrives while the working group is
//! non-empty; the last group is closed at the end of the reply.

use std::collections::HashMap;
use std::str::FromStr;

use crate::error::{MpdError, Result};
use crate::model::{PlayState, QueueItem, Song, Status, MISSING_FIELD};

/// Separator between key and value in a record line
pub const RECORD_SEPARATOR: &str = ": ";

/// Key that opens a new song group
pub const GROUP_KEY: &str = "file";

/// One record group, keyed by record name (later duplicates win)
pub type RecordGroup<'a> = HashMap<&'a str, &'a str>;

// =============================================================================
// Lines and Records
// =============================================================================

/// Interpret a reply as UTF-8 text
pub fn response_text(block: &[u8]) -> Result<&str> {
    std::str::from_utf8(block)
        .map_err(|e| MpdError::ResponseError(format!("reply is not valid UTF-8: {}", e)))
}

/// Split reply text into lines, ignoring leading/trailing whitespace
pub fn split_lines(text: &str) -> Vec<&str> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    trimmed.split('\n').collect()
}

/// Split a line on the first `": "`; structural lines yield None
pub fn parse_record(line: &str) -> Option<(&str, &str)> {
    line.split_once(RECORD_SEPARATOR)
}

/// All records of a reply, in order
pub fn parse_records<'a>(lines: &[&'a str]) -> Vec<(&'a str, &'a str)> {
    lines.iter().filter_map(|line| parse_record(*line)).collect()
}

/// Reconstruct record groups using the `file` boundary rule
pub fn group_records<'a>(lines: &[&'a str]) -> Vec<RecordGroup<'a>> {
    let mut groups = Vec::new();
    let mut working = RecordGroup::new();

    for (key, value) in parse_records(lines) {
        if key == GROUP_KEY && !working.is_empty() {
            groups.push(std::mem::take(&mut working));
        }
        working.insert(key, value);
    }

    if !working.is_empty() {
        groups.push(working);
    }

    groups
}

// =============================================================================
// Typed Results
// =============================================================================

fn field<T: FromStr>(map: &RecordGroup<'_>, key: &str) -> Option<T> {
    map.get(key).and_then(|value| value.trim().parse().ok())
}

fn flag(map: &RecordGroup<'_>, key: &str) -> bool {
    field::<i64>(map, key) == Some(1)
}

fn text_or_placeholder(map: &RecordGroup<'_>, key: &str) -> String {
    map.get(key).copied().unwrap_or(MISSING_FIELD).to_string()
}

fn song_from_group(group: &RecordGroup<'_>) -> Song {
    Song {
        artist: text_or_placeholder(group, "Artist"),
        album: text_or_placeholder(group, "Album"),
        title: text_or_placeholder(group, "Title"),
        uri: text_or_placeholder(group, GROUP_KEY),
    }
}

/// Parse a `status` reply
pub fn parse_status(block: &[u8]) -> Result<Status> {
    let lines = split_lines(response_text(block)?);
    let map: RecordGroup<'_> = parse_records(&lines).into_iter().collect();

    let state = map
        .get("state")
        .or_else(|| map.get("status"))
        .map(|value| PlayState::from_wire(value.trim()))
        .unwrap_or_default();

    let duration = field::<f64>(&map, "duration")
        .or_else(|| {
            // legacy `time: <elapsed>:<total>`
            map.get("time")
                .and_then(|time| time.split_once(':'))
                .and_then(|(_, total)| total.trim().parse().ok())
        })
        .unwrap_or(0.0);

    Ok(Status {
        volume: field::<i32>(&map, "volume").filter(|v| *v >= 0).unwrap_or(0),
        repeat: flag(&map, "repeat"),
        random: flag(&map, "random"),
        single: flag(&map, "single"),
        consume: flag(&map, "consume"),
        crossfade: field(&map, "xfade").unwrap_or(0),
        state,
        playlist_version: field(&map, "playlist").unwrap_or(0),
        playlist_length: field(&map, "playlistlength").unwrap_or(0),
        song: field(&map, "song"),
        song_id: field(&map, "songid"),
        elapsed: field(&map, "elapsed").unwrap_or(0.0),
        duration,
    })
}

/// Parse a library listing (`search`) into songs
pub fn parse_library(block: &[u8]) -> Result<Vec<Song>> {
    let lines = split_lines(response_text(block)?);
    Ok(group_records(&lines).iter().map(song_from_group).collect())
}

/// Parse a `playlistinfo` reply into queue items
///
/// Groups without a numeric `Id` and `Pos` are dropped.
pub fn parse_queue(block: &[u8]) -> Result<Vec<QueueItem>> {
    let lines = split_lines(response_text(block)?);
    let groups = group_records(&lines);
    let total = groups.len();

    let items: Vec<QueueItem> = groups
        .iter()
        .filter_map(|group| {
            Some(QueueItem {
                id: field(group, "Id")?,
                pos: field(group, "Pos")?,
                song: song_from_group(group),
            })
        })
        .collect();

    if items.len() != total {
        tracing::warn!(
            "Dropped {} queue entries without numeric Id/Pos",
            total - items.len()
        );
    }

    Ok(items)
}
