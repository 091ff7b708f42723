//! Protocol Module
//!
//! Defines the MPD wire protocol as seen from the client.
//!
//! ## Protocol Format (text, `\n` terminated)
//!
//! ### Greeting
//! ```text
//! OK MPD <version>
//! ```
//!
//! ### Request
//! ```text
//! <command> [arg ...]
//! ```
//!
//! ### Response
//! ```text
//! Key: Value        (zero or more records)
//! OK                (success)
//! ACK [code@index] {command} message   (failure)
//! ```
//!
//! ### Binary Response
//! ```text
//! size: <total>
//! binary: <n>
//! <n raw bytes>
//! OK
//! ```

mod command;
mod codec;
pub mod parser;
pub mod response;

pub use command::{Command, ALL_SONGS_FILTER};
pub use codec::encode_command;
pub use parser::{group_records, parse_library, parse_queue, parse_record, parse_status, split_lines};
pub use response::{ensure_ok, find_terminator, parse_ack_line, Terminator, TerminatorScanner};

/// Greeting prefix sent by the daemon on connect
pub const GREETING_PREFIX: &str = "OK MPD";
