//! Response framing
//!
//! Detects where a reply ends and decodes the daemon's `ACK` lines.
//!
//! Every reply ends with exactly one terminator line:
//! - `OK` on success
//! - `ACK [<code>@<index>] {<command>} <message>` on failure
//!
//! Binary replies carry a `binary: <n>` header followed by `n` opaque bytes,
//! which the scanner skips so payload bytes are never mistaken for a
//! terminator.

use crate::error::{AckError, MpdError, ProtocolError, Result};

const OK_LINE: &[u8] = b"OK";
const ACK_PREFIX: &[u8] = b"ACK [";
const BINARY_PREFIX: &[u8] = b"binary: ";

/// Terminator found at the end of a reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminator {
    /// `OK` line; `end` is the offset just past its newline
    Ok { end: usize },

    /// `ACK` line spanning `start..end` (newline included)
    Ack { start: usize, end: usize },
}

impl Terminator {
    /// Offset just past the terminator line
    pub fn end(&self) -> usize {
        match *self {
            Terminator::Ok { end } | Terminator::Ack { end, .. } => end,
        }
    }
}

/// Incremental terminator detection over a growing buffer
///
/// The cursor only moves past complete lines (and complete binary payloads),
/// so feeding the same buffer again after appending more bytes never rescans
/// what was already seen.
#[derive(Debug, Default)]
pub struct TerminatorScanner {
    cursor: usize,
    found: Option<Terminator>,
}

impl TerminatorScanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan `buf` (which must extend the previously scanned buffer)
    pub fn scan(&mut self, buf: &[u8]) -> Option<Terminator> {
        if self.found.is_some() {
            return self.found;
        }

        while self.cursor < buf.len() {
            let line_start = self.cursor;
            let newline = buf[line_start..].iter().position(|&b| b == b'\n')?;
            let line = &buf[line_start..line_start + newline];
            let line_end = line_start + newline + 1;

            if line == OK_LINE {
                self.found = Some(Terminator::Ok { end: line_end });
                return self.found;
            }

            if line.starts_with(ACK_PREFIX) {
                self.found = Some(Terminator::Ack {
                    start: line_start,
                    end: line_end,
                });
                return self.found;
            }

            if let Some(len) = binary_length(line) {
                // A length past the address space can never be satisfied
                let payload_end = line_end.checked_add(len)?;
                // Wait for the payload and the newline that follows it
                if buf.len() <= payload_end {
                    return None;
                }
                self.cursor = if buf[payload_end] == b'\n' {
                    payload_end + 1
                } else {
                    payload_end
                };
                continue;
            }

            self.cursor = line_end;
        }

        None
    }
}

/// Parse a `binary: <n>` header line
fn binary_length(line: &[u8]) -> Option<usize> {
    let digits = line.strip_prefix(BINARY_PREFIX)?;
    std::str::from_utf8(digits).ok()?.trim().parse().ok()
}

/// Locate the terminator of a complete reply
pub fn find_terminator(block: &[u8]) -> Option<Terminator> {
    TerminatorScanner::new().scan(block)
}

/// Fail with the daemon's ACK if the reply ended in one
pub fn ensure_ok(block: &[u8]) -> Result<()> {
    match find_terminator(block) {
        Some(Terminator::Ok { .. }) => Ok(()),
        Some(Terminator::Ack { start, end }) => {
            let line = String::from_utf8_lossy(&block[start..end]);
            Err(ProtocolError::Ack(parse_ack_line(line.trim_end())).into())
        }
        None => Err(MpdError::ResponseError(
            "reply is missing its OK/ACK terminator".to_string(),
        )),
    }
}

/// Decode an `ACK [<code>@<index>] {<command>} <message>` line
///
/// Parsing is lenient: fields that cannot be read are left at their
/// defaults and the remaining text becomes the message.
pub fn parse_ack_line(line: &str) -> AckError {
    let mut ack = AckError {
        code: 0,
        index: 0,
        command: String::new(),
        message: String::new(),
    };

    let Some(rest) = line.strip_prefix("ACK [") else {
        ack.message = line.to_string();
        return ack;
    };

    let Some((position, rest)) = rest.split_once(']') else {
        ack.message = rest.to_string();
        return ack;
    };

    if let Some((code, index)) = position.split_once('@') {
        ack.code = code.trim().parse().unwrap_or(0);
        ack.index = index.trim().parse().unwrap_or(0);
    }

    let rest = rest.trim_start();
    match rest
        .strip_prefix('{')
        .and_then(|r| r.split_once('}'))
    {
        Some((command, message)) => {
            ack.command = command.to_string();
            ack.message = message.trim().to_string();
        }
        None => ack.message = rest.to_string(),
    }

    ack
}
