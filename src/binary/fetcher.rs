//! Binary fetcher
//!
//! Drives the offset loop of a chunked transfer and parses each chunk frame.

use bytes::{Bytes, BytesMut};

use crate::error::{ProtocolError, Result};
use crate::network::Transport;
use crate::protocol::{encode_command, ensure_ok, find_terminator, Command, Terminator};

/// Marker that must follow the payload
const CHUNK_TRAILER: &[u8] = b"\nOK";

/// One parsed chunk frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryChunk {
    /// Declared size of the whole object
    pub size: usize,

    /// Payload of this chunk
    pub data: Bytes,
}

fn malformed(reason: impl Into<String>) -> ProtocolError {
    ProtocolError::MalformedBinary(reason.into())
}

/// Next `\n`-terminated line starting at `start`: (line, offset after newline)
fn next_line(block: &[u8], start: usize) -> Option<(&[u8], usize)> {
    let rest = block.get(start..)?;
    let newline = rest.iter().position(|&b| b == b'\n')?;
    Some((&rest[..newline], start + newline + 1))
}

/// Parse `<name>: <number>`
fn header_value(line: &[u8], name: &str) -> Result<usize> {
    let text = std::str::from_utf8(line)
        .map_err(|_| malformed(format!("{} header is not text", name)))?;

    let value = text
        .strip_prefix(name)
        .and_then(|rest| rest.strip_prefix(':'))
        .ok_or_else(|| malformed(format!("expected `{}:` header, got {:?}", name, text)))?;

    let parsed = value
        .trim()
        .parse()
        .map_err(|_| malformed(format!("non-numeric {} header: {:?}", name, value.trim())))?;
    Ok(parsed)
}

/// Parse one chunk reply: `size:` line, `binary:` line, payload, `\nOK`
///
/// An `ACK` reply is returned as the daemon's error.
pub fn parse_binary_chunk(block: &Bytes) -> Result<BinaryChunk> {
    if let Some(Terminator::Ack { .. }) = find_terminator(block) {
        ensure_ok(block)?;
    }

    let (size_line, after_size) =
        next_line(block, 0).ok_or_else(|| malformed("missing size header"))?;
    let size = header_value(size_line, "size")?;

    let (binary_line, payload_start) =
        next_line(block, after_size).ok_or_else(|| malformed("missing binary header"))?;
    let len = header_value(binary_line, "binary")?;

    let payload_end = payload_start
        .checked_add(len)
        .ok_or_else(|| malformed(format!("binary length {} out of range", len)))?;
    if block.len() < payload_end {
        return Err(malformed(format!(
            "truncated payload: expected {} bytes, got {}",
            len,
            block.len() - payload_start
        ))
        .into());
    }

    if !block[payload_end..].starts_with(CHUNK_TRAILER) {
        return Err(malformed("payload is not followed by OK").into());
    }

    Ok(BinaryChunk {
        size,
        data: block.slice(payload_start..payload_end),
    })
}

/// Accumulator for one chunked fetch
#[derive(Debug, Default)]
pub struct BinaryFetchState {
    /// Declared total size (latest reply wins)
    size: usize,

    /// Bytes received so far; also the next request offset
    offset: usize,

    buffer: BytesMut,
}

impl BinaryFetchState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// All declared bytes received
    pub fn is_done(&self) -> bool {
        self.offset >= self.size
    }

    /// Fold a chunk into the buffer and advance the offset
    pub fn absorb(&mut self, chunk: BinaryChunk) -> Result<()> {
        self.size = chunk.size;

        if chunk.data.is_empty() && self.offset < self.size {
            return Err(malformed(format!(
                "empty chunk at offset {} of {}",
                self.offset, self.size
            ))
            .into());
        }

        self.offset += chunk.data.len();
        self.buffer.extend_from_slice(&chunk.data);
        Ok(())
    }

    pub fn into_bytes(self) -> Bytes {
        self.buffer.freeze()
    }
}

/// Fetches album art over a transport, one request per chunk
pub struct BinaryFetcher<'a, T: Transport + ?Sized> {
    transport: &'a T,
}

impl<'a, T: Transport + ?Sized> BinaryFetcher<'a, T> {
    pub fn new(transport: &'a T) -> Self {
        Self { transport }
    }

    /// Fetch the cover for `uri`
    ///
    /// Requests offsets 0, n1, n1+n2, ... until the declared size is reached.
    /// Any failure discards the partial image.
    pub fn fetch_album_art(&self, uri: &str) -> Result<Bytes> {
        let mut state = BinaryFetchState::new();

        loop {
            let command = Command::AlbumArt {
                uri: uri.to_string(),
                offset: state.offset(),
            };
            let block = self.transport.send_and_receive(&encode_command(&command)?)?;
            state.absorb(parse_binary_chunk(&block)?)?;

            tracing::trace!(
                "albumart {}: {}/{} bytes",
                uri,
                state.offset(),
                state.size()
            );

            if state.is_done() {
                break;
            }
        }

        tracing::debug!("Fetched {} bytes of album art for {}", state.size(), uri);
        Ok(state.into_bytes())
    }
}
