//! Mock MPD daemon for integration testing
//!
//! Speaks just enough of the wire protocol to exercise the client over a
//! real TCP socket: greeting, line requests, command lists, canned replies.
//! Each request is checked for pipelining: if the client sends more bytes
//! before the previous reply was written, the daemon records an overlap.

#![allow(dead_code)]

use std::io::{BufRead, BufReader, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use mpdlink::ClientConfig;
use parking_lot::Mutex;

pub const GREETING: &str = "OK MPD 0.23.5\n";

/// What the daemon does with one request
pub enum Reply {
    /// Write these bytes
    Send(Vec<u8>),

    /// Never answer
    Silence,

    /// Drop the connection without answering
    Close,
}

impl Reply {
    pub fn ok() -> Self {
        Reply::text("OK\n")
    }

    pub fn text(text: &str) -> Self {
        Reply::Send(text.as_bytes().to_vec())
    }
}

type Handler = Arc<dyn Fn(&str) -> Reply + Send + Sync>;

/// Mock daemon configuration
pub struct MockDaemonBuilder {
    greeting: String,
    delay: Duration,
    write_chunk: Option<usize>,
}

impl MockDaemonBuilder {
    /// Replace the greeting line
    pub fn greeting(mut self, greeting: &str) -> Self {
        self.greeting = greeting.to_string();
        self
    }

    /// Sleep between reading a request and replying
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Write replies in pieces of `size` bytes
    pub fn write_chunk(mut self, size: usize) -> Self {
        self.write_chunk = Some(size);
        self
    }

    pub fn start<F>(self, handler: F) -> MockDaemon
    where
        F: Fn(&str) -> Reply + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let shared = Arc::new(Shared {
            greeting: self.greeting,
            delay: self.delay,
            write_chunk: self.write_chunk,
            handler: Arc::new(handler),
            requests: Mutex::new(Vec::new()),
            overlap: AtomicBool::new(false),
            connections: AtomicUsize::new(0),
        });

        let accept_state = Arc::clone(&shared);
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { break };
                accept_state.connections.fetch_add(1, Ordering::SeqCst);
                let state = Arc::clone(&accept_state);
                thread::spawn(move || serve(stream, state));
            }
        });

        MockDaemon { addr, shared }
    }
}

struct Shared {
    greeting: String,
    delay: Duration,
    write_chunk: Option<usize>,
    handler: Handler,
    requests: Mutex<Vec<String>>,
    overlap: AtomicBool,
    connections: AtomicUsize,
}

/// Handle to a running mock daemon
pub struct MockDaemon {
    addr: SocketAddr,
    shared: Arc<Shared>,
}

impl MockDaemon {
    pub fn builder() -> MockDaemonBuilder {
        MockDaemonBuilder {
            greeting: GREETING.to_string(),
            delay: Duration::ZERO,
            write_chunk: None,
        }
    }

    /// Start with default settings
    pub fn start<F>(handler: F) -> MockDaemon
    where
        F: Fn(&str) -> Reply + Send + Sync + 'static,
    {
        Self::builder().start(handler)
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Client config pointing at this daemon with short timeouts
    pub fn config(&self) -> ClientConfig {
        ClientConfig::builder()
            .host("127.0.0.1")
            .port(self.port())
            .connect_timeout_ms(2000)
            .read_timeout_ms(2000)
            .write_timeout_ms(2000)
            .build()
    }

    /// Requests received so far, in order
    pub fn requests(&self) -> Vec<String> {
        self.shared.requests.lock().clone()
    }

    /// Whether a request ever arrived before the previous reply was sent
    pub fn overlapped(&self) -> bool {
        self.shared.overlap.load(Ordering::SeqCst)
    }

    pub fn connections(&self) -> usize {
        self.shared.connections.load(Ordering::SeqCst)
    }
}

fn serve(stream: TcpStream, state: Arc<Shared>) {
    let mut writer = stream.try_clone().unwrap();
    let mut reader = BufReader::new(stream);

    if writer.write_all(state.greeting.as_bytes()).is_err() {
        return;
    }

    while let Some(request) = read_request(&mut reader) {
        state.requests.lock().push(request.clone());

        if !state.delay.is_zero() {
            thread::sleep(state.delay);
        }

        if has_pending_bytes(&reader) {
            state.overlap.store(true, Ordering::SeqCst);
        }

        match (state.handler)(&request) {
            Reply::Send(bytes) => {
                if write_reply(&mut writer, &bytes, state.write_chunk).is_err() {
                    return;
                }
            }
            Reply::Silence => {}
            Reply::Close => return,
        }
    }
}

/// One request: a single line, or a whole command list block
fn read_request(reader: &mut BufReader<TcpStream>) -> Option<String> {
    let first = read_line(reader)?;
    if first != "command_list_begin" && first != "command_list_ok_begin" {
        return Some(first);
    }

    let mut lines = vec![first];
    loop {
        let line = read_line(reader)?;
        let done = line == "command_list_end";
        lines.push(line);
        if done {
            return Some(lines.join("\n"));
        }
    }
}

fn read_line(reader: &mut BufReader<TcpStream>) -> Option<String> {
    let mut line = String::new();
    match reader.read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line.trim_end_matches('\n').to_string()),
    }
}

fn has_pending_bytes(reader: &BufReader<TcpStream>) -> bool {
    if !reader.buffer().is_empty() {
        return true;
    }

    let stream = reader.get_ref();
    if stream.set_nonblocking(true).is_err() {
        return false;
    }
    let mut probe = [0u8; 1];
    let pending = matches!(stream.peek(&mut probe), Ok(n) if n > 0);
    let _ = stream.set_nonblocking(false);
    pending
}

fn write_reply(writer: &mut TcpStream, bytes: &[u8], chunk: Option<usize>) -> std::io::Result<()> {
    match chunk {
        Some(size) => {
            for piece in bytes.chunks(size.max(1)) {
                writer.write_all(piece)?;
                writer.flush()?;
                thread::sleep(Duration::from_millis(1));
            }
            Ok(())
        }
        None => {
            writer.write_all(bytes)?;
            writer.flush()
        }
    }
}

// =============================================================================
// Canned Daemon
// =============================================================================

/// Cover image served by `fake_mpd`; contains bytes that look like a terminator
pub const COVER: &[u8] = b"\x89PNG\nOK\n\x00A";

/// Largest albumart chunk served by `fake_mpd`
pub const COVER_CHUNK: usize = 6;

pub const STATUS_REPLY: &str = "volume: 65\n\
repeat: 1\n\
random: 0\n\
single: 0\n\
consume: 1\n\
playlist: 7\n\
playlistlength: 2\n\
xfade: 3\n\
state: play\n\
song: 1\n\
songid: 11\n\
elapsed: 42.500\n\
duration: 180.250\n\
OK\n";

pub const QUEUE_REPLY: &str = "file: a/one.flac\n\
Artist: Alpha\n\
Album: First\n\
Title: One\n\
Pos: 0\n\
Id: 10\n\
file: b/two.flac\n\
Artist: Beta\n\
Album: Second\n\
Title: Two\n\
Pos: 1\n\
Id: 11\n\
OK\n";

pub const LIBRARY_REPLY: &str = "file: a/one.flac\n\
Artist: Alpha\n\
Album: First\n\
Title: One\n\
file: b/two.flac\n\
Artist: Beta\n\
Album: Second\n\
Title: Two\n\
file: c/three.flac\n\
Title: Three\n\
OK\n";

/// Build one albumart chunk reply
pub fn album_art_chunk(image: &[u8], offset: usize, max_chunk: usize) -> Vec<u8> {
    let start = offset.min(image.len());
    let end = (start + max_chunk).min(image.len());

    let mut reply = format!("size: {}\nbinary: {}\n", image.len(), end - start).into_bytes();
    reply.extend_from_slice(&image[start..end]);
    reply.extend_from_slice(b"\nOK\n");
    reply
}

/// A tiny daemon answering the commands the client issues
pub fn fake_mpd(request: &str) -> Reply {
    let name = request.split_whitespace().next().unwrap_or_default();
    match name {
        "status" => Reply::text(STATUS_REPLY),
        "playlistinfo" => Reply::text(QUEUE_REPLY),
        "search" => Reply::text(LIBRARY_REPLY),
        "albumart" if request.contains("missing") => {
            Reply::text("ACK [50@0] {albumart} No file exists\n")
        }
        "albumart" => {
            let offset = request
                .rsplit(' ')
                .next()
                .and_then(|o| o.parse().ok())
                .unwrap_or(0);
            Reply::Send(album_art_chunk(COVER, offset, COVER_CHUNK))
        }
        "play" if request == "play 99" => Reply::text("ACK [2@0] {play} Bad song index\n"),
        _ => Reply::ok(),
    }
}
