//! Binary Module
//!
//! Chunked binary transfers (album art).
//!
//! ## Exchange
//! ```text
//! → albumart "<uri>" <offset>
//! ← size: <total>
//! ← binary: <n>
//! ← <n raw bytes>
//! ← OK
//! ```
//! The client repeats the request with `offset += n` until `offset >= total`.

mod fetcher;

pub use fetcher::{parse_binary_chunk, BinaryChunk, BinaryFetchState, BinaryFetcher};
