//! Incremental decoding of the chat wire stream.
//!
//! The server answers `POST /chat/stream` with a line-oriented chunked
//! body: one `data: <payload>` line per content increment, a literal
//! `data: [DONE]` sentinel at the end, and anything else (keep-alives,
//! comments) to be ignored. Chunk boundaries are arbitrary — a line, or
//! even a multi-byte UTF-8 sequence, can be split across fragments.
//!
//! [`LineBuffer`] reassembles fragments into complete lines,
//! [`StreamDecoder`] turns lines into [`StreamEvent`]s, and [`Utf8Carry`]
//! handles byte-level reassembly for the transport driver in
//! [`crate::api`].

mod decoder;
mod line_buffer;

pub use decoder::{ProgressHook, StreamDecoder};
pub use line_buffer::LineBuffer;

/// One decoded content increment.
///
/// Events arrive in wire order. `is_final` marks the terminal event of the
/// stream; no further events are produced after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamEvent {
    pub text: String,
    pub is_final: bool,
}

/// Reassembles multi-byte UTF-8 sequences split across transport chunks.
///
/// Bytes that do not yet form a complete sequence are carried over to the
/// next push instead of being lossily replaced.
#[derive(Debug, Default)]
pub struct Utf8Carry {
    pending: Vec<u8>,
}

impl Utf8Carry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends raw bytes and returns the longest valid UTF-8 prefix as text.
    pub fn push(&mut self, bytes: &[u8]) -> String {
        self.pending.extend_from_slice(bytes);
        match std::str::from_utf8(&self.pending) {
            Ok(text) => {
                let text = text.to_string();
                self.pending.clear();
                text
            }
            Err(err) => {
                let valid = err.valid_up_to();
                let text = String::from_utf8_lossy(&self.pending[..valid]).into_owned();
                self.pending.drain(..valid);
                text
            }
        }
    }

    /// True if no incomplete sequence is pending.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
