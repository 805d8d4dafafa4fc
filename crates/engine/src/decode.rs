use crate::error::StreamError;

/// Ceiling on undelivered bytes. A well-formed stream never gets near this;
/// hitting it means the producer stopped emitting record boundaries.
const MAX_BUFFER_BYTES: usize = if cfg!(test) { 4096 } else { 8 * 1024 * 1024 };

/// Reassembles discrete event records out of an arbitrarily chunked byte
/// stream.
///
/// Records are separated by a blank line (`\n\n`, tolerating `\r\n\r\n`); a
/// record boundary may fall anywhere relative to a chunk boundary, so
/// undelivered trailing bytes are buffered across calls and only complete
/// records are emitted.
#[derive(Debug, Default)]
pub struct RecordDecoder {
    buf: Vec<u8>,
}

impl RecordDecoder {
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Appends a chunk and returns every complete record it unlocked, in
    /// stream order.
    pub fn push(&mut self, chunk: &[u8]) -> Result<Vec<String>, StreamError> {
        self.buf.extend_from_slice(chunk);
        let mut records = Vec::new();
        while let Some(raw) = self.split_next() {
            if let Some(text) = normalize(&raw) {
                records.push(text);
            }
        }
        if self.buf.len() > MAX_BUFFER_BYTES {
            self.buf.clear();
            return Err(StreamError::BufferOverflow {
                limit: MAX_BUFFER_BYTES,
            });
        }
        Ok(records)
    }

    /// Drains a final unterminated record once the stream has closed. Streams
    /// are not required to end with a blank line.
    pub fn finish(&mut self) -> Option<String> {
        let remainder = std::mem::take(&mut self.buf);
        normalize(&remainder)
    }

    /// Splits the earliest complete record off the front of the buffer. The
    /// trailing byte is never inspected as a boundary start, so a separator
    /// split across chunks is picked up on the next push.
    fn split_next(&mut self) -> Option<Vec<u8>> {
        let mut i = 0;
        while i + 1 < self.buf.len() {
            if self.buf[i] == b'\n' {
                let rest = &self.buf[i + 1..];
                let sep_len = if rest.starts_with(b"\n") {
                    1
                } else if rest.starts_with(b"\r\n") {
                    2
                } else {
                    0
                };
                if sep_len > 0 {
                    let record = self.buf[..i].to_vec();
                    self.buf.drain(..i + 1 + sep_len);
                    return Some(record);
                }
            }
            i += 1;
        }
        None
    }
}

fn normalize(raw: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(raw);
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}
