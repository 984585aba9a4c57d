//! Incremental decoder for `text/event-stream` bodies.
//!
//! Bytes are buffered until a full line is available, so UTF-8 sequences and
//! lines split across network chunks are reassembled before decoding. Only
//! `data:` lines produce payloads.

use memchr::memchr;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::core::error::FrameError;

/// Payload that marks the end of an OpenAI-style stream.
pub const DONE_SENTINEL: &str = "[DONE]";

fn extract_data_payload(line: &str) -> Option<&str> {
    let rest = line.strip_prefix("data:")?;
    Some(rest.strip_prefix(' ').unwrap_or(rest))
}

/// Decode one payload, reporting what went wrong instead of panicking.
pub fn parse_payload<T: DeserializeOwned>(payload: &str) -> Result<T, FrameError> {
    serde_json::from_str(payload).map_err(FrameError::Json)
}

#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes received that do not yet form a complete line.
    pub fn pending_len(&self) -> usize {
        self.buffer.len()
    }

    /// Append a chunk and return the raw payload of every completed `data:`
    /// line, in order. The `[DONE]` sentinel is dropped here.
    pub fn push_lines(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(chunk);

        let mut payloads = Vec::new();
        let mut consumed = 0;
        while let Some(offset) = memchr(b'\n', &self.buffer[consumed..]) {
            let line_end = consumed + offset;
            let raw = &self.buffer[consumed..line_end];
            let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
            consumed = line_end + 1;

            let line = match std::str::from_utf8(raw) {
                Ok(line) => line,
                Err(err) => {
                    warn!(error = %FrameError::Utf8(err), "Skipping stream frame");
                    continue;
                }
            };

            match extract_data_payload(line) {
                Some(DONE_SENTINEL) => debug!("Stream sentinel received"),
                Some(payload) if payload.trim().is_empty() => {}
                Some(payload) => payloads.push(payload.to_string()),
                None => {}
            }
        }
        self.buffer.drain(..consumed);

        payloads
    }

    /// Append a chunk and decode every completed frame as `T`. Frames that
    /// fail to parse are logged and skipped.
    pub fn push<T: DeserializeOwned>(&mut self, chunk: &[u8]) -> Vec<T> {
        self.push_lines(chunk)
            .into_iter()
            .filter_map(|payload| match parse_payload::<T>(&payload) {
                Ok(frame) => Some(frame),
                Err(err) => {
                    warn!(error = %err, payload = %payload, "Skipping stream frame");
                    None
                }
            })
            .collect()
    }

    /// End of transport. A trailing partial line is never treated as a frame.
    pub fn finish(self) {
        if !self.buffer.is_empty() {
            debug!(
                discarded_bytes = self.buffer.len(),
                "Discarding incomplete trailing stream line"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ChatResponse;
    use serde_json::{json, Value};

    #[test]
    fn reassembles_frames_split_at_every_position() {
        let wire = "data: {\"a\":1}\n";
        for cut in 0..=wire.len() {
            let mut decoder = SseDecoder::new();
            let mut frames: Vec<Value> = decoder.push(&wire.as_bytes()[..cut]);
            frames.extend(decoder.push::<Value>(&wire.as_bytes()[cut..]));
            assert_eq!(frames, vec![json!({"a": 1})], "cut at {cut}");
            assert_eq!(decoder.pending_len(), 0);
        }
    }

    #[test]
    fn multibyte_characters_split_across_chunks() {
        let wire = "data: {\"t\":\"café ✓\"}\n".as_bytes();
        let split = wire.iter().position(|b| *b == 0xE2).expect("check mark") + 1;
        let mut decoder = SseDecoder::new();
        assert!(decoder.push::<Value>(&wire[..split]).is_empty());
        let frames: Vec<Value> = decoder.push(&wire[split..]);
        assert_eq!(frames, vec![json!({"t": "café ✓"})]);
    }

    #[test]
    fn done_sentinel_is_dropped_before_parsing() {
        let mut decoder = SseDecoder::new();
        let lines = decoder.push_lines(b"data: [DONE]\n");
        assert!(lines.is_empty());
        let frames: Vec<Value> = decoder.push(b"data: [DONE]\r\n");
        assert!(frames.is_empty());
    }

    #[test]
    fn malformed_frame_is_skipped_without_stopping() {
        let mut decoder = SseDecoder::new();
        let frames: Vec<Value> =
            decoder.push(b"data: {\"a\":1}\ndata: {not json\ndata: {\"b\":2}\n");
        assert_eq!(frames, vec![json!({"a": 1}), json!({"b": 2})]);
    }

    #[test]
    fn ignores_non_data_lines_and_accepts_compact_prefix() {
        let mut decoder = SseDecoder::new();
        let lines = decoder
            .push_lines(b": keep-alive\nevent: message\n\ndata:{\"x\":true}\r\nid: 7\n");
        assert_eq!(lines, vec!["{\"x\":true}".to_string()]);
    }

    #[test]
    fn trailing_partial_line_is_not_emitted() {
        let mut decoder = SseDecoder::new();
        let frames: Vec<Value> = decoder.push(b"data: {\"a\":1}\ndata: {\"b\":");
        assert_eq!(frames.len(), 1);
        assert!(decoder.pending_len() > 0);
        decoder.finish();
    }

    #[test]
    fn empty_delta_frame_decodes_without_content() {
        let mut decoder = SseDecoder::new();
        let frames: Vec<ChatResponse> = decoder.push(b"data: {\"choices\":[{\"delta\":{}}]}\n");
        assert_eq!(frames.len(), 1);
        assert!(frames[0].content_delta().is_none());
        assert!(frames[0].usage.is_none());
    }
}
