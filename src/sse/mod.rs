//! Server-Sent Events framing
//!
//! Provides:
//! - Line buffering for upstream provider streams
//! - Frame decoding for clients consuming the generation stream

mod frames;
mod lines;

pub use frames::{FrameDecoder, SseFrame};
pub use lines::LineBuffer;

/// Sentinel that terminates an OpenAI-style completion stream
pub const DONE_SENTINEL: &str = "[DONE]";

/// Extract the payload of a `data:` line
///
/// Returns `None` for non-data lines, empty payloads and the `[DONE]` sentinel.
pub fn data_payload(line: &str) -> Option<&str> {
    let payload = line.trim().strip_prefix("data:")?.trim();
    if payload.is_empty() || payload == DONE_SENTINEL {
        None
    } else {
        Some(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_payload() {
        assert_eq!(data_payload("data: {\"a\":1}"), Some("{\"a\":1}"));
        assert_eq!(data_payload("data:{}"), Some("{}"));
        assert_eq!(data_payload("  data: x  "), Some("x"));
    }

    #[test]
    fn test_data_payload_skips() {
        assert_eq!(data_payload("data: [DONE]"), None);
        assert_eq!(data_payload("data:"), None);
        assert_eq!(data_payload(": OPENROUTER PROCESSING"), None);
        assert_eq!(data_payload("event: message"), None);
        assert_eq!(data_payload(""), None);
    }
}
