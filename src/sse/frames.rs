//! Client-side decoding of `text/event-stream` responses

use super::LineBuffer;

/// One dispatched SSE event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseFrame {
    pub event: String,
    pub data: String,
}

/// Incremental decoder: feed chunks, collect frames
///
/// Frames end at a blank line. Comment lines (`:`) and unknown fields are
/// ignored, and frames without data are dropped.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    lines: LineBuffer,
    event: Option<String>,
    data: Vec<String>,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk and return every frame it completed
    pub fn push(&mut self, chunk: &[u8]) -> Vec<SseFrame> {
        self.lines.push(chunk);
        let mut frames = Vec::new();
        while let Some(line) = self.lines.next_line() {
            if let Some(frame) = self.line(&line) {
                frames.push(frame);
            }
        }
        frames
    }

    fn line(&mut self, line: &str) -> Option<SseFrame> {
        if line.is_empty() {
            return self.dispatch();
        }
        if let Some(name) = line.strip_prefix("event:") {
            self.event = Some(name.trim().to_string());
        } else if let Some(data) = line.strip_prefix("data:") {
            self.data.push(data.strip_prefix(' ').unwrap_or(data).to_string());
        }
        None
    }

    fn dispatch(&mut self) -> Option<SseFrame> {
        let event = self.event.take();
        let data = std::mem::take(&mut self.data).join("\n");
        if data.is_empty() {
            return None;
        }
        Some(SseFrame {
            event: event.unwrap_or_else(|| "message".to_string()),
            data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(event: &str, data: &str) -> SseFrame {
        SseFrame {
            event: event.to_string(),
            data: data.to_string(),
        }
    }

    #[test]
    fn test_named_events() {
        let mut decoder = FrameDecoder::new();
        let frames = decoder.push(b"event: status\ndata: bezig\n\nevent: done\ndata: done\n\n");
        assert_eq!(frames, vec![frame("status", "bezig"), frame("done", "done")]);
    }

    #[test]
    fn test_default_event_name() {
        let mut decoder = FrameDecoder::new();
        assert_eq!(decoder.push(b"data: hi\n\n"), vec![frame("message", "hi")]);
    }

    #[test]
    fn test_multiline_data() {
        let mut decoder = FrameDecoder::new();
        let frames = decoder.push(b"event: error\ndata: line one\ndata: line two\n\n");
        assert_eq!(frames, vec![frame("error", "line one\nline two")]);
    }

    #[test]
    fn test_split_across_chunks() {
        let mut decoder = FrameDecoder::new();
        assert!(decoder.push(b"event: ima").is_empty());
        assert!(decoder.push(b"ge\ndata: https://example/r").is_empty());
        assert!(decoder.push(b".png\n").is_empty());
        assert_eq!(
            decoder.push(b"\n"),
            vec![frame("image", "https://example/r.png")]
        );
    }

    #[test]
    fn test_comments_and_empty_frames_skipped() {
        let mut decoder = FrameDecoder::new();
        let frames = decoder.push(b":\n\n: keep-alive\n\nevent: status\n\nid: 3\ndata: x\n\n");
        assert_eq!(frames, vec![frame("message", "x")]);
    }

    #[test]
    fn test_crlf_frames() {
        let mut decoder = FrameDecoder::new();
        let frames = decoder.push(b"event: image\r\ndata: u\r\n\r\n");
        assert_eq!(frames, vec![frame("image", "u")]);
    }
}
