//! Events pushed to clients over the generation stream

/// One event on the generation stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationEvent {
    /// Human-readable progress
    Status(String),
    /// The generated image URL; sent at most once
    Image(String),
    /// A user-facing error; the stream continues up to `Done`
    Error(String),
    /// Terminal event
    Done,
}

impl GenerationEvent {
    /// SSE event name
    pub fn name(&self) -> &'static str {
        match self {
            GenerationEvent::Status(_) => "status",
            GenerationEvent::Image(_) => "image",
            GenerationEvent::Error(_) => "error",
            GenerationEvent::Done => "done",
        }
    }

    /// SSE data payload
    pub fn data(&self) -> &str {
        match self {
            GenerationEvent::Status(s) | GenerationEvent::Image(s) | GenerationEvent::Error(s) => s,
            GenerationEvent::Done => "done",
        }
    }

    /// Rebuild an event from a decoded SSE frame; unknown names yield `None`
    pub fn from_frame(event: &str, data: String) -> Option<Self> {
        match event {
            "status" => Some(GenerationEvent::Status(data)),
            "image" => Some(GenerationEvent::Image(data)),
            "error" => Some(GenerationEvent::Error(data)),
            "done" => Some(GenerationEvent::Done),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, GenerationEvent::Done)
    }
}
