//! What the front end shows

use crate::generate::GenerationEvent;

/// View state of the visualizer
///
/// The error overlay rides along in every state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    /// Collecting uploads
    Collecting { error: Option<String> },
    /// A request is in flight
    Generating {
        status: String,
        image_url: Option<String>,
        error: Option<String>,
    },
    /// A generated image is on screen
    Showing {
        image_url: String,
        error: Option<String>,
    },
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState::Collecting { error: None }
    }
}

impl ViewState {
    /// Fresh generating state with no result or error carried over
    pub fn generating(status: impl Into<String>) -> Self {
        ViewState::Generating {
            status: status.into(),
            image_url: None,
            error: None,
        }
    }

    pub fn is_generating(&self) -> bool {
        matches!(self, ViewState::Generating { .. })
    }

    /// The generated image, once received
    pub fn image_url(&self) -> Option<&str> {
        match self {
            ViewState::Collecting { .. } => None,
            ViewState::Generating { image_url, .. } => image_url.as_deref(),
            ViewState::Showing { image_url, .. } => Some(image_url),
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ViewState::Collecting { error }
            | ViewState::Generating { error, .. }
            | ViewState::Showing { error, .. } => error.as_deref(),
        }
    }

    /// Progress text while generating; empty once cleared
    pub fn status(&self) -> Option<&str> {
        match self {
            ViewState::Generating { status, .. } => Some(status),
            _ => None,
        }
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        let message = Some(message.into());
        match self {
            ViewState::Collecting { error }
            | ViewState::Generating { error, .. }
            | ViewState::Showing { error, .. } => *error = message,
        }
    }

    /// Fold one stream event into the generating state
    pub fn apply(&mut self, event: GenerationEvent) {
        let ViewState::Generating {
            status,
            image_url,
            error,
        } = self
        else {
            return;
        };

        match event {
            GenerationEvent::Status(text) => *status = text,
            GenerationEvent::Image(url) => {
                *image_url = Some(url);
                status.clear();
            }
            GenerationEvent::Error(message) => *error = Some(message),
            GenerationEvent::Done => status.clear(),
        }
    }

    /// Leave the generating state once the response has ended
    pub fn finish(self) -> Self {
        match self {
            ViewState::Generating {
                image_url: Some(image_url),
                error,
                ..
            } => ViewState::Showing { image_url, error },
            ViewState::Generating {
                image_url: None,
                error,
                ..
            } => ViewState::Collecting { error },
            other => other,
        }
    }
}
