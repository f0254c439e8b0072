//! Messages pushed to the remote process.
//!
//! The remote process is opaque: the intake only names an event and hands
//! over a JSON payload. Framing and transport belong to the channel.

use serde_json::{Value, json};

/// A message for the remote process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteEvent {
    /// A decoded image ready for server-side processing.
    ProcessImage { event: String, image: String },
    /// A user-visible error.
    ShowError { event: String, message: String },
}

impl RemoteEvent {
    /// Event name, e.g. `process-image`.
    pub fn name(&self) -> &str {
        match self {
            Self::ProcessImage { event, .. } | Self::ShowError { event, .. } => event,
        }
    }

    /// JSON payload: `{ "image": .. }` or `{ "message": .. }`.
    pub fn payload(&self) -> Value {
        match self {
            Self::ProcessImage { image, .. } => json!({ "image": image }),
            Self::ShowError { message, .. } => json!({ "message": message }),
        }
    }
}

/// Trait for the outbound channel, enabling mock implementations for testing.
pub trait RemoteChannel {
    fn push(&self, event: RemoteEvent);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn process_image_payload() {
        let event = RemoteEvent::ProcessImage {
            event: "process-image".to_owned(),
            image: "data:image/png;base64,AA==".to_owned(),
        };
        assert_eq!(event.name(), "process-image");
        assert_eq!(event.payload(), json!({ "image": "data:image/png;base64,AA==" }));
    }

    #[test]
    fn show_error_payload() {
        let event = RemoteEvent::ShowError {
            event: "show-error".to_owned(),
            message: "Please upload an image file".to_owned(),
        };
        assert_eq!(event.name(), "show-error");
        assert_eq!(event.payload(), json!({ "message": "Please upload an image file" }));
    }
}
