use thiserror::Error;

const BYTES_PER_MIB: u64 = 1024 * 1024;

/// `limit` in MiB, with up to two decimals and no trailing zeros.
fn mib_label(limit: &u64) -> String {
    let label = format!("{:.2}", *limit as f64 / BYTES_PER_MIB as f64);
    label.trim_end_matches('0').trim_end_matches('.').to_owned()
}

/// Reasons a file is refused before decoding.
///
/// The `Display` output is the message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntakeError {
    #[error("Please upload an image file")]
    InvalidType { mime_type: String },
    #[error("File size must be less than {}MB", mib_label(.limit))]
    TooLarge { size: u64, limit: u64 },
}

/// Failure to turn file contents into a data URI, or to read one back.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Failed to read file contents: {0}")]
    Read(String),
    #[error("Malformed data URI: {0}")]
    MalformedDataUri(String),
    #[error("Invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
}

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("No observer registered for {observer_id:?}")]
    MissingObserver { observer_id: String },
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid intake configuration: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn too_large_message_uses_limit_in_mib() {
        let err = IntakeError::TooLarge {
            size: 11 * BYTES_PER_MIB,
            limit: 10 * BYTES_PER_MIB,
        };
        assert_eq!(err.to_string(), "File size must be less than 10MB");
    }

    #[test]
    fn too_large_message_keeps_fractional_limit() {
        let err = IntakeError::TooLarge {
            size: 2 * BYTES_PER_MIB,
            limit: BYTES_PER_MIB + BYTES_PER_MIB / 2,
        };
        assert_eq!(err.to_string(), "File size must be less than 1.5MB");
    }

    #[test]
    fn mib_label_trims_whole_numbers() {
        assert_eq!(mib_label(&(2 * BYTES_PER_MIB)), "2");
        assert_eq!(mib_label(&(BYTES_PER_MIB / 4)), "0.25");
    }

    #[test]
    fn invalid_type_message_ignores_mime() {
        let err = IntakeError::InvalidType {
            mime_type: "text/plain".to_owned(),
        };
        assert_eq!(err.to_string(), "Please upload an image file");
    }

    #[test]
    fn missing_observer_names_the_observer() {
        let err = BridgeError::MissingObserver {
            observer_id: "ImageHook".to_owned(),
        };
        assert!(err.to_string().contains("ImageHook"));
    }
}
