//! Data-URI codec for decoded images.
//!
//! Decoding a file means reading its bytes and wrapping them as
//! `data:<mime>;base64,<payload>`, the same text-safe form a browser
//! `FileReader::readAsDataURL` produces.

use base64::{Engine as _, engine::general_purpose};

use crate::error::DecodeError;
use crate::file::RawFile;

/// Media type used when the file does not declare one.
const FALLBACK_MIME: &str = "application/octet-stream";
const BASE64_MARKER: &str = ";base64,";

/// A file's contents encoded as a data URI. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    payload: String,
}

impl DecodedImage {
    pub fn encode(mime_type: &str, bytes: &[u8]) -> Self {
        let mime_type = if mime_type.is_empty() {
            FALLBACK_MIME
        } else {
            mime_type
        };
        let encoded = general_purpose::STANDARD.encode(bytes);
        Self {
            payload: format!("data:{mime_type}{BASE64_MARKER}{encoded}"),
        }
    }

    /// Accepts an existing data URI, checking that it is base64 encoded.
    pub fn parse(payload: impl Into<String>) -> Result<Self, DecodeError> {
        let image = Self {
            payload: payload.into(),
        };
        image.split()?;
        Ok(image)
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }

    pub fn into_payload(self) -> String {
        self.payload
    }

    pub fn mime_type(&self) -> Result<&str, DecodeError> {
        self.split().map(|(mime, _)| mime)
    }

    /// Recovers the original file bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, DecodeError> {
        let (_, data) = self.split()?;
        Ok(general_purpose::STANDARD.decode(data)?)
    }

    fn split(&self) -> Result<(&str, &str), DecodeError> {
        let rest = self
            .payload
            .strip_prefix("data:")
            .ok_or_else(|| DecodeError::MalformedDataUri("missing `data:` scheme".to_owned()))?;
        let marker = rest
            .find(BASE64_MARKER)
            .ok_or_else(|| DecodeError::MalformedDataUri("missing `;base64,` marker".to_owned()))?;
        Ok((&rest[..marker], &rest[marker + BASE64_MARKER.len()..]))
    }
}

/// Reads a file and encodes it. The only suspension point of the pipeline.
pub async fn decode_file(file: &dyn RawFile) -> Result<DecodedImage, DecodeError> {
    let mime_type = file.mime_type();
    let bytes = file.read_bytes().await?;
    log::trace!(
        target: "imgdrop_input::decode",
        "decoded name={} mime={} bytes={}",
        file.name(),
        mime_type,
        bytes.len()
    );
    Ok(DecodedImage::encode(&mime_type, &bytes))
}
