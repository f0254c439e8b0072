//! Files as handed over by the platform file-selection API.
//!
//! A [`RawFile`] is only a reference to browser-owned data: metadata is
//! available synchronously, the contents only through [`RawFile::read_bytes`],
//! which is the single asynchronous step of the intake pipeline.

use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;

use crate::error::DecodeError;

/// Future returned by [`RawFile::read_bytes`].
///
/// Not `Send`: browser file handles live on the event-loop thread.
pub type ReadFuture = Pin<Box<dyn Future<Output = Result<Vec<u8>, DecodeError>>>>;

/// Trait for a user-selected file, enabling mock implementations for testing.
pub trait RawFile {
    /// Declared media type, e.g. `image/png`. May be empty.
    fn mime_type(&self) -> String;

    /// Size in bytes as reported by the platform.
    fn size(&self) -> u64;

    /// File name, used for diagnostics only.
    fn name(&self) -> String;

    /// Reads the full contents.
    ///
    /// The returned future must not borrow `self`, so it can outlive the
    /// event that produced the file.
    fn read_bytes(&self) -> ReadFuture;
}

/// In-memory file, used by native hosts and tests.
#[derive(Debug, Clone)]
pub struct MemoryFile {
    name: String,
    mime_type: String,
    bytes: Rc<[u8]>,
    reported_size: Option<u64>,
}

impl MemoryFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes: bytes.into(),
            reported_size: None,
        }
    }

    /// Overrides the size reported by [`RawFile::size`] without allocating it.
    ///
    /// Lets callers describe a large file while only holding a few bytes.
    #[must_use]
    pub fn with_reported_size(mut self, size: u64) -> Self {
        self.reported_size = Some(size);
        self
    }
}

impl RawFile for MemoryFile {
    fn mime_type(&self) -> String {
        self.mime_type.clone()
    }

    fn size(&self) -> u64 {
        self.reported_size.unwrap_or(self.bytes.len() as u64)
    }

    fn name(&self) -> String {
        self.name.clone()
    }

    fn read_bytes(&self) -> ReadFuture {
        let bytes = Rc::clone(&self.bytes);
        Box::pin(async move { Ok(bytes.to_vec()) })
    }
}

/// Returns the first file of a selection, the only one intake considers.
pub fn first_file(files: &[Rc<dyn RawFile>]) -> Option<Rc<dyn RawFile>> {
    files.first().cloned()
}
