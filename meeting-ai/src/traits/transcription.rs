//! Transcription provider trait.

use crate::Error;
use async_trait::async_trait;
use std::path::Path;

/// Abstraction for speech-to-text transcription services.
///
/// Implementations read the recording from local storage and return its spoken
/// content as plain text. The file is only read, never moved or deleted.
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait Provider: Send + Sync {
    /// Transcribe the audio/video file at `media_path`.
    ///
    /// The returned transcript may be empty but is never absent. Media files can be
    /// large, so implementations should stream the file and allow a long timeout.
    async fn transcribe(&self, media_path: &Path) -> std::result::Result<String, Error>;
}
