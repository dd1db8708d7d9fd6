//! Error types for the `domain` layer.
use std::error::Error as StdError;
use std::fmt;

/// Top-level domain error type.
/// Errors in the Domain layer are modeled as a tree structure
/// with `domain::error::Error` as the root type holding a tree of `error_kind`
/// enums that represent the kinds of errors that can occur in the domain layer or
/// in lower layers. The `source` field is used to hold the original error that caused
/// the domain error, e.g. the `meeting_ai::Error` returned by a provider. `web` uses the
/// `error_kind` to pick an HTTP status and the `Display` output as the client-facing message.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: DomainErrorKind,
}

/// Enum representing the major categories of errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum DomainErrorKind {
    Internal(InternalErrorKind),
    External(ExternalErrorKind),
}

/// Enum representing the various kinds of internal errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum InternalErrorKind {
    /// The request was rejected before any external call was made.
    Validation(String),
    /// The upload body could not be received. `source` holds the transport error.
    Upload,
    /// The upload could not be written to local storage.
    Storage,
    Config,
    Other(String),
}

/// Enum representing the pipeline stage whose external provider call failed.
#[derive(Debug, PartialEq)]
pub enum ExternalErrorKind {
    Transcription,
    Summarization,
}

impl Error {
    pub fn validation(message: impl Into<String>) -> Self {
        Error {
            source: None,
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Validation(message.into())),
        }
    }

    pub fn transcription(err: meeting_ai::Error) -> Self {
        Error {
            source: Some(Box::new(err)),
            error_kind: DomainErrorKind::External(ExternalErrorKind::Transcription),
        }
    }

    pub fn summarization(err: meeting_ai::Error) -> Self {
        Error {
            source: Some(Box::new(err)),
            error_kind: DomainErrorKind::External(ExternalErrorKind::Summarization),
        }
    }

    /// The provider error behind an external failure, if any.
    pub fn provider_error(&self) -> Option<&meeting_ai::Error> {
        self.source
            .as_ref()
            .and_then(|source| source.downcast_ref::<meeting_ai::Error>())
    }

    /// Response body returned by the external provider, when the failure came from one.
    pub fn upstream_body(&self) -> Option<&str> {
        self.provider_error()
            .and_then(meeting_ai::Error::upstream_body)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let source = self
            .source
            .as_ref()
            .map(|source| source.to_string())
            .unwrap_or_default();

        match &self.error_kind {
            DomainErrorKind::Internal(InternalErrorKind::Validation(message)) => {
                write!(f, "{message}")
            }
            DomainErrorKind::Internal(InternalErrorKind::Upload) => {
                write!(f, "Failed to receive upload: {source}")
            }
            DomainErrorKind::Internal(InternalErrorKind::Storage) => {
                write!(f, "Failed to store upload: {source}")
            }
            DomainErrorKind::Internal(InternalErrorKind::Config) => {
                write!(f, "Invalid configuration: {source}")
            }
            DomainErrorKind::Internal(InternalErrorKind::Other(message)) => {
                write!(f, "{message}")
            }
            DomainErrorKind::External(ExternalErrorKind::Transcription) => {
                write!(f, "Transcription failed: {source}")
            }
            DomainErrorKind::External(ExternalErrorKind::Summarization) => {
                write!(f, "Summarization failed: {source}")
            }
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

// Local filesystem failures only happen while persisting uploads.
impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error {
            source: Some(Box::new(err)),
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Storage),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        // Only raised while building the reqwest::Client instance, before any
        // network call is made. Network failures are reported through meeting_ai::Error.
        Error {
            source: Some(Box::new(err)),
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Config),
        }
    }
}
