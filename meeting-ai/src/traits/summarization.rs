//! Summarization provider trait.

use crate::types::summary::Summary;
use crate::Error;
use async_trait::async_trait;

/// Abstraction for LLM-powered meeting transcript summarization.
///
/// Implementations turn a transcript into the five-field structured summary.
/// A reply that cannot be decoded into that shape is returned as
/// [`Summary::Raw`] instead of an error; only transport and HTTP failures are errors.
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait Provider: Send + Sync {
    async fn summarize(&self, transcript: &str) -> std::result::Result<Summary, Error>;
}
