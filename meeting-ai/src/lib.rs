//! Meeting AI abstraction layer for transcription and summarization providers.
//!
//! This crate provides trait-based abstractions for the meeting ingestion workflow:
//! - Speech-to-text transcription of a recorded meeting
//! - LLM-powered summarization of the resulting transcript
//!
//! The design is provider-agnostic, enabling applications to swap between
//! service providers (OpenAI, self-hosted Whisper, etc.) without changing
//! application code.

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::Error;
pub use types::summary::{RawSummary, StructuredSummary, Summary};
