//! Domain layer of the meeting summarizer: upload storage, the OpenAI gateway and the
//! upload → transcribe → summarize pipeline that ties them together.
//!
//! Summary types are re-exported from `meeting_ai` so that `web` does not need to
//! depend on it directly.
pub use meeting_ai::{RawSummary, StructuredSummary, Summary};

pub mod error;
pub mod gateway;
pub mod pipeline;
pub mod upload;
