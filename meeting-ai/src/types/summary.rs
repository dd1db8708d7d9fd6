//! Types for meeting summaries.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Structured extraction of a meeting transcript.
///
/// All five fields are always present; an empty list means nothing of that kind
/// was found in the meeting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StructuredSummary {
    /// A short paragraph describing the meeting.
    pub short_summary: String,
    pub decisions: Vec<String>,
    pub action_items: Vec<String>,
    pub participants: Vec<String>,
    pub important_topics: Vec<String>,
}

/// Fallback for a provider reply that does not match [`StructuredSummary`].
///
/// `raw` carries the reply exactly as received so clients can still show it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RawSummary {
    pub raw: String,
    /// Per-chunk summaries, present only when a long transcript was summarized
    /// in pieces and the merge step failed to produce structured output.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[schema(value_type = Vec<Object>)]
    pub chunks: Vec<Summary>,
}

/// Summary of a transcript: either the structured shape or a raw fallback.
///
/// Serialized without a tag, so clients see either the five structured fields
/// or a `raw` field at the top level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum Summary {
    Structured(StructuredSummary),
    Raw(RawSummary),
}

impl Summary {
    /// Interprets provider output as a structured summary, keeping the original
    /// text as [`Summary::Raw`] when it is not valid JSON of the expected shape.
    pub fn from_content(content: &str) -> Self {
        match serde_json::from_str::<StructuredSummary>(content) {
            Ok(structured) => Summary::Structured(structured),
            Err(_) => Summary::raw(content),
        }
    }

    pub fn raw(content: impl Into<String>) -> Self {
        Summary::Raw(RawSummary {
            raw: content.into(),
            chunks: Vec::new(),
        })
    }

    pub fn is_structured(&self) -> bool {
        matches!(self, Summary::Structured(_))
    }
}
