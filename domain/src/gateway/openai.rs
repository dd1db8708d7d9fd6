//! OpenAI API client for meeting transcription and summarization.
//!
//! Implements both `meeting_ai` provider traits on top of the OpenAI audio
//! transcription and chat completion endpoints.

use crate::error::{DomainErrorKind, Error, InternalErrorKind};
use crate::gateway::chunking::split_chunks;
use async_trait::async_trait;
use log::*;
use meeting_ai::traits::{summarization, transcription};
use meeting_ai::{Error as AiError, RawSummary, Summary};
use reqwest::multipart;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use std::time::Duration;
use tokio_util::io::ReaderStream;

/// Fields that may carry the transcript in a transcription response, in precedence order.
/// When none holds a non-empty string the whole response body is used instead.
const TRANSCRIPT_FIELDS: [&str; 2] = ["text", "transcript"];

/// Output token ceiling for a single summary.
const SUMMARY_MAX_TOKENS: u32 = 800;

/// Output token ceiling when merging per-chunk summaries.
const MERGE_MAX_TOKENS: u32 = 1000;

const SUMMARY_SYSTEM_PROMPT: &str = r#"You are a meeting summarization assistant. Given a meeting transcript, produce a JSON object with exactly these keys:
- short_summary: one-paragraph summary (2-3 sentences)
- decisions: list of strings, one per decision made
- action_items: list of strings, one per task, including the owner when known
- participants: list of participant names (or empty)
- important_topics: list of keywords (3-8)
Use empty lists when nothing applies. Return ONLY valid JSON, no markdown or explanation."#;

/// Request body for the chat completions endpoint.
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

/// Assistant reply pulled from `choices[0].message.content`.
#[derive(Debug, PartialEq)]
enum ReplyContent {
    /// Text that is expected to hold the summary JSON.
    Text(String),
    /// Missing or non-string content, kept only as a raw fallback.
    Unusable(String),
}

impl ReplyContent {
    fn from_response(response: &Value) -> Self {
        match response.pointer("/choices/0/message/content") {
            Some(Value::String(text)) => ReplyContent::Text(text.clone()),
            None | Some(Value::Null) => ReplyContent::Unusable(String::new()),
            Some(other) => ReplyContent::Unusable(other.to_string()),
        }
    }

    fn into_summary(self) -> Summary {
        match self {
            ReplyContent::Text(text) => Summary::from_content(&text),
            ReplyContent::Unusable(raw) => Summary::raw(raw),
        }
    }
}

/// OpenAI API client
pub struct OpenAiClient {
    client: reqwest::Client,
    base_url: String,
    transcription_model: String,
    chat_model: String,
    transcription_timeout: Duration,
    summarization_timeout: Duration,
    summary_chunk_chars: Option<usize>,
}

impl OpenAiClient {
    /// Create a new OpenAI client with the given API key and base URL
    pub fn new(api_key: &SecretString, base_url: &str) -> Result<Self, Error> {
        let mut headers = reqwest::header::HeaderMap::new();

        let mut header_value = reqwest::header::HeaderValue::from_str(&format!(
            "Bearer {}",
            api_key.expose_secret()
        ))
        .map_err(|e| {
            warn!("Failed to create auth header: {:?}", e);
            Error {
                source: Some(Box::new(e)),
                error_kind: DomainErrorKind::Internal(InternalErrorKind::Config),
            }
        })?;
        header_value.set_sensitive(true);
        headers.insert(reqwest::header::AUTHORIZATION, header_value);

        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            transcription_model: service::config::DEFAULT_ASR_MODEL.to_string(),
            chat_model: service::config::DEFAULT_CHAT_MODEL.to_string(),
            transcription_timeout: Duration::from_secs(300),
            summarization_timeout: Duration::from_secs(120),
            summary_chunk_chars: None,
        })
    }

    pub fn with_models(mut self, transcription_model: &str, chat_model: &str) -> Self {
        self.transcription_model = transcription_model.to_string();
        self.chat_model = chat_model.to_string();
        self
    }

    pub fn with_timeouts(mut self, transcription: Duration, summarization: Duration) -> Self {
        self.transcription_timeout = transcription;
        self.summarization_timeout = summarization;
        self
    }

    /// Enable chunked summarization for transcripts longer than `max_chars` characters.
    pub fn with_summary_chunk_chars(mut self, max_chars: Option<usize>) -> Self {
        self.summary_chunk_chars = max_chars;
        self
    }

    /// Send one chat completion and return the assistant reply.
    async fn complete(&self, user_content: &str, max_tokens: u32) -> Result<ReplyContent, AiError> {
        let url = format!("{}/chat/completions", self.base_url);
        let request = ChatCompletionRequest {
            model: &self.chat_model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SUMMARY_SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: user_content,
                },
            ],
            temperature: 0.0,
            max_tokens,
        };

        debug!(
            "Requesting OpenAI chat completion with model {} ({} chars)",
            self.chat_model,
            user_content.len()
        );

        let response = self
            .client
            .post(&url)
            .json(&request)
            .timeout(self.summarization_timeout)
            .send()
            .await
            .map_err(|e| {
                warn!("Failed to request OpenAI chat completion: {:?}", e);
                transport_error(e)
            })?;

        let body = success_body(response, "chat completion").await?;
        let response: Value = serde_json::from_str(&body).map_err(|e| {
            warn!("Failed to parse OpenAI chat completion response: {:?}", e);
            AiError::Deserialization(format!("Invalid chat completion response: {}", e))
        })?;

        Ok(ReplyContent::from_response(&response))
    }

    /// Summarize each chunk separately, then ask the model to merge the partial summaries.
    async fn summarize_in_chunks(&self, chunks: &[&str]) -> Result<Summary, AiError> {
        let total = chunks.len();
        let mut partials = Vec::with_capacity(total);

        for (index, chunk) in chunks.iter().enumerate() {
            let user_content = format!("Transcript chunk {}/{}:\n\n{}", index + 1, total, chunk);
            let partial = self
                .complete(&user_content, SUMMARY_MAX_TOKENS)
                .await?
                .into_summary();
            partials.push(partial);
        }

        let merge_input = serde_json::to_string_pretty(&partials)
            .map_err(|e| AiError::Serialization(e.to_string()))?;
        let user_content = format!(
            "These are JSON summaries for transcript chunks:\n{}\n\nPlease merge them into one final JSON meeting summary with the same schema. Remove duplicates and consolidate action items.",
            merge_input
        );

        let merged = self
            .complete(&user_content, MERGE_MAX_TOKENS)
            .await?
            .into_summary();

        Ok(match merged {
            Summary::Raw(RawSummary { raw, .. }) => {
                warn!("Merged summary was not valid JSON, returning raw reply with chunk summaries");
                Summary::Raw(RawSummary {
                    raw,
                    chunks: partials,
                })
            }
            structured => structured,
        })
    }
}

#[async_trait]
impl transcription::Provider for OpenAiClient {
    async fn transcribe(&self, media_path: &Path) -> Result<String, AiError> {
        let url = format!("{}/audio/transcriptions", self.base_url);

        let file = tokio::fs::File::open(media_path)
            .await
            .map_err(|e| AiError::Io(format!("{}: {}", media_path.display(), e)))?;
        let length = file
            .metadata()
            .await
            .map_err(|e| AiError::Io(format!("{}: {}", media_path.display(), e)))?
            .len();
        let file_name = media_path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("upload")
            .to_string();

        let file_part = multipart::Part::stream_with_length(
            reqwest::Body::wrap_stream(ReaderStream::new(file)),
            length,
        )
        .file_name(file_name);

        let form = multipart::Form::new()
            .part("file", file_part)
            .text("model", self.transcription_model.clone());

        debug!(
            "Sending {} bytes to OpenAI transcription with model {}",
            length, self.transcription_model
        );

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .timeout(self.transcription_timeout)
            .send()
            .await
            .map_err(|e| {
                warn!("Failed to request OpenAI transcription: {:?}", e);
                transport_error(e)
            })?;

        let body = success_body(response, "transcription").await?;
        let transcript = extract_transcript(&body);
        info!("OpenAI transcription completed ({} chars)", transcript.len());
        Ok(transcript)
    }
}

#[async_trait]
impl summarization::Provider for OpenAiClient {
    async fn summarize(&self, transcript: &str) -> Result<Summary, AiError> {
        if let Some(max_chars) = self.summary_chunk_chars {
            let chunks = split_chunks(transcript, max_chars);
            if chunks.len() > 1 {
                info!("Summarizing transcript in {} chunks", chunks.len());
                return self.summarize_in_chunks(&chunks).await;
            }
        }

        let summary = self
            .complete(transcript, SUMMARY_MAX_TOKENS)
            .await?
            .into_summary();
        if !summary.is_structured() {
            warn!("OpenAI summary was not valid summary JSON, returning raw reply");
        }
        Ok(summary)
    }
}

/// Picks the transcript out of a transcription response body.
fn extract_transcript(body: &str) -> String {
    let Ok(response) = serde_json::from_str::<Value>(body) else {
        return body.to_string();
    };

    TRANSCRIPT_FIELDS
        .iter()
        .find_map(|field| {
            response
                .get(field)
                .and_then(Value::as_str)
                .filter(|text| !text.is_empty())
        })
        .map(str::to_string)
        .unwrap_or_else(|| response.to_string())
}

fn transport_error(err: reqwest::Error) -> AiError {
    if err.is_timeout() {
        AiError::Timeout(err.to_string())
    } else {
        AiError::Network(err.to_string())
    }
}

/// Reads the response body, turning any non-2xx status into `AiError::Upstream`.
async fn success_body(response: reqwest::Response, operation: &str) -> Result<String, AiError> {
    let status = response.status();
    let body = response.text().await.map_err(|e| {
        warn!("Failed to read OpenAI {} response: {:?}", operation, e);
        transport_error(e)
    })?;

    if status.is_success() {
        Ok(body)
    } else {
        error!("OpenAI {} API ({}): {}", operation, status, body);
        Err(AiError::Upstream {
            status: status.as_u16(),
            body,
        })
    }
}
