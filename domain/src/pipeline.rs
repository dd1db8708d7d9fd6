//! Upload → transcribe → summarize pipeline.
//!
//! The credential on [`PipelineConfig`] selects the path: without one, deterministic
//! mock outputs are returned with the same response shape as the live path, so the
//! request/response contract can be exercised without external calls.

use crate::error::Error;
use crate::gateway::openai::OpenAiClient;
use crate::upload::UploadedFile;
use log::*;
use meeting_ai::traits::{summarization, transcription};
use meeting_ai::{StructuredSummary, Summary};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use service::config::Config;
use std::time::Duration;
use utoipa::ToSchema;

/// Sentinel `short_summary` returned on the mock path.
pub const MOCK_SUMMARY_TEXT: &str = "MOCK SUMMARY — no API key provided";

/// Everything the pipeline needs to know about the outside world, resolved once
/// from the process configuration and passed in explicitly.
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    pub api_key: Option<SecretString>,
    pub base_url: String,
    pub transcription_model: String,
    pub chat_model: String,
    pub transcription_timeout: Duration,
    pub summarization_timeout: Duration,
    pub summary_chunk_chars: Option<usize>,
}

impl PipelineConfig {
    /// A configuration without a credential, i.e. one that always takes the mock path.
    #[cfg(test)]
    pub fn mock() -> Self {
        Self {
            api_key: None,
            base_url: service::config::DEFAULT_OPENAI_BASE_URL.to_string(),
            transcription_model: service::config::DEFAULT_ASR_MODEL.to_string(),
            chat_model: service::config::DEFAULT_CHAT_MODEL.to_string(),
            transcription_timeout: Duration::from_secs(300),
            summarization_timeout: Duration::from_secs(120),
            summary_chunk_chars: None,
        }
    }
}

impl From<&Config> for PipelineConfig {
    fn from(config: &Config) -> Self {
        Self {
            api_key: config.openai_api_key(),
            base_url: config.openai_base_url().to_string(),
            transcription_model: config.openai_asr_model().to_string(),
            chat_model: config.openai_chat_model().to_string(),
            transcription_timeout: config.transcription_timeout(),
            summarization_timeout: config.summarization_timeout(),
            summary_chunk_chars: config.summary_chunk_chars,
        }
    }
}

/// Result of one pipeline run, returned verbatim to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PipelineResult {
    /// Name the upload was stored under.
    pub filename: String,
    pub transcript: String,
    pub summary: Summary,
}

/// Runs the pipeline for one uploaded file.
pub async fn run(upload: &UploadedFile, config: &PipelineConfig) -> Result<PipelineResult, Error> {
    let Some(api_key) = &config.api_key else {
        info!("Using mock transcript and summary because OPENAI_API_KEY is not set");
        return Ok(PipelineResult {
            filename: upload.stored_name.clone(),
            transcript: mock_transcript(&upload.original_name),
            summary: mock_summary(),
        });
    };

    let client = OpenAiClient::new(api_key, &config.base_url)?
        .with_models(&config.transcription_model, &config.chat_model)
        .with_timeouts(config.transcription_timeout, config.summarization_timeout)
        .with_summary_chunk_chars(config.summary_chunk_chars);

    run_with(&client, &client, upload).await
}

/// Runs the live path against the given providers. A failure in either stage is
/// returned as is; transcription failures skip summarization entirely.
pub async fn run_with(
    transcriber: &dyn transcription::Provider,
    summarizer: &dyn summarization::Provider,
    upload: &UploadedFile,
) -> Result<PipelineResult, Error> {
    let transcript = transcriber
        .transcribe(&upload.stored_path)
        .await
        .map_err(Error::transcription)?;
    info!("Transcript length: {}", transcript.len());

    let summary = summarizer
        .summarize(&transcript)
        .await
        .map_err(Error::summarization)?;

    Ok(PipelineResult {
        filename: upload.stored_name.clone(),
        transcript,
        summary,
    })
}

pub fn mock_transcript(original_name: &str) -> String {
    format!("MOCK TRANSCRIPT: Received file {original_name}. (No OPENAI_API_KEY set)")
}

pub fn mock_summary() -> Summary {
    Summary::Structured(StructuredSummary {
        short_summary: MOCK_SUMMARY_TEXT.to_string(),
        decisions: Vec::new(),
        action_items: Vec::new(),
        participants: Vec::new(),
        important_topics: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DomainErrorKind, ExternalErrorKind};
    use meeting_ai::traits::summarization::MockProvider as MockSummarizer;
    use meeting_ai::traits::transcription::MockProvider as MockTranscriber;
    use meeting_ai::Error as AiError;
    use mockito::Server;
    use serde_json::json;
    use std::io::Write;
    use std::path::PathBuf;

    fn uploaded_file() -> UploadedFile {
        UploadedFile {
            stored_path: PathBuf::from("/tmp/uploads/1700000000000_standup.m4a"),
            original_name: "standup.m4a".to_string(),
            stored_name: "1700000000000_standup.m4a".to_string(),
        }
    }

    #[tokio::test]
    async fn test_mock_path_without_credential() {
        let result = run(&uploaded_file(), &PipelineConfig::mock()).await.unwrap();

        assert_eq!(result.filename, "1700000000000_standup.m4a");
        assert!(result.transcript.contains("standup.m4a"));
        assert_eq!(
            serde_json::to_value(&result.summary).unwrap(),
            json!({
                "short_summary": MOCK_SUMMARY_TEXT,
                "decisions": [],
                "action_items": [],
                "participants": [],
                "important_topics": []
            })
        );
    }

    #[tokio::test]
    async fn test_mock_path_makes_no_network_calls() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", mockito::Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let config = PipelineConfig {
            base_url: server.url(),
            ..PipelineConfig::mock()
        };
        run(&uploaded_file(), &config).await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_run_with_sequences_transcription_then_summarization() {
        let upload = uploaded_file();

        let mut transcriber = MockTranscriber::new();
        transcriber
            .expect_transcribe()
            .withf(|path| path.to_str() == Some("/tmp/uploads/1700000000000_standup.m4a"))
            .times(1)
            .returning(|_| Ok("Alice: ship it".to_string()));

        let mut summarizer = MockSummarizer::new();
        summarizer
            .expect_summarize()
            .withf(|transcript| transcript.to_string() == "Alice: ship it")
            .times(1)
            .returning(|_| Ok(Summary::raw("not json")));

        let result = run_with(&transcriber, &summarizer, &upload).await.unwrap();

        assert_eq!(
            result,
            PipelineResult {
                filename: upload.stored_name.clone(),
                transcript: "Alice: ship it".to_string(),
                summary: Summary::raw("not json"),
            }
        );
    }

    #[tokio::test]
    async fn test_transcription_failure_skips_summarization() {
        let mut transcriber = MockTranscriber::new();
        transcriber.expect_transcribe().times(1).returning(|_| {
            Err(AiError::Upstream {
                status: 500,
                body: "upstream exploded".to_string(),
            })
        });

        let mut summarizer = MockSummarizer::new();
        summarizer.expect_summarize().times(0);

        let err = run_with(&transcriber, &summarizer, &uploaded_file())
            .await
            .unwrap_err();

        assert_eq!(
            err.error_kind,
            DomainErrorKind::External(ExternalErrorKind::Transcription)
        );
        assert_eq!(err.upstream_body(), Some("upstream exploded"));
    }

    #[tokio::test]
    async fn test_summarization_failure_propagates() {
        let mut transcriber = MockTranscriber::new();
        transcriber
            .expect_transcribe()
            .returning(|_| Ok("text".to_string()));

        let mut summarizer = MockSummarizer::new();
        summarizer
            .expect_summarize()
            .returning(|_| Err(AiError::Timeout("operation timed out".to_string())));

        let err = run_with(&transcriber, &summarizer, &uploaded_file())
            .await
            .unwrap_err();

        assert_eq!(
            err.error_kind,
            DomainErrorKind::External(ExternalErrorKind::Summarization)
        );
    }

    #[tokio::test]
    async fn test_live_path_against_stubbed_openai() {
        let mut server = Server::new_async().await;
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), b"audio").unwrap();

        let _transcription = server
            .mock("POST", "/audio/transcriptions")
            .with_status(200)
            .with_body(r#"{"text":"A"}"#)
            .create_async()
            .await;
        let _chat = server
            .mock("POST", "/chat/completions")
            .match_body(mockito::Matcher::PartialJson(json!({ "model": "gpt-4o" })))
            .with_status(200)
            .with_body(
                json!({ "choices": [{ "message": { "content": "not json" } }] }).to_string(),
            )
            .create_async()
            .await;

        let upload = UploadedFile {
            stored_path: file.path().to_path_buf(),
            original_name: "standup.m4a".to_string(),
            stored_name: "1700000000000_standup.m4a".to_string(),
        };
        let config = PipelineConfig {
            api_key: Some(SecretString::new("sk-test".to_string())),
            base_url: server.url(),
            chat_model: "gpt-4o".to_string(),
            ..PipelineConfig::mock()
        };

        let result = run(&upload, &config).await.unwrap();

        assert_eq!(result.transcript, "A");
        assert_eq!(result.summary, Summary::raw("not json"));
    }

    #[test]
    fn test_pipeline_config_from_service_config() {
        let config = Config::from_args([
            "meeting_summarizer_rs",
            "--openai-api-key",
            "sk-live",
            "--openai-chat-model",
            "gpt-4o",
            "--summary-chunk-chars",
            "5000",
        ]);

        let pipeline_config = PipelineConfig::from(&config);

        assert!(pipeline_config.api_key.is_some());
        assert_eq!(pipeline_config.chat_model, "gpt-4o");
        assert_eq!(pipeline_config.summary_chunk_chars, Some(5000));
    }

    #[tokio::test]
    async fn test_summarization_timeout_propagates_as_summarization_failure() {
        let mut server = Server::new_async().await;
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), b"audio").unwrap();

        let _transcription = server
            .mock("POST", "/audio/transcriptions")
            .with_status(200)
            .with_body(r#"{"text":"A"}"#)
            .create_async()
            .await;
        let _chat = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_chunked_body(|writer| {
                std::thread::sleep(Duration::from_secs(2));
                writer.write_all(b"{}")
            })
            .create_async()
            .await;

        let upload = UploadedFile {
            stored_path: file.path().to_path_buf(),
            original_name: "standup.m4a".to_string(),
            stored_name: "1700000000000_standup.m4a".to_string(),
        };
        let config = PipelineConfig {
            api_key: Some(SecretString::new("sk-test".to_string())),
            base_url: server.url(),
            summarization_timeout: Duration::from_millis(300),
            ..PipelineConfig::mock()
        };

        let err = run(&upload, &config).await.unwrap_err();

        assert_eq!(
            err.error_kind,
            DomainErrorKind::External(ExternalErrorKind::Summarization)
        );
        assert!(matches!(err.provider_error(), Some(AiError::Timeout(_))));
    }
}
