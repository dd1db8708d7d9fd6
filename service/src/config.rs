use clap::builder::TypedValueParser as _;
use clap::Parser;
use dotenvy::dotenv;
use log::LevelFilter;
use secrecy::SecretString;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default OpenAI API base URL used when `OPENAI_BASE_URL` is not set.
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Default speech-to-text model.
pub const DEFAULT_ASR_MODEL: &str = "whisper-1";

/// Default chat completion model used for summaries.
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4o-mini";

#[derive(Clone, Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// A list of full CORS origin URLs that allowed to receive server responses.
    /// A single `*` allows any origin.
    #[arg(
        long,
        env,
        value_delimiter = ',',
        use_value_delimiter = true,
        default_value = "*"
    )]
    pub allowed_origins: Vec<String>,

    /// Directory where uploaded recordings are written. Created on startup if missing.
    #[arg(long, env, default_value = "uploads")]
    upload_dir: PathBuf,

    /// Largest accepted upload body in bytes.
    #[arg(long, env, default_value_t = 512 * 1024 * 1024)]
    pub max_upload_bytes: usize,

    /// The API key to use when calling the OpenAI API. When unset, the
    /// pipeline returns mock transcripts and summaries.
    #[arg(long, env, hide_env_values = true)]
    openai_api_key: Option<String>,

    /// The base URL of the OpenAI API.
    /// Override in tests to point at a mock server.
    #[arg(long, env, default_value = DEFAULT_OPENAI_BASE_URL)]
    openai_base_url: String,

    /// Speech-to-text model used for transcription.
    #[arg(long, env, default_value = DEFAULT_ASR_MODEL)]
    openai_asr_model: String,

    /// Chat completion model used for summarization.
    #[arg(long, env, default_value = DEFAULT_CHAT_MODEL)]
    openai_chat_model: String,

    /// Timeout in seconds for a single transcription request
    #[arg(long, env, default_value_t = 300)]
    pub transcription_timeout_secs: u64,

    /// Timeout in seconds for a single summarization request
    #[arg(long, env, default_value_t = 120)]
    pub summarization_timeout_secs: u64,

    /// Split transcripts longer than this many characters into chunks that are
    /// summarized separately and then merged. Unset sends the whole transcript at once.
    #[arg(long, env)]
    pub summary_chunk_chars: Option<usize>,

    /// The host interface to listen for incoming connections
    #[arg(short, long, env, default_value = "0.0.0.0")]
    pub interface: Option<String>,

    /// The host TCP port to listen for incoming connections
    #[arg(short, long, env, default_value_t = 8000)]
    pub port: u16,

    /// Set the log level verbosity threshold (level) to control what gets displayed on console output
    #[arg(
        short,
        long,
        env,
        default_value_t = LevelFilter::Info,
        value_parser = clap::builder::PossibleValuesParser::new(["OFF", "ERROR", "WARN", "INFO", "DEBUG", "TRACE"])
            .map(|s| s.parse::<LevelFilter>().unwrap()),
        )]
    pub log_level_filter: LevelFilter,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        // Load .env file first
        dotenv().ok();
        // Then parse the command line parameters and flags
        Config::parse()
    }

    /// Builds a config from explicit arguments only, ignoring the process
    /// command line. Environment variables still apply.
    pub fn from_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Config::parse_from(args)
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    pub fn set_upload_dir(mut self, upload_dir: PathBuf) -> Self {
        self.upload_dir = upload_dir;
        self
    }

    /// Returns the OpenAI API key, if configured. A blank value counts as unset.
    pub fn openai_api_key(&self) -> Option<SecretString> {
        self.openai_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(|key| SecretString::new(key.to_string()))
    }

    pub fn set_openai_api_key(mut self, api_key: Option<String>) -> Self {
        self.openai_api_key = api_key;
        self
    }

    /// Returns the OpenAI API base URL.
    pub fn openai_base_url(&self) -> &str {
        &self.openai_base_url
    }

    pub fn set_openai_base_url(mut self, base_url: String) -> Self {
        self.openai_base_url = base_url;
        self
    }

    pub fn openai_asr_model(&self) -> &str {
        &self.openai_asr_model
    }

    pub fn openai_chat_model(&self) -> &str {
        &self.openai_chat_model
    }

    pub fn transcription_timeout(&self) -> Duration {
        Duration::from_secs(self.transcription_timeout_secs)
    }

    pub fn summarization_timeout(&self) -> Duration {
        Duration::from_secs(self.summarization_timeout_secs)
    }

    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|origin| origin.trim() == "*")
    }
}
