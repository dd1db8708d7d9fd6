use log::*;
use service::{config::Config, logging::Logger, AppState};

#[tokio::main]
async fn main() {
    let config = Config::new();
    if let Err(e) = Logger::init_logger(&config) {
        eprintln!("Failed to start logger: {e}");
    }

    info!("Starting up Meeting Summarizer...");

    if config.openai_api_key().is_none() {
        warn!("OPENAI_API_KEY is not set, uploads will receive mock transcripts and summaries");
    }
    debug!(
        "Using transcription model {} and chat model {} at {}",
        config.openai_asr_model(),
        config.openai_chat_model(),
        config.openai_base_url()
    );

    let app_state = AppState::new(config);

    if let Err(e) = web::init_server(app_state).await {
        error!("Server stopped: {e}");
        std::process::exit(1);
    }
}
