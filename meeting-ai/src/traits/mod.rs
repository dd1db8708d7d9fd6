pub mod summarization;
pub mod transcription;
