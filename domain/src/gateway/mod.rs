pub mod chunking;
pub mod openai;
