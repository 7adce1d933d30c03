//! AI provider adapters and their shared prompt/parsing pieces.

pub mod config;
pub mod gemini;
pub mod openai;
pub mod parsing;
pub mod prompt;

pub use config::{ProviderSettings, ProvidersConfig};
pub use gemini::GeminiClient;
pub use openai::OpenAiCompatClient;
