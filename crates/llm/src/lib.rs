//! Contract Risk LLM
//!
//! Provides a unified interface for sending a contract document to a
//! language model and getting structured JSON back:
//! - Google Gemini (`responseSchema`)
//! - Anthropic Claude (forced tool call)
//!
//! Also includes the HTTP client factory shared by both providers.

pub mod anthropic;
pub mod gemini;
pub mod http_client;
pub mod provider;
pub mod types;

// Re-export main types
pub use anthropic::AnthropicProvider;
pub use gemini::GeminiProvider;
pub use http_client::build_http_client;
pub use provider::{create_provider, LlmProvider};
pub use types::*;
