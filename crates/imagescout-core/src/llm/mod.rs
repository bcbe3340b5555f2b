//! Model provider integration.
//!
//! Provides the provider abstraction the pipeline stages call and the
//! OpenAI-compatible chat-completions implementation.

pub(crate) mod openai;
pub(crate) mod provider;

pub use openai::OpenAiProvider;
pub use provider::{LlmProvider, LlmProviderFactory, LlmRequest, LlmResponse};
