//! Chat-model providers and LLM-backed collaborators for the stepwise
//! engine.
//!
//! The [`ChatModel`] trait abstracts one blocking chat completion;
//! [`OpenAiChatModel`] implements it for any OpenAI-compatible endpoint
//! (api.openai.com, Groq, or a local proxy via a custom base URL).
//! [`LlmPlanner`] and [`LlmSynthesizer`] turn any chat model into the
//! engine's planning and synthesis collaborators.

#![warn(missing_docs, clippy::pedantic)]

mod http_client;
pub mod openai;
pub mod planner;
pub mod synthesizer;
pub mod traits;

pub use openai::{OPENAI_API_KEY_ENV, OpenAiChatModel, OpenAiConfig};
pub use planner::LlmPlanner;
pub use synthesizer::LlmSynthesizer;
pub use traits::{
    AdapterError, AdapterResult, ChatMessage, ChatModel, ChatRequest, MessageRole, ModelMetadata,
};
