//! LLM access for MoodyBot.
//!
//! - [`base_llm`] - the [`ChatCompletion`] trait and request/message types
//! - [`providers`] - concrete providers (OpenRouter)

pub mod base_llm;
pub mod providers;

pub use base_llm::{ChatCompletion, ChatRequest, LlmMessage, Role};
pub use providers::OpenRouterCompletion;
