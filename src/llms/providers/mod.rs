//! LLM provider implementations.
//!
//! Each provider implements [`ChatCompletion`](crate::llms::base_llm::ChatCompletion).

pub mod openrouter;

pub use openrouter::OpenRouterCompletion;
