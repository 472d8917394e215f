//! # MoodyBot
//!
//! Backend for MoodyBot, a conversational assistant with a deliberately
//! blunt voice. It serves chat sessions in several personality modes,
//! journaling prompts, quote cards, mood tracking, damage-pattern analysis
//! and validation messages over an axum HTTP API, backed by an
//! OpenRouter-compatible chat completion client.
//!
//! The [`persona`] engine picks response personas from the emotional signals
//! in a message; its stack maps onto a chat mode.

pub mod chat;
pub mod llms;
pub mod persona;
pub mod server;
pub mod storage;
pub mod types;
pub mod utilities;

pub use llms::base_llm::{ChatCompletion, ChatRequest};
pub use persona::{PersonaAnalysis, PersonaEngine};
pub use server::{app_router, AppState};
pub use storage::{MemStorage, Storage};
pub use utilities::config::AppConfig;

/// Library version reported by `/health`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
