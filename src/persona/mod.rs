//! Persona engine — heuristic selection of response personas from user text.
//!
//! # Architecture
//!
//! ```text
//! user text
//!   ↓  signals::detect_emotional_state   (keyword scores + content/tone)
//! EmotionalState
//!   ↓  selector::select                  (priority ladder, pairing table,
//!   ↓                                     tertiary carry-over from history)
//! PersonaStack
//!   ↓  explain::explain                  (confidence + reasoning)
//! PersonaAnalysis  →  stack.mode() is sent as the chat mode
//! ```
//!
//! Everything above the [`HistoryStore`] is pure. The store is injected into
//! [`PersonaEngine`] so tests can run against isolated instances.

pub mod catalog;
pub mod engine;
pub mod explain;
pub mod history;
pub mod selector;
pub mod signals;

pub use catalog::{Persona, PersonaId, UnknownPersona, PERSONAS};
pub use engine::{PersonaAnalysis, PersonaEngine};
pub use history::HistoryStore;
pub use selector::PersonaStack;
pub use signals::{ContentType, EmotionalState, Tone};
