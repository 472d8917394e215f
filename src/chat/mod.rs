//! Chat generation.
//!
//! ```text
//! POST /api/chat/messages
//!   → modes::resolve_mode        (explicit, session, or auto from keywords)
//!   → handler::generate_chat_response
//!       system prompt + last 10 messages → ChatCompletion
//!       → post_process (openers, polish, descriptors, sign-offs, signature, CTA)
//! ```
//!
//! Journal prompts, quote cards, damage analysis and validation text go
//! through the same [`ChatCompletion`](crate::llms::ChatCompletion) seam and
//! fall back to fixed content when the call fails.

pub mod fallback;
pub mod handler;
pub mod modes;
pub mod validation;

pub use handler::{ChatReply, DamageAnalysis, QuoteDraft};
pub use modes::{resolve_mode, select_mode_from_message, ChatModeConfig, ResolvedMode};
pub use validation::{ValidationOutcome, ValidationRequest, ValidationResponse};
