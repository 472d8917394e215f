//! LLM-backed generation for chat, journal prompts, quote cards and damage
//! analysis.
//!
//! None of these fail outright. A failed LLM call becomes an in-character
//! reply or a fixed fallback, and every interaction is logged under the
//! `moodybot::interactions` target.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::modes::ResolvedMode;
use crate::llms::base_llm::{ChatCompletion, ChatRequest, LlmMessage, Role};
use crate::types::records::{ChatMessage, MoodEntry};
use crate::utilities::json_repair::parse_json_safe;
use crate::utilities::post_process::post_process_moody_response;

/// Number of prior messages sent with each chat turn.
pub const HISTORY_WINDOW: usize = 10;

pub const DEFAULT_JOURNAL_PROMPT: &str = "What truth are you avoiding right now?";
pub const DEFAULT_QUOTE: &str = "You are not broken. You are breaking through.";
pub const DEFAULT_QUOTE_SOURCE: &str = "Born from your depths";

/// Tracing target for per-interaction events.
pub const INTERACTIONS: &str = "moodybot::interactions";

// ============================================================================
// Chat
// ============================================================================

/// Reply text for one chat turn.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatReply {
    pub text: String,
    /// False when `text` is an error message rather than a model reply.
    pub from_model: bool,
}

/// Build the provider conversation: system prompt, the last
/// [`HISTORY_WINDOW`] stored messages, then the new user message.
pub fn build_chat_messages(
    mode: &ResolvedMode,
    user_message: &str,
    history: &[ChatMessage],
) -> Vec<LlmMessage> {
    let start = history.len().saturating_sub(HISTORY_WINDOW);
    let mut messages = Vec::with_capacity(history.len() - start + 2);
    messages.push(LlmMessage::system(mode.config.system_prompt.clone()));
    messages.extend(history[start..].iter().map(|m| LlmMessage {
        role: Role::from_stored(&m.role),
        content: m.content.clone(),
    }));
    messages.push(LlmMessage::user(user_message));
    messages
}

pub async fn generate_chat_response(
    llm: &dyn ChatCompletion,
    model: &str,
    mode: &ResolvedMode,
    user_message: &str,
    history: &[ChatMessage],
    user_id: Option<i64>,
    session_id: i64,
) -> ChatReply {
    let request = ChatRequest::new(build_chat_messages(mode, user_message, history))
        .model(model)
        .temperature(mode.config.temperature)
        .max_tokens(mode.config.max_tokens);

    let reply = match llm.complete(request).await {
        Ok(raw) => ChatReply {
            text: post_process_moody_response(&raw),
            from_model: true,
        },
        Err(e) => {
            tracing::error!(error = %e, mode = %mode.name, "Chat completion failed");
            ChatReply {
                text: e.user_message().to_string(),
                from_model: false,
            }
        }
    };

    tracing::info!(
        target: INTERACTIONS,
        kind = "chat",
        mode = %mode.name,
        auto = mode.is_auto_selected,
        user = ?user_id,
        session = session_id,
        ok = reply.from_model,
        chars = reply.text.len(),
        "Chat interaction"
    );
    reply
}

// ============================================================================
// Journal prompt
// ============================================================================

pub async fn generate_journal_prompt(
    llm: &dyn ChatCompletion,
    model: &str,
    mood: Option<&str>,
) -> String {
    let mood_context = mood
        .filter(|m| !m.trim().is_empty())
        .map(|m| format!("The user's current mood is: {}.", m))
        .unwrap_or_default();

    let request = ChatRequest::new(vec![
        LlmMessage::system(format!(
            "You are a dark journaling prompt generator. Create deeply probing, uncomfortable \
             questions that force genuine self-reflection. No toxic positivity - embrace the \
             shadow. Questions should be psychologically challenging and designed to uncover \
             hidden truths. {} Generate one powerful, unsettling prompt.",
            mood_context
        )),
        LlmMessage::user("Generate a dark journaling prompt that cuts deep."),
    ])
    .model(model)
    .temperature(0.8)
    .max_tokens(100)
    .fallback(DEFAULT_JOURNAL_PROMPT);

    let prompt = llm.complete(request).await.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Journal prompt generation failed");
        DEFAULT_JOURNAL_PROMPT.to_string()
    });

    tracing::info!(target: INTERACTIONS, kind = "journal_prompt", mood = ?mood, "Journal prompt");
    prompt
}

// ============================================================================
// Quote card
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteDraft {
    pub quote: String,
    pub source: String,
}

impl Default for QuoteDraft {
    fn default() -> Self {
        Self {
            quote: DEFAULT_QUOTE.to_string(),
            source: DEFAULT_QUOTE_SOURCE.to_string(),
        }
    }
}

fn non_empty_str(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

pub async fn generate_quote_card(
    llm: &dyn ChatCompletion,
    model: &str,
    journal_content: &str,
    user_id: i64,
) -> QuoteDraft {
    let request = ChatRequest::new(vec![
        LlmMessage::system(
            "You are a quote generator that transforms raw, honest journal entries into \
             powerful, shareable quotes. Extract the deepest truth from the user's writing and \
             turn it into a profound, dark, poetic quote that captures their essence. The quote \
             should be raw, authentic, and emotionally resonant. Also generate a creative source \
             attribution that references when or how this insight emerged. Respond in JSON \
             format with \"quote\" and \"source\" fields.",
        ),
        LlmMessage::user(format!(
            "Transform this journal entry into a powerful quote: {}",
            journal_content
        )),
    ])
    .model(model)
    .temperature(0.8)
    .max_tokens(150)
    .json_mode()
    .fallback("{}");

    let defaults = QuoteDraft::default();
    let draft = match llm.complete(request).await {
        Ok(text) => {
            let value = parse_json_safe(&text).unwrap_or(Value::Null);
            QuoteDraft {
                quote: non_empty_str(&value, "quote").unwrap_or(defaults.quote),
                source: non_empty_str(&value, "source").unwrap_or(defaults.source),
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "Quote generation failed");
            defaults
        }
    };

    tracing::info!(target: INTERACTIONS, kind = "quote", user = user_id, "Quote card generated");
    draft
}

// ============================================================================
// Damage analysis
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DamageAnalysis {
    pub patterns: Vec<Value>,
    pub triggers: Vec<Value>,
    pub loops: Vec<Value>,
}

fn array_field(value: &Value, key: &str) -> Vec<Value> {
    value
        .get(key)
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}

pub async fn analyze_damage_patterns(
    llm: &dyn ChatCompletion,
    model: &str,
    journal_entries: &[String],
    moods: &[MoodEntry],
    user_id: i64,
) -> DamageAnalysis {
    let mood_data: Vec<Value> = moods
        .iter()
        .map(|m| serde_json::json!({ "mood": m.mood, "intensity": m.intensity, "notes": m.notes }))
        .collect();

    let request = ChatRequest::new(vec![
        LlmMessage::system(
            "You are a psychological pattern analyst. Analyze the user's journal entries and \
             mood data to identify destructive patterns, triggers, and emotional loops. Be \
             brutally honest about what you see. Look for self-sabotage, avoidance behaviors, \
             relationship patterns, and recurring themes. Respond in JSON format with arrays for \
             \"patterns\", \"triggers\", and \"loops\". Each item should have \"name\", \
             \"description\", and \"frequency\" fields.",
        ),
        LlmMessage::user(format!(
            "Analyze these journal entries: {}\n\nAnd this mood data: {}",
            journal_entries.join("\n---\n"),
            Value::Array(mood_data)
        )),
    ])
    .model(model)
    .temperature(0.7)
    .max_tokens(500)
    .json_mode()
    .fallback("{}");

    let analysis = match llm.complete(request).await {
        Ok(text) => {
            let value = parse_json_safe(&text).unwrap_or(Value::Null);
            DamageAnalysis {
                patterns: array_field(&value, "patterns"),
                triggers: array_field(&value, "triggers"),
                loops: array_field(&value, "loops"),
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "Damage analysis failed");
            DamageAnalysis::default()
        }
    };

    tracing::info!(
        target: INTERACTIONS,
        kind = "damage_analysis",
        user = user_id,
        entries = journal_entries.len(),
        moods = moods.len(),
        patterns = analysis.patterns.len(),
        "Damage analysis"
    );
    analysis
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::modes::resolve_mode;
    use crate::utilities::errors::LlmError;
    use async_trait::async_trait;
    use chrono::Utc;
    use parking_lot::Mutex;

    /// Replays a fixed reply and records the last request.
    struct Recorder {
        reply: Result<String, fn() -> LlmError>,
        last: Mutex<Option<ChatRequest>>,
    }

    impl Recorder {
        fn ok(reply: &str) -> Self {
            Self { reply: Ok(reply.to_string()), last: Mutex::new(None) }
        }

        fn failing(err: fn() -> LlmError) -> Self {
            Self { reply: Err(err), last: Mutex::new(None) }
        }

        fn last(&self) -> ChatRequest {
            self.last.lock().clone().unwrap()
        }
    }

    #[async_trait]
    impl ChatCompletion for Recorder {
        async fn complete(&self, request: ChatRequest) -> Result<String, LlmError> {
            *self.last.lock() = Some(request);
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(make) => Err(make()),
            }
        }
    }

    fn history(n: usize) -> Vec<ChatMessage> {
        (0..n)
            .map(|i| ChatMessage {
                id: i as i64 + 1,
                session_id: 1,
                role: if i % 2 == 0 { "user" } else { "assistant" }.into(),
                content: format!("m{}", i),
                timestamp: Utc::now(),
            })
            .collect()
    }

    #[test]
    fn test_history_window() {
        let mode = resolve_mode(Some("savage"), "", "").unwrap();
        let messages = build_chat_messages(&mode, "now", &history(14));
        assert_eq!(messages.len(), HISTORY_WINDOW + 2);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[1].content, "m4");
        assert_eq!(messages.last().unwrap().content, "now");

        let messages = build_chat_messages(&mode, "now", &[]);
        assert_eq!(messages.len(), 2);
    }

    #[tokio::test]
    async fn test_chat_reply_is_post_processed() {
        let llm = Recorder::ok("Ah, darling. You know.");
        let mode = resolve_mode(Some("oracle"), "", "").unwrap();
        let reply = generate_chat_response(&llm, "m", &mode, "hi", &[], Some(1), 1).await;
        assert!(reply.from_model);
        assert!(reply.text.starts_with("volatile angel. You know.\n\n🥃 @MoodyBotAI"));
        let sent = llm.last();
        assert_eq!(sent.temperature, 0.9);
        assert_eq!(sent.max_tokens, 200);
        assert_eq!(sent.model.as_deref(), Some("m"));
    }

    #[tokio::test]
    async fn test_chat_failure_is_in_character() {
        let llm = Recorder::failing(|| LlmError::RateLimited);
        let mode = resolve_mode(Some("savage"), "", "").unwrap();
        let reply = generate_chat_response(&llm, "m", &mode, "hi", &[], None, 1).await;
        assert!(!reply.from_model);
        assert_eq!(
            reply.text,
            "MoodyBot is getting too many requests. Please try again in a moment."
        );
    }

    #[tokio::test]
    async fn test_journal_prompt_mood_and_fallback() {
        let llm = Recorder::ok("What are you pretending not to know?");
        let prompt = generate_journal_prompt(&llm, "m", Some("restless")).await;
        assert_eq!(prompt, "What are you pretending not to know?");
        let sent = llm.last();
        assert!(sent.messages[0].content.contains("The user's current mood is: restless."));
        assert_eq!(sent.max_tokens, 100);

        let failing = Recorder::failing(|| LlmError::MissingApiKey);
        assert_eq!(
            generate_journal_prompt(&failing, "m", None).await,
            DEFAULT_JOURNAL_PROMPT
        );
    }

    #[tokio::test]
    async fn test_quote_card_parsing() {
        let llm = Recorder::ok(r#"{"quote": "Ash is proof you burned.", "source": "3AM"}"#);
        let draft = generate_quote_card(&llm, "m", "entry", 1).await;
        assert_eq!(draft.quote, "Ash is proof you burned.");
        assert_eq!(draft.source, "3AM");
        assert!(llm.last().json_mode);

        // partial reply keeps the default for the missing field
        let llm = Recorder::ok(r#"{"quote": "Only this."}"#);
        let draft = generate_quote_card(&llm, "m", "entry", 1).await;
        assert_eq!(draft.source, DEFAULT_QUOTE_SOURCE);

        let llm = Recorder::ok("nonsense");
        assert_eq!(generate_quote_card(&llm, "m", "entry", 1).await, QuoteDraft::default());
    }

    #[tokio::test]
    async fn test_damage_analysis() {
        let llm = Recorder::ok(
            r#"{"patterns": [{"name": "avoidance"}], "triggers": [], "loops": "oops"}"#,
        );
        let moods = vec![MoodEntry {
            id: 1,
            user_id: 1,
            mood: "numb".into(),
            intensity: 7,
            notes: None,
            created_at: Utc::now(),
        }];
        let analysis =
            analyze_damage_patterns(&llm, "m", &["entry one".to_string()], &moods, 1).await;
        assert_eq!(analysis.patterns.len(), 1);
        assert!(analysis.loops.is_empty());
        let sent = llm.last();
        assert!(sent.messages[1].content.contains("entry one"));
        assert!(sent.messages[1].content.contains("\"numb\""));

        let failing = Recorder::failing(|| LlmError::CircuitOpen);
        let analysis = analyze_damage_patterns(&failing, "m", &[], &[], 1).await;
        assert_eq!(analysis, DamageAnalysis::default());
    }
}
