//! Stored records and their insert payloads.
//!
//! Field names are camelCase on the wire. Timestamps are UTC.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub type RecordId = i64;

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: RecordId,
    pub username: String,
    /// Never sent back to clients.
    #[serde(skip_serializing, default)]
    pub password: String,
    pub question_count: u32,
    pub is_subscribed: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertUser {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub question_count: u32,
    #[serde(default)]
    pub is_subscribed: bool,
}

// ---------------------------------------------------------------------------
// Chat
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSession {
    pub id: RecordId,
    pub user_id: RecordId,
    /// Chat mode name, e.g. "savage".
    pub mode: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertChatSession {
    pub user_id: RecordId,
    pub mode: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: RecordId,
    pub session_id: RecordId,
    /// "user" or "assistant".
    pub role: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertChatMessage {
    pub session_id: RecordId,
    pub role: String,
    pub content: String,
}

// ---------------------------------------------------------------------------
// Journal, quotes, mood
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    pub id: RecordId,
    pub user_id: RecordId,
    pub prompt: String,
    pub content: String,
    pub mood: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertJournalEntry {
    pub user_id: RecordId,
    pub prompt: String,
    pub content: String,
    #[serde(default)]
    pub mood: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteCard {
    pub id: RecordId,
    pub user_id: RecordId,
    pub quote: String,
    pub source: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertQuoteCard {
    pub user_id: RecordId,
    pub quote: String,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodEntry {
    pub id: RecordId,
    pub user_id: RecordId,
    pub mood: String,
    /// 1 to 10.
    pub intensity: u8,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertMoodEntry {
    pub user_id: RecordId,
    pub mood: String,
    pub intensity: u8,
    #[serde(default)]
    pub notes: Option<String>,
}

impl InsertMoodEntry {
    pub const MIN_INTENSITY: u8 = 1;
    pub const MAX_INTENSITY: u8 = 10;

    pub fn intensity_in_range(&self) -> bool {
        (Self::MIN_INTENSITY..=Self::MAX_INTENSITY).contains(&self.intensity)
    }
}

// ---------------------------------------------------------------------------
// Damage profile and reflection stacks
// ---------------------------------------------------------------------------

/// Patterns, triggers and loops inferred from a user's journal and mood data.
/// Items are free-form JSON as produced by the analysis call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DamageProfile {
    pub id: RecordId,
    pub user_id: RecordId,
    pub patterns: Vec<Value>,
    pub triggers: Vec<Value>,
    pub loops: Vec<Value>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertDamageProfile {
    pub user_id: RecordId,
    #[serde(default)]
    pub patterns: Vec<Value>,
    #[serde(default)]
    pub triggers: Vec<Value>,
    #[serde(default)]
    pub loops: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReflectionStack {
    pub id: RecordId,
    pub title: String,
    pub description: String,
    pub prompts: Vec<String>,
    /// Seconds.
    pub duration: u32,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertReflectionStack {
    pub title: String,
    pub description: String,
    pub prompts: Vec<String>,
    pub duration: u32,
    pub category: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_password_not_serialized() {
        let user = User {
            id: 1,
            username: "moody".into(),
            password: "hunter2".into(),
            question_count: 3,
            is_subscribed: false,
            created_at: Utc::now(),
        };
        let value = serde_json::to_value(&user).unwrap();
        assert!(value.get("password").is_none());
        assert_eq!(value["questionCount"], 3);
        assert_eq!(value["isSubscribed"], false);
    }

    #[test]
    fn test_insert_defaults() {
        let user: InsertUser =
            serde_json::from_value(json!({"username": "a", "password": "b"})).unwrap();
        assert_eq!(user.question_count, 0);
        assert!(!user.is_subscribed);

        let quote: InsertQuoteCard =
            serde_json::from_value(json!({"userId": 1, "quote": "q"})).unwrap();
        assert_eq!(quote.source, None);
    }

    #[test]
    fn test_mood_intensity_range() {
        let mut mood = InsertMoodEntry {
            user_id: 1,
            mood: "numb".into(),
            intensity: 10,
            notes: None,
        };
        assert!(mood.intensity_in_range());
        mood.intensity = 0;
        assert!(!mood.intensity_in_range());
        mood.intensity = 11;
        assert!(!mood.intensity_in_range());
    }
}
