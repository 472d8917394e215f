//! Shared data types.

pub mod records;

pub use records::{
    ChatMessage, ChatSession, DamageProfile, InsertChatMessage, InsertChatSession,
    InsertDamageProfile, InsertJournalEntry, InsertMoodEntry, InsertQuoteCard,
    InsertReflectionStack, InsertUser, JournalEntry, MoodEntry, QuoteCard, RecordId,
    ReflectionStack, User,
};
