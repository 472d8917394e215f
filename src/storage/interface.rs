//! Storage interface for MoodyBot records.

use async_trait::async_trait;

use crate::types::records::{
    ChatMessage, ChatSession, DamageProfile, InsertChatMessage, InsertChatSession,
    InsertDamageProfile, InsertJournalEntry, InsertMoodEntry, InsertQuoteCard,
    InsertReflectionStack, InsertUser, JournalEntry, MoodEntry, QuoteCard, RecordId,
    ReflectionStack, User,
};
use crate::utilities::errors::StoreError;

/// Record store. All backends must implement this trait.
///
/// Per-user lists of journal entries, quotes and mood entries come back
/// newest first; chat messages come back oldest first.
#[async_trait]
pub trait Storage: Send + Sync {
    // users
    async fn get_user(&self, id: RecordId) -> Result<Option<User>, StoreError>;
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;
    /// Fails with [`StoreError::UsernameTaken`] on a duplicate username.
    async fn create_user(&self, user: InsertUser) -> Result<User, StoreError>;

    // chat sessions
    async fn get_chat_session(&self, id: RecordId) -> Result<Option<ChatSession>, StoreError>;
    async fn get_chat_sessions_by_user(
        &self,
        user_id: RecordId,
    ) -> Result<Vec<ChatSession>, StoreError>;
    async fn create_chat_session(
        &self,
        session: InsertChatSession,
    ) -> Result<ChatSession, StoreError>;

    // chat messages
    async fn get_chat_messages(&self, session_id: RecordId) -> Result<Vec<ChatMessage>, StoreError>;
    /// Fails with [`StoreError::NotFound`] if the session does not exist.
    async fn create_chat_message(
        &self,
        message: InsertChatMessage,
    ) -> Result<ChatMessage, StoreError>;

    // journal
    async fn get_journal_entries(&self, user_id: RecordId)
        -> Result<Vec<JournalEntry>, StoreError>;
    async fn create_journal_entry(
        &self,
        entry: InsertJournalEntry,
    ) -> Result<JournalEntry, StoreError>;

    // quotes
    async fn get_quote_cards(&self, user_id: RecordId) -> Result<Vec<QuoteCard>, StoreError>;
    async fn create_quote_card(&self, card: InsertQuoteCard) -> Result<QuoteCard, StoreError>;

    // mood
    async fn get_mood_entries(&self, user_id: RecordId) -> Result<Vec<MoodEntry>, StoreError>;
    async fn create_mood_entry(&self, mood: InsertMoodEntry) -> Result<MoodEntry, StoreError>;

    // damage profile
    async fn get_damage_profile(
        &self,
        user_id: RecordId,
    ) -> Result<Option<DamageProfile>, StoreError>;
    /// Replace the user's profile, keeping its id, or create one.
    async fn upsert_damage_profile(
        &self,
        profile: InsertDamageProfile,
    ) -> Result<DamageProfile, StoreError>;

    // reflection stacks
    async fn get_reflection_stacks(&self) -> Result<Vec<ReflectionStack>, StoreError>;
    async fn create_reflection_stack(
        &self,
        stack: InsertReflectionStack,
    ) -> Result<ReflectionStack, StoreError>;
}
