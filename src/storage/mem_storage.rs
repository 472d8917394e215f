//! In-memory [`Storage`] backend.
//!
//! Tables are `BTreeMap`s behind a single `parking_lot::RwLock`, so ids
//! iterate in insertion order. Ids start at 1 per table. Nothing persists
//! past process exit.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;

use super::interface::Storage;
use crate::types::records::{
    ChatMessage, ChatSession, DamageProfile, InsertChatMessage, InsertChatSession,
    InsertDamageProfile, InsertJournalEntry, InsertMoodEntry, InsertQuoteCard,
    InsertReflectionStack, InsertUser, JournalEntry, MoodEntry, QuoteCard, RecordId,
    ReflectionStack, User,
};
use crate::utilities::errors::StoreError;

/// A table with its own id counter.
#[derive(Debug)]
struct Table<T> {
    rows: BTreeMap<RecordId, T>,
    next_id: RecordId,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self { rows: BTreeMap::new(), next_id: 1 }
    }
}

impl<T: Clone> Table<T> {
    fn insert_with(&mut self, build: impl FnOnce(RecordId) -> T) -> T {
        let id = self.next_id;
        self.next_id += 1;
        let row = build(id);
        self.rows.insert(id, row.clone());
        row
    }

    fn filtered(&self, keep: impl Fn(&T) -> bool) -> Vec<T> {
        self.rows.values().filter(|row| keep(row)).cloned().collect()
    }
}

#[derive(Debug, Default)]
struct Tables {
    users: Table<User>,
    sessions: Table<ChatSession>,
    messages: Table<ChatMessage>,
    journal: Table<JournalEntry>,
    quotes: Table<QuoteCard>,
    moods: Table<MoodEntry>,
    damage: Table<DamageProfile>,
    stacks: Table<ReflectionStack>,
}

#[derive(Debug)]
pub struct MemStorage {
    tables: RwLock<Tables>,
}

impl Default for MemStorage {
    fn default() -> Self {
        Self::new()
    }
}

/// Reflection stacks every new store starts with.
pub fn default_reflection_stacks() -> Vec<InsertReflectionStack> {
    fn stack(title: &str, description: &str, prompts: [&str; 3], category: &str) -> InsertReflectionStack {
        InsertReflectionStack {
            title: title.into(),
            description: description.into(),
            prompts: prompts.iter().map(|p| p.to_string()).collect(),
            duration: 60,
            category: category.into(),
        }
    }

    vec![
        stack(
            "LATE NIGHT SPIRAL",
            "Face the 3AM thoughts",
            [
                "What truth are you avoiding right now?",
                "What pattern keeps you awake?",
                "What would you tell your past self about this moment?",
            ],
            "night",
        ),
        stack(
            "SHAME INVENTORY",
            "What are you hiding?",
            [
                "What are you most ashamed of?",
                "Who would you be without this shame?",
                "What story do you tell yourself about your worth?",
            ],
            "shadow",
        ),
        stack(
            "PATTERN BREAK",
            "Interrupt the loop",
            [
                "What loop are you stuck in?",
                "What would happen if you stopped?",
                "What are you gaining from this pattern?",
            ],
            "patterns",
        ),
    ]
}

impl MemStorage {
    /// Store seeded with [`default_reflection_stacks`].
    pub fn new() -> Self {
        let mut tables = Tables::default();
        for stack in default_reflection_stacks() {
            tables.stacks.insert_with(|id| reflection_stack(id, stack));
        }
        Self { tables: RwLock::new(tables) }
    }

    /// Store with no seed data.
    pub fn empty() -> Self {
        Self { tables: RwLock::new(Tables::default()) }
    }
}

fn reflection_stack(id: RecordId, stack: InsertReflectionStack) -> ReflectionStack {
    ReflectionStack {
        id,
        title: stack.title,
        description: stack.description,
        prompts: stack.prompts,
        duration: stack.duration,
        category: stack.category,
    }
}

#[async_trait]
impl Storage for MemStorage {
    async fn get_user(&self, id: RecordId) -> Result<Option<User>, StoreError> {
        Ok(self.tables.read().users.rows.get(&id).cloned())
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .tables
            .read()
            .users
            .rows
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn create_user(&self, user: InsertUser) -> Result<User, StoreError> {
        let mut tables = self.tables.write();
        if tables.users.rows.values().any(|u| u.username == user.username) {
            return Err(StoreError::UsernameTaken(user.username));
        }
        Ok(tables.users.insert_with(|id| User {
            id,
            username: user.username,
            password: user.password,
            question_count: user.question_count,
            is_subscribed: user.is_subscribed,
            created_at: Utc::now(),
        }))
    }

    async fn get_chat_session(&self, id: RecordId) -> Result<Option<ChatSession>, StoreError> {
        Ok(self.tables.read().sessions.rows.get(&id).cloned())
    }

    async fn get_chat_sessions_by_user(
        &self,
        user_id: RecordId,
    ) -> Result<Vec<ChatSession>, StoreError> {
        Ok(self.tables.read().sessions.filtered(|s| s.user_id == user_id))
    }

    async fn create_chat_session(
        &self,
        session: InsertChatSession,
    ) -> Result<ChatSession, StoreError> {
        Ok(self.tables.write().sessions.insert_with(|id| ChatSession {
            id,
            user_id: session.user_id,
            mode: session.mode,
            title: session.title,
            created_at: Utc::now(),
        }))
    }

    async fn get_chat_messages(&self, session_id: RecordId) -> Result<Vec<ChatMessage>, StoreError> {
        let mut messages = self
            .tables
            .read()
            .messages
            .filtered(|m| m.session_id == session_id);
        messages.sort_by_key(|m| (m.timestamp, m.id));
        Ok(messages)
    }

    async fn create_chat_message(
        &self,
        message: InsertChatMessage,
    ) -> Result<ChatMessage, StoreError> {
        let mut tables = self.tables.write();
        if !tables.sessions.rows.contains_key(&message.session_id) {
            return Err(StoreError::NotFound { entity: "Session", id: message.session_id });
        }
        Ok(tables.messages.insert_with(|id| ChatMessage {
            id,
            session_id: message.session_id,
            role: message.role,
            content: message.content,
            timestamp: Utc::now(),
        }))
    }

    async fn get_journal_entries(
        &self,
        user_id: RecordId,
    ) -> Result<Vec<JournalEntry>, StoreError> {
        let mut entries = self.tables.read().journal.filtered(|e| e.user_id == user_id);
        entries.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(entries)
    }

    async fn create_journal_entry(
        &self,
        entry: InsertJournalEntry,
    ) -> Result<JournalEntry, StoreError> {
        Ok(self.tables.write().journal.insert_with(|id| JournalEntry {
            id,
            user_id: entry.user_id,
            prompt: entry.prompt,
            content: entry.content,
            mood: entry.mood,
            created_at: Utc::now(),
        }))
    }

    async fn get_quote_cards(&self, user_id: RecordId) -> Result<Vec<QuoteCard>, StoreError> {
        let mut cards = self.tables.read().quotes.filtered(|c| c.user_id == user_id);
        cards.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(cards)
    }

    async fn create_quote_card(&self, card: InsertQuoteCard) -> Result<QuoteCard, StoreError> {
        Ok(self.tables.write().quotes.insert_with(|id| QuoteCard {
            id,
            user_id: card.user_id,
            quote: card.quote,
            source: card.source,
            image_url: card.image_url,
            created_at: Utc::now(),
        }))
    }

    async fn get_mood_entries(&self, user_id: RecordId) -> Result<Vec<MoodEntry>, StoreError> {
        let mut moods = self.tables.read().moods.filtered(|m| m.user_id == user_id);
        moods.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(moods)
    }

    async fn create_mood_entry(&self, mood: InsertMoodEntry) -> Result<MoodEntry, StoreError> {
        Ok(self.tables.write().moods.insert_with(|id| MoodEntry {
            id,
            user_id: mood.user_id,
            mood: mood.mood,
            intensity: mood.intensity,
            notes: mood.notes,
            created_at: Utc::now(),
        }))
    }

    async fn get_damage_profile(
        &self,
        user_id: RecordId,
    ) -> Result<Option<DamageProfile>, StoreError> {
        Ok(self
            .tables
            .read()
            .damage
            .rows
            .values()
            .find(|p| p.user_id == user_id)
            .cloned())
    }

    async fn upsert_damage_profile(
        &self,
        profile: InsertDamageProfile,
    ) -> Result<DamageProfile, StoreError> {
        let mut tables = self.tables.write();
        let existing = tables
            .damage
            .rows
            .values_mut()
            .find(|p| p.user_id == profile.user_id);

        if let Some(existing) = existing {
            existing.patterns = profile.patterns;
            existing.triggers = profile.triggers;
            existing.loops = profile.loops;
            existing.updated_at = Utc::now();
            return Ok(existing.clone());
        }

        Ok(tables.damage.insert_with(|id| DamageProfile {
            id,
            user_id: profile.user_id,
            patterns: profile.patterns,
            triggers: profile.triggers,
            loops: profile.loops,
            updated_at: Utc::now(),
        }))
    }

    async fn get_reflection_stacks(&self) -> Result<Vec<ReflectionStack>, StoreError> {
        Ok(self.tables.read().stacks.filtered(|_| true))
    }

    async fn create_reflection_stack(
        &self,
        stack: InsertReflectionStack,
    ) -> Result<ReflectionStack, StoreError> {
        Ok(self
            .tables
            .write()
            .stacks
            .insert_with(|id| reflection_stack(id, stack)))
    }
}
