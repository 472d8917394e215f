//! Per-user persona history and pair performance tallies.
//!
//! Entries live for the lifetime of the store; nothing is evicted. Concurrent
//! writers for the same user race last-write-wins, which is acceptable because
//! the data only biases tertiary carry-over.

use std::collections::BTreeMap;

use dashmap::DashMap;

use super::selector::PersonaStack;

/// In-memory history store. Cheap to share behind an `Arc`.
#[derive(Debug, Default)]
pub struct HistoryStore {
    last_stacks: DashMap<String, PersonaStack>,
    tallies: DashMap<String, i64>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently recorded stack for `user_id`.
    pub fn last_stack(&self, user_id: &str) -> Option<PersonaStack> {
        self.last_stacks.get(user_id).map(|entry| *entry.value())
    }

    /// Overwrite the user's last stack and bump the pair tally by ±1.
    pub fn record_outcome(&self, user_id: &str, stack: &PersonaStack, success: bool) {
        self.last_stacks.insert(user_id.to_string(), *stack);

        let delta = if success { 1 } else { -1 };
        *self.tallies.entry(stack.performance_key()).or_insert(0) += delta;

        tracing::debug!(
            user_id,
            key = %stack.performance_key(),
            success,
            "Recorded persona outcome"
        );
    }

    /// Snapshot of all pair tallies, ordered by key.
    pub fn tallies(&self) -> BTreeMap<String, i64> {
        self.tallies
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect()
    }

    /// Number of users with a recorded stack.
    pub fn user_count(&self) -> usize {
        self.last_stacks.len()
    }
}
