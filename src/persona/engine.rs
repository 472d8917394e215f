//! The persona engine — the single entry point for persona analysis.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::explain;
use super::history::HistoryStore;
use super::selector::{self, PersonaStack};
use super::signals::{self, EmotionalState};

/// Result of analyzing one user input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonaAnalysis {
    pub selected_personas: PersonaStack,
    pub confidence: f64,
    pub reasoning: String,
    pub emotional_state: EmotionalState,
}

impl PersonaAnalysis {
    /// Chat mode derived from the primary persona.
    pub fn mode(&self) -> String {
        self.selected_personas.mode()
    }
}

/// Analyzes input and records outcomes against an injected [`HistoryStore`].
#[derive(Debug, Clone, Default)]
pub struct PersonaEngine {
    history: Arc<HistoryStore>,
}

impl PersonaEngine {
    /// Engine with a fresh, private history store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine sharing an existing history store.
    pub fn with_history(history: Arc<HistoryStore>) -> Self {
        Self { history }
    }

    pub fn history(&self) -> &Arc<HistoryStore> {
        &self.history
    }

    /// Detect signals, select personas, and explain the choice.
    ///
    /// Deterministic for a given input, user id, and history state.
    pub fn analyze(&self, user_input: &str, user_id: Option<&str>) -> PersonaAnalysis {
        let emotional_state = signals::detect_emotional_state(user_input);
        let previous = user_id.and_then(|id| self.history.last_stack(id));
        let selected_personas = selector::select(&emotional_state, previous.as_ref());
        let (confidence, reasoning) = explain::explain(&emotional_state, &selected_personas);

        tracing::debug!(
            primary = %selected_personas.primary,
            confidence,
            content_type = ?emotional_state.content_type,
            tone = ?emotional_state.tone,
            "Persona analysis complete"
        );

        PersonaAnalysis {
            selected_personas,
            confidence,
            reasoning,
            emotional_state,
        }
    }

    /// Feedback hook: remember the stack for the user and tally the outcome.
    pub fn record_outcome(&self, user_id: &str, stack: &PersonaStack, success: bool) {
        self.history.record_outcome(user_id, stack, success);
    }

    /// Read-only snapshot of pair tallies.
    pub fn performance_insights(&self) -> BTreeMap<String, i64> {
        self.history.tallies()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persona::catalog::PersonaId;
    use crate::persona::explain::{CONFESSION_REASON, FALLBACK_REASON, VULNERABILITY_REASON};
    use crate::persona::signals::{ContentType, Tone};

    #[test]
    fn test_analyze_is_deterministic() {
        let engine = PersonaEngine::new();
        let a = engine.analyze("I hate everything, I want to fight and destroy", Some("u1"));
        let b = engine.analyze("I hate everything, I want to fight and destroy", Some("u1"));
        assert_eq!(a, b);
        assert_eq!(a.selected_personas.primary, PersonaId::Savage);
    }

    #[test]
    fn test_scared_and_alone_scenario() {
        let engine = PersonaEngine::new();
        let analysis = engine.analyze("I feel so scared and alone, nobody understands me", None);
        let state = analysis.emotional_state;
        // only "scared" is on the vulnerability list
        assert_eq!(state.vulnerability, 1);
        assert_eq!(state.ego_collapse, 1);
        assert_eq!(state.content_type, ContentType::Confession);
        assert_eq!(analysis.selected_personas.primary, PersonaId::Velvet);
        assert_eq!(analysis.selected_personas.secondary, Some(PersonaId::Clinical));
        assert!(analysis.reasoning.contains(CONFESSION_REASON));
        assert!(!analysis.reasoning.contains(VULNERABILITY_REASON));
        assert!((analysis.confidence - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_high_vulnerability_scenario() {
        let engine = PersonaEngine::new();
        let analysis = engine.analyze("I'm scared, lonely and broken inside", None);
        assert_eq!(analysis.emotional_state.vulnerability, 3);
        assert_eq!(analysis.selected_personas.primary, PersonaId::Velvet);
        assert!(analysis.reasoning.starts_with(VULNERABILITY_REASON));
        assert!((analysis.confidence - 0.95).abs() < 1e-9);
    }

    #[test]
    fn test_why_do_i_ruin_everything_scenario() {
        let engine = PersonaEngine::new();
        let analysis = engine.analyze("Why do I always ruin everything?", None);
        assert_eq!(analysis.emotional_state.content_type, ContentType::Question);
        assert_eq!(analysis.emotional_state.tone, Tone::Neutral);
        assert_eq!(analysis.selected_personas.primary, PersonaId::Savage);
        // the default primary carries a Clinical secondary
        assert!((analysis.confidence - 0.6).abs() < 1e-9);
        assert!(!analysis.reasoning.contains(FALLBACK_REASON));
    }

    #[test]
    fn test_empty_input_uses_default() {
        let engine = PersonaEngine::new();
        let analysis = engine.analyze("", None);
        assert_eq!(analysis.selected_personas.primary, PersonaId::DEFAULT);
        assert_eq!(analysis.mode(), "savage");
    }

    #[test]
    fn test_intellectual_and_ego_collapse_rungs() {
        let engine = PersonaEngine::new();
        let analysis = engine.analyze(
            "A philosophical and theoretical analysis of academic logic",
            None,
        );
        assert_eq!(analysis.selected_personas.primary, PersonaId::Clinical);
        assert_eq!(analysis.selected_personas.secondary, Some(PersonaId::Velvet));

        let analysis = engine.analyze("worthless useless loser", None);
        assert_eq!(analysis.selected_personas.primary, PersonaId::BobRoss);
        assert_eq!(analysis.selected_personas.secondary, None);
        assert_eq!(analysis.reasoning, FALLBACK_REASON);
    }

    #[test]
    fn test_tertiary_carry_over_through_history() {
        let engine = PersonaEngine::new();
        let previous = PersonaStack {
            primary: PersonaId::Savage,
            secondary: Some(PersonaId::Clinical),
            tertiary: Some(PersonaId::Rollins),
        };
        engine.record_outcome("u1", &previous, true);

        // Savage primary: Savage/Rollins = 9, carried
        let analysis = engine.analyze("just a normal day", Some("u1"));
        assert_eq!(analysis.selected_personas.tertiary, Some(PersonaId::Rollins));

        // Velvet primary: Velvet/Rollins = 3, dropped
        let analysis = engine.analyze("I confess something", Some("u1"));
        assert_eq!(analysis.selected_personas.primary, PersonaId::Velvet);
        assert_eq!(analysis.selected_personas.tertiary, None);

        // unknown user: no carry-over
        let analysis = engine.analyze("just a normal day", Some("u2"));
        assert_eq!(analysis.selected_personas.tertiary, None);
        // no user id at all
        let analysis = engine.analyze("just a normal day", None);
        assert_eq!(analysis.selected_personas.tertiary, None);
    }

    #[test]
    fn test_engines_share_injected_history() {
        let history = Arc::new(HistoryStore::new());
        let a = PersonaEngine::with_history(history.clone());
        let b = PersonaEngine::with_history(history);
        a.record_outcome("u1", &PersonaStack::new(PersonaId::Noir), true);
        assert_eq!(b.performance_insights().get("Noir_none"), Some(&1));

        let isolated = PersonaEngine::new();
        assert!(isolated.performance_insights().is_empty());
    }

    #[test]
    fn test_insights_reflect_outcomes() {
        let engine = PersonaEngine::new();
        let analysis = engine.analyze("hello", Some("u1"));
        engine.record_outcome("u1", &analysis.selected_personas, true);
        engine.record_outcome("u1", &analysis.selected_personas, true);
        engine.record_outcome("u1", &analysis.selected_personas, false);
        let insights = engine.performance_insights();
        assert_eq!(insights.get("Savage_Clinical"), Some(&1));
        assert_eq!(insights, engine.performance_insights());
    }
}
