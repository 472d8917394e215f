//! Persona selection — primary ladder, secondary pairing, tertiary carry-over.

use serde::{Deserialize, Serialize};

use super::catalog::PersonaId;
use super::signals::{ContentType, EmotionalState, Tone};

/// Signal count a dimension must exceed to drive selection.
pub const SIGNAL_THRESHOLD: usize = 2;

/// The personas chosen for one input. `primary` is always present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonaStack {
    pub primary: PersonaId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary: Option<PersonaId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tertiary: Option<PersonaId>,
}

impl PersonaStack {
    pub fn new(primary: PersonaId) -> Self {
        Self {
            primary,
            secondary: None,
            tertiary: None,
        }
    }

    /// Mode string forwarded to the chat endpoint.
    pub fn mode(&self) -> String {
        self.primary.mode()
    }

    /// Tally key `"<primary>_<secondary-or-none>"`.
    pub fn performance_key(&self) -> String {
        format!(
            "{}_{}",
            self.primary.name(),
            self.secondary.map(PersonaId::name).unwrap_or("none")
        )
    }
}

/// First-match-wins ladder over the emotional state.
pub fn select_primary(state: &EmotionalState) -> PersonaId {
    if state.vulnerability > SIGNAL_THRESHOLD {
        PersonaId::Velvet
    } else if state.defensiveness > SIGNAL_THRESHOLD {
        PersonaId::Savage
    } else if state.intellectual_posturing > SIGNAL_THRESHOLD {
        PersonaId::Clinical
    } else if state.ego_collapse > SIGNAL_THRESHOLD {
        PersonaId::BobRoss
    } else if state.content_type == ContentType::Confession {
        PersonaId::Velvet
    } else if state.tone == Tone::Defensive {
        PersonaId::Savage
    } else {
        PersonaId::DEFAULT
    }
}

/// Static pairing keyed only on the primary. Intentionally partial.
pub fn select_secondary(primary: PersonaId) -> Option<PersonaId> {
    match primary {
        PersonaId::Savage => Some(PersonaId::Clinical),
        PersonaId::Velvet => Some(PersonaId::Clinical),
        PersonaId::Clinical => Some(PersonaId::Velvet),
        _ => None,
    }
}

/// Tertiary personas are only ever inherited from the previous stack.
pub fn carry_tertiary(primary: PersonaId, previous: Option<&PersonaStack>) -> Option<PersonaId> {
    previous
        .and_then(|stack| stack.tertiary)
        .filter(|tertiary| primary.is_compatible(*tertiary))
}

/// Build the full stack for `state`, given the user's previous stack if any.
pub fn select(state: &EmotionalState, previous: Option<&PersonaStack>) -> PersonaStack {
    let primary = select_primary(state);
    PersonaStack {
        primary,
        secondary: select_secondary(primary),
        tertiary: carry_tertiary(primary, previous),
    }
}
