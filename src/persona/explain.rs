//! Confidence score and human-readable reasoning for a persona selection.

use super::selector::{PersonaStack, SIGNAL_THRESHOLD};
use super::signals::{ContentType, EmotionalState};

pub const BASE_CONFIDENCE: f64 = 0.5;
const STRONG_SIGNAL_BONUS: f64 = 0.2;
const CONFESSION_BONUS: f64 = 0.15;
const SECONDARY_BONUS: f64 = 0.1;

pub const VULNERABILITY_REASON: &str = "High vulnerability detected - Velvet mode for gentle support";
pub const DEFENSIVENESS_REASON: &str =
    "Defensive tone identified - Savage mode for direct confrontation";
pub const CONFESSION_REASON: &str = "Confession detected - Velvet mode for safe emotional space";
pub const FALLBACK_REASON: &str = "Default persona selection based on general tone";

/// Additive confidence, clamped to at most 1.0.
pub fn confidence(state: &EmotionalState, stack: &PersonaStack) -> f64 {
    let mut confidence = BASE_CONFIDENCE;
    if state.vulnerability > SIGNAL_THRESHOLD || state.defensiveness > SIGNAL_THRESHOLD {
        confidence += STRONG_SIGNAL_BONUS;
    }
    if state.content_type == ContentType::Confession {
        confidence += CONFESSION_BONUS;
    }
    if stack.secondary.is_some() {
        confidence += SECONDARY_BONUS;
    }
    confidence.min(1.0)
}

/// One sentence per triggered condition, or the fallback sentence alone.
pub fn reasoning(state: &EmotionalState, stack: &PersonaStack) -> String {
    let mut reasons: Vec<String> = Vec::new();
    if state.vulnerability > SIGNAL_THRESHOLD {
        reasons.push(VULNERABILITY_REASON.to_string());
    }
    if state.defensiveness > SIGNAL_THRESHOLD {
        reasons.push(DEFENSIVENESS_REASON.to_string());
    }
    if state.content_type == ContentType::Confession {
        reasons.push(CONFESSION_REASON.to_string());
    }
    if let Some(secondary) = stack.secondary {
        reasons.push(format!("Secondary persona {} added for balance", secondary));
    }

    if reasons.is_empty() {
        FALLBACK_REASON.to_string()
    } else {
        reasons.join(". ")
    }
}

/// Both halves at once.
pub fn explain(state: &EmotionalState, stack: &PersonaStack) -> (f64, String) {
    (confidence(state, stack), reasoning(state, stack))
}
