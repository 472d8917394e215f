//! Emotional signal detection — keyword scoring and content/tone classification.
//!
//! All checks are case-insensitive substring tests over the lower-cased input.
//! No tokenization, no stemming: a keyword counts once if it appears at all.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Keyword tables
// ---------------------------------------------------------------------------

pub const VULNERABILITY_KEYWORDS: &[&str] = &[
    "vulnerable", "scared", "afraid", "lonely", "hurt", "broken", "weak", "ashamed", "guilty",
];

pub const DEFENSIVENESS_KEYWORDS: &[&str] = &[
    "defensive", "angry", "furious", "hate", "pissed", "screw", "kill", "destroy", "fight",
];

pub const VALIDATION_SEEKING_KEYWORDS: &[&str] = &[
    "right?", "agree?", "think?", "opinion", "validation", "approval", "acceptance",
];

pub const EGO_COLLAPSE_KEYWORDS: &[&str] = &[
    "worthless", "useless", "failure", "loser", "nobody", "nothing", "pointless", "meaningless",
];

pub const INTELLECTUAL_POSTURING_KEYWORDS: &[&str] = &[
    "intellectual", "philosophical", "theoretical", "academic", "analysis", "logic", "reasoning",
];

const QUESTION_MARKERS: &[&str] = &["?", "why", "how", "what"];
const COMMAND_MARKERS: &[&str] = &["/"];
const CONFESSION_MARKERS: &[&str] = &["i feel", "i am", "i'm", "confess"];

const DEFENSIVE_TONE_MARKERS: &[&str] = &["fuck", "hate", "angry", "pissed"];
const VULNERABLE_TONE_MARKERS: &[&str] = &["sad", "crying", "hurt", "lonely"];
const INTELLECTUAL_TONE_MARKERS: &[&str] = &["think", "believe", "analysis", "logic"];
const EMOTIONAL_TONE_MARKERS: &[&str] = &["love", "happy", "excited", "wonderful"];

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// What kind of utterance the input is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Confession,
    Question,
    Statement,
    Command,
}

/// Dominant tone of the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Neutral,
    Emotional,
    Intellectual,
    Defensive,
    Vulnerable,
}

/// Signals extracted from a single input. Computed fresh per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmotionalState {
    pub vulnerability: usize,
    pub defensiveness: usize,
    pub validation_seeking: usize,
    pub ego_collapse: usize,
    pub intellectual_posturing: usize,
    pub content_type: ContentType,
    pub tone: Tone,
}

impl Default for EmotionalState {
    fn default() -> Self {
        Self {
            vulnerability: 0,
            defensiveness: 0,
            validation_seeking: 0,
            ego_collapse: 0,
            intellectual_posturing: 0,
            content_type: ContentType::Statement,
            tone: Tone::Neutral,
        }
    }
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Number of `keywords` present in `text`.
///
/// `text` must already be lower-cased. Presence, not frequency.
pub fn score(text: &str, keywords: &[&str]) -> usize {
    keywords.iter().filter(|kw| text.contains(**kw)).count()
}

fn contains_any(text: &str, markers: &[&str]) -> bool {
    markers.iter().any(|m| text.contains(m))
}

/// Classify content type and tone. First matching rule wins in each dimension;
/// the two dimensions are evaluated independently.
pub fn classify(text: &str) -> (ContentType, Tone) {
    let lower = text.to_lowercase();
    (classify_content(&lower), classify_tone(&lower))
}

fn classify_content(lower: &str) -> ContentType {
    if contains_any(lower, QUESTION_MARKERS) {
        ContentType::Question
    } else if contains_any(lower, COMMAND_MARKERS) {
        ContentType::Command
    } else if contains_any(lower, CONFESSION_MARKERS) {
        ContentType::Confession
    } else {
        ContentType::Statement
    }
}

fn classify_tone(lower: &str) -> Tone {
    if contains_any(lower, DEFENSIVE_TONE_MARKERS) {
        Tone::Defensive
    } else if contains_any(lower, VULNERABLE_TONE_MARKERS) {
        Tone::Vulnerable
    } else if contains_any(lower, INTELLECTUAL_TONE_MARKERS) {
        Tone::Intellectual
    } else if contains_any(lower, EMOTIONAL_TONE_MARKERS) {
        Tone::Emotional
    } else {
        Tone::Neutral
    }
}

/// Score all five keyword lists and classify the input.
pub fn detect_emotional_state(input: &str) -> EmotionalState {
    let lower = input.to_lowercase();
    EmotionalState {
        vulnerability: score(&lower, VULNERABILITY_KEYWORDS),
        defensiveness: score(&lower, DEFENSIVENESS_KEYWORDS),
        validation_seeking: score(&lower, VALIDATION_SEEKING_KEYWORDS),
        ego_collapse: score(&lower, EGO_COLLAPSE_KEYWORDS),
        intellectual_posturing: score(&lower, INTELLECTUAL_POSTURING_KEYWORDS),
        content_type: classify_content(&lower),
        tone: classify_tone(&lower),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_counts_presence_not_frequency() {
        assert_eq!(score("hurt hurt hurt", VULNERABILITY_KEYWORDS), 1);
        assert_eq!(score("scared, lonely and broken", VULNERABILITY_KEYWORDS), 3);
        assert_eq!(score("", VULNERABILITY_KEYWORDS), 0);
    }

    #[test]
    fn test_score_is_case_insensitive_via_detection() {
        let state = detect_emotional_state("I am SCARED and Ashamed");
        assert_eq!(state.vulnerability, 2);
    }

    #[test]
    fn test_question_wins_over_later_rules() {
        let (content, _) = classify("i feel lost, why?");
        assert_eq!(content, ContentType::Question);
        let (content, _) = classify("how do I fix this");
        assert_eq!(content, ContentType::Question);
    }

    #[test]
    fn test_command_and_confession() {
        assert_eq!(classify("/savage me").0, ContentType::Command);
        assert_eq!(classify("I confess I lied").0, ContentType::Confession);
        assert_eq!(classify("I'm done").0, ContentType::Confession);
        assert_eq!(classify("the sky is blue").0, ContentType::Statement);
    }

    #[test]
    fn test_tone_priority() {
        assert_eq!(classify("I hate being sad").1, Tone::Defensive);
        assert_eq!(classify("crying again").1, Tone::Vulnerable);
        assert_eq!(classify("I believe in logic").1, Tone::Intellectual);
        assert_eq!(classify("so excited today").1, Tone::Emotional);
        assert_eq!(classify("the bus was late").1, Tone::Neutral);
    }

    #[test]
    fn test_dimensions_are_independent() {
        let (content, tone) = classify("why the fuck is this broken?");
        assert_eq!(content, ContentType::Question);
        assert_eq!(tone, Tone::Defensive);
    }

    #[test]
    fn test_empty_input_falls_through() {
        let state = detect_emotional_state("");
        assert_eq!(state, EmotionalState::default());
        let state = detect_emotional_state("...!!!");
        assert_eq!(state.content_type, ContentType::Statement);
        assert_eq!(state.tone, Tone::Neutral);
    }

    #[test]
    fn test_validation_seeking_markers() {
        let state = detect_emotional_state("I was right? You agree? I need approval");
        assert_eq!(state.validation_seeking, 3);
    }

    #[test]
    fn test_serde_shape() {
        let state = detect_emotional_state("I confess");
        let json = serde_json::to_value(state).unwrap();
        assert_eq!(json["contentType"], "confession");
        assert_eq!(json["tone"], "neutral");
        assert_eq!(json["egoCollapse"], 0);
    }
}
