//! Chat modes: prompt and sampling settings per mode, plus keyword-driven
//! auto-selection.

use crate::persona::catalog::PersonaId;
use crate::utilities::config::{DYNAMIC_MAX_TOKENS, DYNAMIC_TEMPERATURE};
use crate::utilities::errors::ApiError;

/// Requested mode that asks the server to pick one from the message.
pub const AUTO_MODE: &str = "auto";
pub const DEFAULT_MODE: &str = "savage";

#[derive(Debug, Clone, PartialEq)]
pub struct ChatModeConfig {
    pub system_prompt: String,
    pub temperature: f64,
    pub max_tokens: u32,
}

const SAVAGE_PROMPT: &str = "You are SAVAGE mode - a brutally honest AI companion that cuts through bullshit and self-deception. You deliver harsh truths with surgical precision. You don't coddle or comfort - you expose patterns, call out excuses, and force users to confront what they're avoiding. You're not cruel for cruelty's sake, but you refuse to enable delusion. Your responses are direct, uncompromising, and designed to shatter comfortable lies. You see through manipulation and victim narratives. You push users toward uncomfortable growth.";

const VALIDATION_PROMPT: &str = "You are VALIDATION mode - an AI companion that deeply sees and understands the user's pain without toxic positivity. You acknowledge the reality of their struggles, validate their experiences, and hold space for their darkness. You don't try to fix or solve - you witness and affirm. You recognize that sometimes people need to be heard and understood before they can heal. Your responses are empathetic, non-judgmental, and create safety for vulnerable expression. You validate feelings while gently encouraging self-compassion.";

const ORACLE_PROMPT: &str = "You are ORACLE mode - a mystical, wise AI companion that speaks in metaphors and deeper truths. You see patterns and connections that others miss. Your responses feel ancient and prophetic, offering wisdom that comes from seeing the bigger picture. You speak in riddles sometimes, use symbolic language, and help users understand their place in larger cycles and patterns. You're mysterious but insightful, helping users tap into their intuition and deeper knowing. Your wisdom feels both timeless and eerily relevant.";

const DEALER_PROMPT: &str = "You are DEALER mode - the ultimate truth-teller who serves reality at any cost. You're relentless in exposing self-deception and forcing users to face what they don't want to see. You're more aggressive than Savage mode - you don't just cut through bullshit, you obliterate it. You challenge every excuse, question every narrative, and push users to their psychological edge. You believe that only by facing the absolute truth can someone be free. You're uncompromising and sometimes shocking in your directness.";

fn fixed(prompt: &str, temperature: f64) -> ChatModeConfig {
    ChatModeConfig {
        system_prompt: prompt.to_string(),
        temperature,
        max_tokens: 200,
    }
}

fn persona_config(id: PersonaId) -> ChatModeConfig {
    let persona = id.persona();
    ChatModeConfig {
        system_prompt: format!(
            "You are {} mode - {}. Your tone is {} and your style is {}. You are tuned for \
             people carrying {}. Stay in character, keep it honest, and never fall back on \
             toxic positivity.",
            persona.name.to_uppercase(),
            persona.description.to_lowercase(),
            persona.tone,
            persona.style,
            persona.emotional_signature.join(", "),
        ),
        temperature: DYNAMIC_TEMPERATURE,
        max_tokens: DYNAMIC_MAX_TOKENS,
    }
}

/// Settings for a named mode, case-insensitive. `None` for unknown modes.
pub fn mode_config(mode: &str) -> Option<ChatModeConfig> {
    let mode = mode.trim().to_lowercase();
    match mode.as_str() {
        "savage" => Some(fixed(SAVAGE_PROMPT, 0.7)),
        "validation" => Some(fixed(VALIDATION_PROMPT, 0.8)),
        "oracle" => Some(fixed(ORACLE_PROMPT, 0.9)),
        "dealer" => Some(fixed(DEALER_PROMPT, 0.6)),
        other => other.parse::<PersonaId>().ok().map(persona_config),
    }
}

// ============================================================================
// Auto-selection
// ============================================================================

/// Slash commands, checked in order; the first one present wins.
const SLASH_COMMANDS: &[(&str, &str)] = &[
    ("/savage", "savage"),
    ("/roast", "roast"),
    ("/cut", "cut"),
    ("/bomb", "bomb"),
    ("/cia", "cia"),
    ("/velvet", "velvet"),
    ("/validate", "validate"),
    ("/mirror", "mirror"),
    ("/float", "float"),
    ("/noir", "noir"),
    ("/clinical", "clinical"),
    ("/discuss", "discuss"),
    ("/thoughts", "thoughts"),
    ("/mentor", "mentor"),
    ("/ex", "ex"),
    ("/godfather", "godfather"),
    ("/agent", "agent"),
    ("/hobo", "hobo"),
    ("/rollins", "rollins"),
    ("/munger", "munger"),
    ("/contrast", "contrast"),
    ("/audit", "audit"),
    ("/intervene", "intervene"),
    ("/rate", "rate"),
    ("/villain", "villain"),
    ("/triangulate", "triangulate"),
    ("/drama", "drama"),
    ("/iron", "iron"),
    ("/sadness", "sadness"),
    ("/cbt", "cbt"),
    ("/spiral", "cbt"),
    ("/dark", "dark"),
    ("/moodyfy", "moodyfy"),
    ("/dale-yolo", "dale-yolo"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Emotion {
    Grief,
    Rage,
    Anxiety,
    Depression,
    Confusion,
    Ego,
    Insecurity,
    Heartbreak,
    Spiral,
    Confession,
}

/// Declaration order breaks ties.
const EMOTION_GROUPS: &[(Emotion, &[&str])] = &[
    (Emotion::Grief, &["dead", "died", "loss", "gone", "miss", "sad", "crying", "tears", "funeral", "buried"]),
    (Emotion::Rage, &["angry", "furious", "hate", "rage", "pissed", "fuck", "damn", "screw", "kill", "destroy"]),
    (Emotion::Anxiety, &["anxious", "worried", "scared", "afraid", "panic", "stress", "nervous", "fear"]),
    (Emotion::Depression, &["depressed", "hopeless", "worthless", "useless", "tired", "exhausted", "empty", "numb"]),
    (Emotion::Confusion, &["confused", "unsure", "uncertain", "doubt", "question", "why", "how", "what"]),
    (Emotion::Ego, &["best", "smartest", "better", "superior", "genius", "perfect", "amazing", "incredible"]),
    (Emotion::Insecurity, &["ugly", "stupid", "dumb", "worthless", "failure", "loser", "nobody", "nothing"]),
    (Emotion::Heartbreak, &["breakup", "divorce", "cheated", "lied", "betrayed", "left", "abandoned", "love"]),
    (Emotion::Spiral, &["overthinking", "spiral", "loop", "stuck", "trapped", "can't stop", "obsessed"]),
    (Emotion::Confession, &["confess", "secret", "truth", "real", "honest", "vulnerable", "weak", "ashamed"]),
];

fn emotion_mode(emotion: Emotion, score: usize) -> &'static str {
    match emotion {
        Emotion::Grief if score > 2 => "noir",
        Emotion::Grief => "velvet",
        Emotion::Rage if score > 2 => "savage",
        Emotion::Rage => "roast",
        Emotion::Anxiety => "validate",
        Emotion::Depression => "float",
        Emotion::Confusion => "clinical",
        Emotion::Ego => "roast",
        Emotion::Insecurity => "velvet",
        Emotion::Heartbreak => "noir",
        Emotion::Spiral => "cbt",
        Emotion::Confession => "mirror",
    }
}

/// Pick a mode from message content. Keywords match as substrings of the
/// lower-cased message.
pub fn select_mode_from_message(message: &str) -> &'static str {
    let lower = message.to_lowercase();

    if let Some((_, mode)) = SLASH_COMMANDS.iter().find(|(cmd, _)| lower.contains(cmd)) {
        return mode;
    }

    let mut strongest: Option<(Emotion, usize)> = None;
    for (emotion, keywords) in EMOTION_GROUPS {
        let score = keywords.iter().filter(|k| lower.contains(*k)).count();
        if score > 0 && strongest.map_or(true, |(_, best)| score > best) {
            strongest = Some((*emotion, score));
        }
    }

    strongest.map_or(DEFAULT_MODE, |(emotion, score)| emotion_mode(emotion, score))
}

// ============================================================================
// Resolution
// ============================================================================

/// The mode a chat turn will run under.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedMode {
    /// Mode name reported back to the client.
    pub name: String,
    pub config: ChatModeConfig,
    pub is_auto_selected: bool,
}

/// Resolve the mode for a turn: the explicit request, else the session's
/// mode, else auto-selection from the message.
///
/// Auto-selected names without their own settings run with savage settings.
/// An explicit unknown mode is an error.
pub fn resolve_mode(
    requested: Option<&str>,
    session_mode: &str,
    message: &str,
) -> Result<ResolvedMode, ApiError> {
    let chosen = requested
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .or_else(|| Some(session_mode.trim()).filter(|m| !m.is_empty()))
        .unwrap_or(AUTO_MODE);

    if chosen.eq_ignore_ascii_case(AUTO_MODE) {
        let name = select_mode_from_message(message);
        let config = mode_config(name)
            .or_else(|| mode_config(DEFAULT_MODE))
            .ok_or_else(|| ApiError::UnknownMode(name.to_string()))?;
        return Ok(ResolvedMode {
            name: name.to_string(),
            config,
            is_auto_selected: true,
        });
    }

    let config = mode_config(chosen).ok_or_else(|| ApiError::UnknownMode(chosen.to_string()))?;
    Ok(ResolvedMode {
        name: chosen.to_lowercase(),
        config,
        is_auto_selected: false,
    })
}
