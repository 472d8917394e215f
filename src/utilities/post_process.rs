//! Post-processing for raw LLM replies.
//!
//! Turns a provider reply into MoodyBot's voice: strip weak openers, tidy
//! punctuation, swap pet names for harsher descriptors, drop canned sign-offs,
//! then sign and close with a call to action.

use once_cell::sync::Lazy;
use rand::Rng;
use regex::Regex;

/// Signature appended to every processed reply.
pub const SIGNATURE: &str = "🥃 @MoodyBotAI";

/// Closing lines; one is picked per reply.
pub const CALLS_TO_ACTION: [&str; 4] = [
    "Breathe before you reply.",
    "Tag 🥃 @MoodyBotAI if it wrecked you.",
    "He won’t save you, but he’ll make you feel seen.",
    "You wanted the truth, right?",
];

/// Pet names and their replacements, applied in order.
pub const MOODY_REPLACEMENTS: [(&str, &str); 9] = [
    ("darling", "volatile angel"),
    ("beautiful mess", "gorgeously ruined soul"),
    ("sweetheart", "feral romantic"),
    ("babe", "existential gymnast"),
    ("honey", "doomed optimist"),
    ("cutie", "emotional hostage"),
    ("love", "walking contradiction"),
    ("sunshine", "neon heartbreak"),
    ("baby girl", "sentient ache"),
];

static DESCRIPTOR_PATTERNS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    MOODY_REPLACEMENTS
        .iter()
        .map(|(word, replacement)| {
            let pattern = format!(r"(?i)\b{}\b", regex::escape(word));
            (Regex::new(&pattern).unwrap(), *replacement)
        })
        .collect()
});

static REPEATED_DOTS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.{2,}").unwrap());
static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static SPACE_BEFORE_PUNCT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s([?.!])").unwrap());
static WEAK_OPENER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^ah[,.\s]+").unwrap());
static SIGNOFFS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(Bet it hits different.*?|Now cry about it\.?|Be honest.*?|Deal with it\.?)+$")
        .unwrap()
});

/// Case-insensitive, word-bounded pet-name replacement.
pub fn replace_moody_descriptors(text: &str) -> String {
    DESCRIPTOR_PATTERNS
        .iter()
        .fold(text.to_string(), |acc, (re, replacement)| {
            re.replace_all(&acc, *replacement).into_owned()
        })
}

/// Collapse runs of dots and whitespace, and pull punctuation onto its word.
pub fn polish_sentences(text: &str) -> String {
    let text = REPEATED_DOTS.replace_all(text, ".");
    let text = WHITESPACE_RUN.replace_all(&text, " ");
    let text = SPACE_BEFORE_PUNCT.replace_all(&text, "$1");
    text.trim().to_string()
}

/// One sentence per line. Splits on whitespace that follows `.`, `!` or `?`.
pub fn auto_paragraph(text: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut after_terminator = false;

    for ch in text.chars() {
        if ch.is_whitespace() && after_terminator {
            lines.push(std::mem::take(&mut current));
            continue;
        }
        after_terminator = matches!(ch, '.' | '!' | '?');
        current.push(ch);
    }
    lines.push(current);

    lines
        .iter()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Strip a leading "Ah," / "ah." / "Ah " opener.
pub fn clean_weak_openers(text: &str) -> String {
    WEAK_OPENER.replace(text, "").trim_start().to_string()
}

/// Drop trailing canned sign-offs such as "Deal with it."
pub fn clean_moody_signoffs(text: &str) -> String {
    SIGNOFFS.replace(text, "").trim().to_string()
}

/// Append [`SIGNATURE`] unless the text already carries it.
pub fn append_signature(text: &str) -> String {
    if text.contains(SIGNATURE) {
        text.to_string()
    } else {
        format!("{}\n\n{}", text, SIGNATURE)
    }
}

pub fn random_cta<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    CALLS_TO_ACTION[rng.random_range(0..CALLS_TO_ACTION.len())]
}

/// Full pipeline with a caller-supplied RNG for the closing line.
pub fn post_process_with_rng<R: Rng + ?Sized>(raw: &str, rng: &mut R) -> String {
    let processed = clean_weak_openers(raw);
    let processed = polish_sentences(&processed);
    let processed = replace_moody_descriptors(&processed);
    let processed = clean_moody_signoffs(&processed);
    let processed = append_signature(&processed);
    format!("{}\n\n{}", processed, random_cta(rng))
}

/// Full pipeline using the thread-local RNG.
pub fn post_process_moody_response(raw: &str) -> String {
    post_process_with_rng(raw, &mut rand::rng())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_replace_descriptors_word_bounded() {
        assert_eq!(
            replace_moody_descriptors("Listen, Darling, you are my beautiful mess."),
            "Listen, volatile angel, you are my gorgeously ruined soul."
        );
        // "lovely" and "honeycomb" are not whole-word hits
        assert_eq!(
            replace_moody_descriptors("lovely honeycomb"),
            "lovely honeycomb"
        );
        assert_eq!(replace_moody_descriptors("LOVE hurts"), "walking contradiction hurts");
    }

    #[test]
    fn test_polish_sentences() {
        assert_eq!(
            polish_sentences("  You tried...   and failed .  Again ! "),
            "You tried. and failed. Again!"
        );
    }

    #[test]
    fn test_auto_paragraph() {
        assert_eq!(
            auto_paragraph("First line. Second one!  Third?   "),
            "First line.\nSecond one!\nThird?"
        );
        assert_eq!(auto_paragraph("no terminator here"), "no terminator here");
        assert_eq!(auto_paragraph(""), "");
    }

    #[test]
    fn test_clean_weak_openers() {
        assert_eq!(clean_weak_openers("Ah, the classic move."), "the classic move.");
        assert_eq!(clean_weak_openers("ah. fine"), "fine");
        assert_eq!(clean_weak_openers("Ahead of you"), "Ahead of you");
    }

    #[test]
    fn test_clean_signoffs() {
        assert_eq!(
            clean_moody_signoffs("You knew this already. Deal with it."),
            "You knew this already."
        );
        assert_eq!(
            clean_moody_signoffs("Stop lying. Be honest with yourself for once"),
            "Stop lying."
        );
        assert_eq!(clean_moody_signoffs("Nothing to strip."), "Nothing to strip.");
    }

    #[test]
    fn test_append_signature_once() {
        let signed = append_signature("Truth.");
        assert_eq!(signed, "Truth.\n\n🥃 @MoodyBotAI");
        assert_eq!(append_signature(&signed), signed);
    }

    #[test]
    fn test_pipeline_order_and_seeded_cta() {
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);
        let raw = "Ah, sweetheart..  you  know it . Now cry about it.";
        let out_a = post_process_with_rng(raw, &mut a);
        let out_b = post_process_with_rng(raw, &mut b);
        assert_eq!(out_a, out_b);
        assert!(out_a.starts_with("feral romantic. you know it.\n\n🥃 @MoodyBotAI\n\n"));
        let cta = out_a.rsplit("\n\n").next().unwrap();
        assert!(CALLS_TO_ACTION.contains(&cta));
    }
}
