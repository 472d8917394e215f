//! Canned validation replies for when the LLM is unavailable or its output
//! fails the schema check.

use serde::{Deserialize, Serialize};

/// Overall direction of a validation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    Positive,
    Negative,
    Mixed,
}

impl ValidationMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ValidationMode::Positive => "positive",
            ValidationMode::Negative => "negative",
            ValidationMode::Mixed => "mixed",
        }
    }

    fn core_lines(self) -> [&'static str; 2] {
        match self {
            ValidationMode::Positive => [
                "You didn't get lucky. You got serious and it shows.",
                "That wasn't noise. That was signal. Repeatable, earned.",
            ],
            ValidationMode::Negative => [
                "Slow down. Pride is loud; proof is quiet.",
                "You're selling the sizzle before the steak's even warm.",
            ],
            ValidationMode::Mixed => [
                "Credit where due: you moved the needle. Now make it repeatable.",
                "Win logged. Now do it without the victory dance.",
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intensity {
    Feather,
    Casual,
    Firm,
    Heavy,
}

impl Intensity {
    pub fn as_str(self) -> &'static str {
        match self {
            Intensity::Feather => "feather",
            Intensity::Casual => "casual",
            Intensity::Firm => "firm",
            Intensity::Heavy => "heavy",
        }
    }

    /// Position on the 0..=3 scale.
    pub fn level(self) -> i64 {
        match self {
            Intensity::Feather => 0,
            Intensity::Casual => 1,
            Intensity::Firm => 2,
            Intensity::Heavy => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackLength {
    One,
    TwoThree,
    ShortPara,
}

impl FallbackLength {
    pub fn as_str(self) -> &'static str {
        match self {
            FallbackLength::One => "one",
            FallbackLength::TwoThree => "two_three",
            FallbackLength::ShortPara => "short_para",
        }
    }
}

pub const FOLLOWUP: &str =
    "What would 'repeatable' look like this week? One action you can execute twice.";

#[derive(Debug, Clone, PartialEq)]
pub struct FallbackPayload {
    pub mode: ValidationMode,
    pub length: FallbackLength,
    pub intensity: Intensity,
    /// "moodybot" or "plain".
    pub style: String,
    pub reason_tags: Vec<String>,
    pub include_followup: bool,
    pub user_msg: String,
}

/// Same shape as a validated LLM reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallbackValidation {
    pub tags: Vec<String>,
    pub validation: String,
    /// Always `None`; engine reasons are not surfaced to users.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub because: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub followup: Option<String>,
}

pub fn moody_fallback(payload: &FallbackPayload) -> FallbackValidation {
    let [first, second] = payload.mode.core_lines();

    let tag_hook = if payload.reason_tags.is_empty() {
        String::new()
    } else {
        let tags: Vec<&str> = payload.reason_tags.iter().take(3).map(String::as_str).collect();
        format!(" This is about {}.", tags.join(", "))
    };

    let validation = match payload.length {
        FallbackLength::One => format!("{}{} 🥃", first, tag_hook),
        FallbackLength::TwoThree => format!("{} {}{} 🥃", first, second, tag_hook),
        FallbackLength::ShortPara => {
            let follow = if payload.include_followup {
                format!("\n\n{}", FOLLOWUP)
            } else {
                String::new()
            };
            format!("{} {}{} {} 🥃", first, second, tag_hook, follow)
        }
    };

    FallbackValidation {
        tags: vec![
            payload.mode.as_str().to_string(),
            payload.style.clone(),
            payload.intensity.as_str().to_string(),
            payload.length.as_str().to_string(),
        ],
        validation,
        because: None,
        followup: payload.include_followup.then(|| FOLLOWUP.to_string()),
    }
}

/// Map an API length value onto a fallback length. Unknown values get the
/// paragraph shape.
pub fn map_length_to_fallback(length: &str) -> FallbackLength {
    match length {
        "1-liner" | "1-line" => FallbackLength::One,
        "2-3 lines" | "2-3-lines" => FallbackLength::TwoThree,
        _ => FallbackLength::ShortPara,
    }
}

pub fn map_intensity_to_fallback(intensity: i64) -> Intensity {
    match intensity {
        i64::MIN..=1 => Intensity::Feather,
        2 => Intensity::Casual,
        3 => Intensity::Firm,
        _ => Intensity::Heavy,
    }
}

/// Sampling temperature for an intensity level, clamped to 0..=3.
pub fn intensity_to_temp(intensity: i64) -> f64 {
    const TEMPS: [f64; 4] = [0.3, 0.5, 0.7, 0.9];
    TEMPS[intensity.clamp(0, 3) as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(length: FallbackLength) -> FallbackPayload {
        FallbackPayload {
            mode: ValidationMode::Positive,
            length,
            intensity: Intensity::Firm,
            style: "moodybot".into(),
            reason_tags: vec![],
            include_followup: false,
            user_msg: "I shipped it".into(),
        }
    }

    #[test]
    fn test_one_liner() {
        let out = moody_fallback(&payload(FallbackLength::One));
        assert_eq!(out.validation, "You didn't get lucky. You got serious and it shows. 🥃");
        assert_eq!(out.tags, ["positive", "moodybot", "firm", "one"]);
        assert_eq!(out.because, None);
        assert_eq!(out.followup, None);
    }

    #[test]
    fn test_tag_hook_uses_first_three() {
        let mut p = payload(FallbackLength::TwoThree);
        p.mode = ValidationMode::Negative;
        p.reason_tags = vec!["pride".into(), "speed".into(), "ego".into(), "extra".into()];
        let out = moody_fallback(&p);
        assert_eq!(
            out.validation,
            "Slow down. Pride is loud; proof is quiet. You're selling the sizzle before the \
             steak's even warm. This is about pride, speed, ego. 🥃"
        );
    }

    #[test]
    fn test_short_para_followup() {
        let mut p = payload(FallbackLength::ShortPara);
        p.mode = ValidationMode::Mixed;
        p.include_followup = true;
        let out = moody_fallback(&p);
        assert!(out.validation.contains(&format!("\n\n{} 🥃", FOLLOWUP)));
        assert_eq!(out.followup.as_deref(), Some(FOLLOWUP));

        p.include_followup = false;
        let out = moody_fallback(&p);
        assert!(out.validation.ends_with("victory dance.  🥃"));
    }

    #[test]
    fn test_mappers() {
        assert_eq!(map_length_to_fallback("1-liner"), FallbackLength::One);
        assert_eq!(map_length_to_fallback("2-3 lines"), FallbackLength::TwoThree);
        assert_eq!(map_length_to_fallback("medium"), FallbackLength::ShortPara);
        assert_eq!(map_intensity_to_fallback(-4), Intensity::Feather);
        assert_eq!(map_intensity_to_fallback(2), Intensity::Casual);
        assert_eq!(map_intensity_to_fallback(3), Intensity::Firm);
        assert_eq!(map_intensity_to_fallback(9), Intensity::Heavy);
    }

    #[test]
    fn test_intensity_to_temp_clamps() {
        assert_eq!(intensity_to_temp(-1), 0.3);
        assert_eq!(intensity_to_temp(2), 0.7);
        assert_eq!(intensity_to_temp(7), 0.9);
        assert_eq!(intensity_to_temp(Intensity::Casual.level()), 0.5);
    }
}
