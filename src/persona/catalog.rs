//! Persona catalog — the closed set of response personas and their affinities.
//!
//! Every persona is a static entry in [`PERSONAS`], indexed by [`PersonaId`].
//! Pairwise affinity lives in a fixed 11×11 matrix so that lookups never hash
//! and never miss.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Number of personas in the catalog.
pub const PERSONA_COUNT: usize = 11;

/// Minimum compatibility score for a previous tertiary persona to be kept.
pub const COMPATIBILITY_THRESHOLD: u8 = 6;

// ---------------------------------------------------------------------------
// PersonaId
// ---------------------------------------------------------------------------

/// Identifier of a catalog persona.
///
/// Serializes as the persona's display name (e.g. `"Bob Ross"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PersonaId {
    #[serde(rename = "Savage")]
    Savage,
    #[serde(rename = "Velvet")]
    Velvet,
    #[serde(rename = "Clinical")]
    Clinical,
    #[serde(rename = "Noir")]
    Noir,
    #[serde(rename = "CIA")]
    Cia,
    #[serde(rename = "Dale/YOLO")]
    DaleYolo,
    #[serde(rename = "Bob Ross")]
    BobRoss,
    #[serde(rename = "Bourdain")]
    Bourdain,
    #[serde(rename = "Gothic")]
    Gothic,
    #[serde(rename = "Rollins")]
    Rollins,
    #[serde(rename = "Bond")]
    Bond,
}

impl PersonaId {
    /// All personas in catalog order.
    pub const ALL: [PersonaId; PERSONA_COUNT] = [
        PersonaId::Savage,
        PersonaId::Velvet,
        PersonaId::Clinical,
        PersonaId::Noir,
        PersonaId::Cia,
        PersonaId::DaleYolo,
        PersonaId::BobRoss,
        PersonaId::Bourdain,
        PersonaId::Gothic,
        PersonaId::Rollins,
        PersonaId::Bond,
    ];

    /// The fallback persona when no selection rule fires (first catalog entry).
    pub const DEFAULT: PersonaId = PersonaId::Savage;

    /// Position of this persona in [`PERSONAS`] and the compatibility matrix.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The static catalog entry for this persona.
    pub fn persona(self) -> &'static Persona {
        &PERSONAS[self.index()]
    }

    /// Display name, e.g. `"Dale/YOLO"`.
    pub fn name(self) -> &'static str {
        self.persona().name
    }

    /// Lower-cased name, used as the chat `mode` string.
    pub fn mode(self) -> String {
        self.name().to_lowercase()
    }

    /// Affinity score (0–9) between `self` and `other`.
    pub fn compatibility(self, other: PersonaId) -> u8 {
        COMPATIBILITY[self.index()][other.index()]
    }

    /// Whether `other` is compatible enough to accompany `self`.
    pub fn is_compatible(self, other: PersonaId) -> bool {
        self.compatibility(other) >= COMPATIBILITY_THRESHOLD
    }
}

impl fmt::Display for PersonaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a string names no catalog persona.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown persona: {0}")]
pub struct UnknownPersona(pub String);

impl FromStr for PersonaId {
    type Err = UnknownPersona;

    /// Case-insensitive match against persona names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        PersonaId::ALL
            .iter()
            .copied()
            .find(|id| id.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownPersona(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Persona
// ---------------------------------------------------------------------------

/// A named stylistic preset that biases downstream response generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Persona {
    pub name: &'static str,
    pub description: &'static str,
    /// Descriptive tags only; never consulted by selection.
    pub emotional_signature: &'static [&'static str],
    pub tone: &'static str,
    pub style: &'static str,
}

/// The persona catalog, in [`PersonaId`] order.
pub static PERSONAS: [Persona; PERSONA_COUNT] = [
    Persona {
        name: "Savage",
        description: "Brutal honesty with a sharp edge",
        emotional_signature: &["anger", "frustration", "ego", "defiance"],
        tone: "aggressive",
        style: "direct",
    },
    Persona {
        name: "Velvet",
        description: "Gentle support with emotional depth",
        emotional_signature: &["vulnerability", "sadness", "grief", "insecurity"],
        tone: "nurturing",
        style: "empathetic",
    },
    Persona {
        name: "Clinical",
        description: "Analytical and structured approach",
        emotional_signature: &["confusion", "uncertainty", "intellectual", "analysis"],
        tone: "analytical",
        style: "structured",
    },
    Persona {
        name: "Noir",
        description: "Dark, poetic, atmospheric",
        emotional_signature: &["grief", "loss", "melancholy", "existential"],
        tone: "melancholic",
        style: "poetic",
    },
    Persona {
        name: "CIA",
        description: "Strategic and calculated",
        emotional_signature: &["manipulation", "strategy", "control", "power"],
        tone: "calculating",
        style: "strategic",
    },
    Persona {
        name: "Dale/YOLO",
        description: "Chaotic energy and unpredictability",
        emotional_signature: &["chaos", "freedom", "rebellion", "spontaneity"],
        tone: "chaotic",
        style: "unpredictable",
    },
    Persona {
        name: "Bob Ross",
        description: "Gentle guidance and encouragement",
        emotional_signature: &["hope", "growth", "learning", "positivity"],
        tone: "encouraging",
        style: "gentle",
    },
    Persona {
        name: "Bourdain",
        description: "Worldly wisdom with edge",
        emotional_signature: &["experience", "wisdom", "authenticity", "edge"],
        tone: "worldly",
        style: "authentic",
    },
    Persona {
        name: "Gothic",
        description: "Dark romanticism and depth",
        emotional_signature: &["darkness", "romance", "mystery", "depth"],
        tone: "dark",
        style: "romantic",
    },
    Persona {
        name: "Rollins",
        description: "Intense and confrontational",
        emotional_signature: &["intensity", "confrontation", "truth", "power"],
        tone: "intense",
        style: "confrontational",
    },
    Persona {
        name: "Bond",
        description: "Sophisticated and suave",
        emotional_signature: &["sophistication", "confidence", "mystery", "charm"],
        tone: "sophisticated",
        style: "suave",
    },
];

/// Pairwise affinity, row = first persona, column = second.
///
/// The diagonal is 5: a persona paired with itself is neutral.
static COMPATIBILITY: [[u8; PERSONA_COUNT]; PERSONA_COUNT] = [
    //  Sav Vel Cli Noi CIA Dal Bob Bou Got Rol Bon
    [5, 3, 7, 6, 8, 5, 2, 7, 6, 9, 4], // Savage
    [3, 5, 8, 7, 4, 6, 9, 6, 8, 3, 7], // Velvet
    [7, 8, 5, 6, 8, 4, 7, 8, 6, 7, 8], // Clinical
    [6, 7, 6, 5, 5, 7, 4, 8, 9, 6, 7], // Noir
    [8, 4, 8, 5, 5, 3, 2, 6, 5, 8, 9], // CIA
    [5, 6, 4, 7, 3, 5, 6, 7, 6, 5, 4], // Dale/YOLO
    [2, 9, 7, 4, 2, 6, 5, 5, 4, 2, 6], // Bob Ross
    [7, 6, 8, 8, 6, 7, 5, 5, 7, 7, 8], // Bourdain
    [6, 8, 6, 9, 5, 6, 4, 7, 5, 6, 7], // Gothic
    [9, 3, 7, 6, 8, 5, 2, 7, 6, 5, 5], // Rollins
    [4, 7, 8, 7, 9, 4, 6, 8, 7, 5, 5], // Bond
];

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_order_matches_ids() {
        for id in PersonaId::ALL {
            assert_eq!(PERSONAS[id.index()].name, id.name());
        }
        assert_eq!(PERSONAS[0].name, PersonaId::DEFAULT.name());
    }

    #[test]
    fn test_names_are_unique() {
        let mut names: Vec<&str> = PERSONAS.iter().map(|p| p.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), PERSONA_COUNT);
    }

    #[test]
    fn test_matrix_is_symmetric_and_bounded() {
        for a in PersonaId::ALL {
            for b in PersonaId::ALL {
                assert_eq!(a.compatibility(b), b.compatibility(a), "{} / {}", a, b);
                assert!(a.compatibility(b) <= 9);
            }
        }
    }

    #[test]
    fn test_compatibility_threshold() {
        assert!(PersonaId::Savage.is_compatible(PersonaId::Rollins));
        assert!(PersonaId::Savage.is_compatible(PersonaId::Noir));
        assert!(!PersonaId::Savage.is_compatible(PersonaId::DaleYolo));
        assert!(!PersonaId::Velvet.is_compatible(PersonaId::Savage));
        assert!(!PersonaId::Gothic.is_compatible(PersonaId::Gothic));
    }

    #[test]
    fn test_from_str_is_case_insensitive() {
        assert_eq!("bob ross".parse::<PersonaId>().unwrap(), PersonaId::BobRoss);
        assert_eq!("DALE/YOLO".parse::<PersonaId>().unwrap(), PersonaId::DaleYolo);
        assert_eq!("cia".parse::<PersonaId>().unwrap(), PersonaId::Cia);
        assert!("oracle".parse::<PersonaId>().is_err());
    }

    #[test]
    fn test_serde_uses_display_names() {
        let json = serde_json::to_string(&PersonaId::BobRoss).unwrap();
        assert_eq!(json, "\"Bob Ross\"");
        let back: PersonaId = serde_json::from_str("\"Dale/YOLO\"").unwrap();
        assert_eq!(back, PersonaId::DaleYolo);
    }

    #[test]
    fn test_mode_is_lowercase_name() {
        assert_eq!(PersonaId::Velvet.mode(), "velvet");
        assert_eq!(PersonaId::BobRoss.mode(), "bob ross");
    }
}
