//! Importance tiers for role skill requirements.
//!
//! The store keeps importance as free text. `Importance::parse` is the only place
//! that text is interpreted; everything downstream works on the enum.

use serde::{Deserialize, Serialize};

/// How heavily a requirement counts toward the fit score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", from = "String")]
pub enum Importance {
    Critical,
    Important,
    NiceToHave,
}

impl Importance {
    /// Decodes a raw importance string. Anything other than `"critical"` or
    /// `"important"` falls back to `NiceToHave`.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "critical" => Importance::Critical,
            "important" => Importance::Important,
            _ => Importance::NiceToHave,
        }
    }

    /// Weight used in the fit score: 3 / 2 / 1.
    pub fn weight(self) -> u32 {
        match self {
            Importance::Critical => 3,
            Importance::Important => 2,
            Importance::NiceToHave => 1,
        }
    }

    /// Sort rank for gap lists, critical first.
    pub fn rank(self) -> u8 {
        match self {
            Importance::Critical => 0,
            Importance::Important => 1,
            Importance::NiceToHave => 2,
        }
    }
}

impl From<String> for Importance {
    fn from(raw: String) -> Self {
        Importance::parse(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_values() {
        assert_eq!(Importance::parse("critical"), Importance::Critical);
        assert_eq!(Importance::parse("important"), Importance::Important);
        assert_eq!(Importance::parse("nice-to-have"), Importance::NiceToHave);
    }

    #[test]
    fn test_unrecognized_falls_back_to_nice_to_have() {
        for raw in ["optional", "", "CRITICAL", " critical", "must-have"] {
            assert_eq!(
                Importance::parse(raw),
                Importance::NiceToHave,
                "'{raw}' should decode to nice-to-have"
            );
        }
    }

    #[test]
    fn test_weights_and_ranks() {
        assert_eq!(Importance::Critical.weight(), 3);
        assert_eq!(Importance::Important.weight(), 2);
        assert_eq!(Importance::NiceToHave.weight(), 1);
        assert!(Importance::Critical.rank() < Importance::Important.rank());
        assert!(Importance::Important.rank() < Importance::NiceToHave.rank());
    }

    #[test]
    fn test_serde_uses_kebab_case_and_degrades_unknown() {
        let json = serde_json::to_string(&Importance::NiceToHave).unwrap();
        assert_eq!(json, "\"nice-to-have\"");

        let parsed: Importance = serde_json::from_str("\"critical\"").unwrap();
        assert_eq!(parsed, Importance::Critical);

        let unknown: Importance = serde_json::from_str("\"optional\"").unwrap();
        assert_eq!(unknown, Importance::NiceToHave);
    }
}
