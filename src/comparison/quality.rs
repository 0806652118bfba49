// Qualitative match grade for a similarity score.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Serialized as its label ("Good match"), the same text stored in the
/// `analyses.quality` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum MatchQuality {
    Excellent,
    Good,
    Fair,
    Poor,
    VeryPoor,
}

impl MatchQuality {
    /// Grade a similarity score (0.0 to 1.0).
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= 0.8 => MatchQuality::Excellent,
            s if s >= 0.6 => MatchQuality::Good,
            s if s >= 0.4 => MatchQuality::Fair,
            s if s >= 0.2 => MatchQuality::Poor,
            _ => MatchQuality::VeryPoor,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchQuality::Excellent => "Excellent match",
            MatchQuality::Good => "Good match",
            MatchQuality::Fair => "Fair match",
            MatchQuality::Poor => "Poor match",
            MatchQuality::VeryPoor => "Very poor match",
        }
    }

    /// Inverse of `as_str`, used when reading rows back from the database.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Excellent match" => Some(MatchQuality::Excellent),
            "Good match" => Some(MatchQuality::Good),
            "Fair match" => Some(MatchQuality::Fair),
            "Poor match" => Some(MatchQuality::Poor),
            "Very poor match" => Some(MatchQuality::VeryPoor),
            _ => None,
        }
    }
}

impl fmt::Display for MatchQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<MatchQuality> for String {
    fn from(quality: MatchQuality) -> Self {
        quality.as_str().to_string()
    }
}

impl TryFrom<String> for MatchQuality {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        MatchQuality::parse(&s).ok_or_else(|| format!("unknown match quality {s:?}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries() {
        assert_eq!(MatchQuality::from_score(0.8), MatchQuality::Excellent);
        assert_eq!(MatchQuality::from_score(0.7999), MatchQuality::Good);
        assert_eq!(MatchQuality::from_score(0.6), MatchQuality::Good);
        assert_eq!(MatchQuality::from_score(0.4), MatchQuality::Fair);
        assert_eq!(MatchQuality::from_score(0.2), MatchQuality::Poor);
        assert_eq!(MatchQuality::from_score(0.1999), MatchQuality::VeryPoor);
        assert_eq!(MatchQuality::from_score(0.0), MatchQuality::VeryPoor);
    }

    #[test]
    fn test_nan_is_very_poor() {
        assert_eq!(MatchQuality::from_score(f64::NAN), MatchQuality::VeryPoor);
    }

    #[test]
    fn test_serializes_as_label() {
        assert_eq!(
            serde_json::to_string(&MatchQuality::VeryPoor).unwrap(),
            "\"Very poor match\""
        );
        let q: MatchQuality = serde_json::from_str("\"Good match\"").unwrap();
        assert_eq!(q, MatchQuality::Good);
        assert!(serde_json::from_str::<MatchQuality>("\"Good\"").is_err());
    }

    #[test]
    fn test_as_str_parse_inverse() {
        for q in [
            MatchQuality::Excellent,
            MatchQuality::Good,
            MatchQuality::Fair,
            MatchQuality::Poor,
            MatchQuality::VeryPoor,
        ] {
            assert_eq!(MatchQuality::parse(q.as_str()), Some(q));
        }
    }
}
