use serde::{Deserialize, Serialize};

/// Taxonomic level of a geochronological interval
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Rank {
    SuperEon,
    Eon,
    Era,
    Period,
    SubPeriod,
    Epoch,
    Age,
    /// Any rank label not in the standard chart, kept verbatim
    Other(String),
}

impl Rank {
    /// Parse a rank label, ignoring case, spaces, and hyphens.
    ///
    /// Returns `None` for blank input so that an empty CSV cell stays unknown.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return None;
        }

        let key: String = trimmed
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .flat_map(char::to_lowercase)
            .collect();

        Some(match key.as_str() {
            "supereon" => Self::SuperEon,
            "eon" => Self::Eon,
            "era" => Self::Era,
            "period" => Self::Period,
            "subperiod" => Self::SubPeriod,
            "epoch" => Self::Epoch,
            "age" | "stage" => Self::Age,
            _ => Self::Other(trimmed.to_string()),
        })
    }
}

impl std::fmt::Display for Rank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SuperEon => write!(f, "super-eon"),
            Self::Eon => write!(f, "eon"),
            Self::Era => write!(f, "era"),
            Self::Period => write!(f, "period"),
            Self::SubPeriod => write!(f, "sub-period"),
            Self::Epoch => write!(f, "epoch"),
            Self::Age => write!(f, "age"),
            Self::Other(name) => write!(f, "{name}"),
        }
    }
}

impl From<String> for Rank {
    fn from(s: String) -> Self {
        Self::parse(&s).unwrap_or(Self::Other(s))
    }
}

impl From<Rank> for String {
    fn from(rank: Rank) -> Self {
        rank.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_standard_ranks() {
        assert_eq!(Rank::parse("Epoch"), Some(Rank::Epoch));
        assert_eq!(Rank::parse("sub-period"), Some(Rank::SubPeriod));
        assert_eq!(Rank::parse("Super Eon"), Some(Rank::SuperEon));
        assert_eq!(Rank::parse("stage"), Some(Rank::Age));
    }

    #[test]
    fn test_parse_blank_is_unknown() {
        assert_eq!(Rank::parse(""), None);
        assert_eq!(Rank::parse("   "), None);
    }

    #[test]
    fn test_other_rank_kept_verbatim() {
        let rank = Rank::parse("Chron").unwrap();
        assert_eq!(rank, Rank::Other("Chron".to_string()));
        assert_eq!(rank.to_string(), "Chron");
    }

    #[test]
    fn test_serializes_as_string() {
        let json = serde_json::to_string(&Rank::SubPeriod).unwrap();
        assert_eq!(json, "\"sub-period\"");

        let parsed: Rank = serde_json::from_str("\"EPOCH\"").unwrap();
        assert_eq!(parsed, Rank::Epoch);
    }
}
