//! Additive model
//!
//! An additive found on a product, tagged with how risky it is considered.

use serde::{Deserialize, Serialize};

/// Risk level of an additive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    High,
    Medium,
    Low,
    #[default]
    #[serde(other)]
    Unknown,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::High => "high",
            RiskLevel::Medium => "medium",
            RiskLevel::Low => "low",
            RiskLevel::Unknown => "unknown",
        }
    }

    /// Parse from string; unrecognized values are `Unknown`
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "high" => RiskLevel::High,
            "medium" | "moderate" => RiskLevel::Medium,
            "low" | "none" => RiskLevel::Low,
            _ => RiskLevel::Unknown,
        }
    }
}

/// An additive on a product's ingredient list
///
/// A product holds an ordered list; duplicates each count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Additive {
    #[serde(default, alias = "risk_level")]
    pub risk: RiskLevel,
    /// Source tag, e.g. "en:e150d"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

impl Additive {
    pub fn new(risk: RiskLevel) -> Self {
        Self { risk, tag: None }
    }

    pub fn tagged(risk: RiskLevel, tag: impl Into<String>) -> Self {
        Self {
            risk,
            tag: Some(tag.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_from_str() {
        assert_eq!(RiskLevel::from_str("HIGH"), RiskLevel::High);
        assert_eq!(RiskLevel::from_str("moderate"), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_str("???"), RiskLevel::Unknown);
    }

    #[test]
    fn test_additive_deserialize() {
        let additives: Vec<Additive> = serde_json::from_str(
            r#"[{"risk": "high"}, {"risk": "weird"}, {"tag": "en:e330"}, {"risk_level": "low"}]"#,
        )
        .unwrap();
        assert_eq!(additives[0].risk, RiskLevel::High);
        assert_eq!(additives[1].risk, RiskLevel::Unknown);
        assert_eq!(additives[2].risk, RiskLevel::Unknown);
        assert_eq!(additives[2].tag.as_deref(), Some("en:e330"));
        assert_eq!(additives[3].risk, RiskLevel::Low);
    }
}
