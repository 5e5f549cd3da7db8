//! Unit types and conversion constants
//!
//! Provides types for the units nutrient readings arrive in and the factors
//! used to bring them onto the canonical scoring basis.

use serde::{Deserialize, Serialize};

// ============================================================================
// Conversion Constants
// ============================================================================

/// Kilojoules per kilocalorie
pub const KJ_PER_KCAL: f64 = 4.184;
/// Milligrams per gram
pub const MG_PER_G: f64 = 1000.0;
/// Milligrams of sodium per gram of salt (salt is ~40% sodium)
pub const SODIUM_MG_PER_SALT_G: f64 = 400.0;
/// Size of the canonical basis (100 g or 100 ml)
pub const BASIS_AMOUNT: f64 = 100.0;

/// Mass unit of a nutrient reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MassUnit {
    #[serde(rename = "mcg", alias = "ug", alias = "µg", alias = "microgram", alias = "micrograms")]
    Microgram,
    #[serde(rename = "mg", alias = "milligram", alias = "milligrams")]
    Milligram,
    #[serde(rename = "g", alias = "gram", alias = "grams")]
    Gram,
    #[serde(rename = "kg", alias = "kilogram", alias = "kilograms")]
    Kilogram,
}

impl MassUnit {
    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "mcg" | "ug" | "µg" | "microgram" | "micrograms" => Some(MassUnit::Microgram),
            "mg" | "milligram" | "milligrams" => Some(MassUnit::Milligram),
            "g" | "gr" | "gram" | "grams" => Some(MassUnit::Gram),
            "kg" | "kilogram" | "kilograms" => Some(MassUnit::Kilogram),
            _ => None,
        }
    }

    /// Conversion factor to milligrams
    pub fn milligrams_per_unit(&self) -> f64 {
        match self {
            MassUnit::Microgram => 0.001,
            MassUnit::Milligram => 1.0,
            MassUnit::Gram => MG_PER_G,
            MassUnit::Kilogram => MG_PER_G * MG_PER_G,
        }
    }

    /// Convert a quantity in this unit to milligrams
    pub fn to_milligrams(&self, value: f64) -> f64 {
        value * self.milligrams_per_unit()
    }
}

/// Energy unit of a reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnergyUnit {
    Kcal,
    Kj,
}

impl EnergyUnit {
    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "kcal" | "cal" | "calorie" | "calories" => Some(EnergyUnit::Kcal),
            "kj" | "kilojoule" | "kilojoules" => Some(EnergyUnit::Kj),
            _ => None,
        }
    }
}

/// Convert kilocalories to kilojoules
pub fn kcal_to_kj(kcal: f64) -> f64 {
    kcal * KJ_PER_KCAL
}

/// Estimate sodium in milligrams from grams of salt
pub fn salt_to_sodium_mg(salt_g: f64) -> f64 {
    salt_g * SODIUM_MG_PER_SALT_G
}

/// A numeric reading parsed from label text, e.g. "12.5 g" or "<0.5g"
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedQuantity {
    pub value: f64,
    /// Unit suffix as written, lowercased; None when the text was a bare number
    pub unit: Option<String>,
}

/// Parse a label quantity string into its number and optional unit suffix
///
/// Examples:
/// - "12.5" -> 12.5, no unit
/// - "12.5 g" -> 12.5, "g"
/// - "<0.5g" -> 0.5, "g"
/// - "3,2 mg" -> 3.2, "mg"
///
/// Returns None when the text does not start with a number.
pub fn parse_quantity(text: &str) -> Option<ParsedQuantity> {
    let trimmed = text.trim().trim_start_matches(['<', '>', '~', '≈']).trim();

    let split = trimmed
        .char_indices()
        .find(|(_, c)| !(c.is_ascii_digit() || *c == '.' || *c == ',' || *c == '-'))
        .map(|(i, _)| i)
        .unwrap_or(trimmed.len());

    let number = trimmed[..split].replace(',', ".");
    let value = number.parse::<f64>().ok()?;
    if !value.is_finite() {
        return None;
    }

    let suffix = trimmed[split..].trim().to_lowercase();
    let unit = if suffix.is_empty() { None } else { Some(suffix) };

    Some(ParsedQuantity { value, unit })
}
