//! Product model
//!
//! Product-level facts handed to the scoring pipeline and the category the
//! classifier derives from them.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::error::ScoreError;
use super::{read_value, Additive, IngredientInput, NutrientBasis, RawNutrients};

/// Scoring category of a product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductKind {
    #[serde(rename = "foods")]
    Foods,
    #[serde(rename = "beverages")]
    Beverages,
    #[serde(rename = "beverages-water")]
    BeveragesWater,
}

impl ProductKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductKind::Foods => "foods",
            ProductKind::Beverages => "beverages",
            ProductKind::BeveragesWater => "beverages-water",
        }
    }

    /// Water or any other drink
    pub fn is_beverage(&self) -> bool {
        matches!(self, ProductKind::Beverages | ProductKind::BeveragesWater)
    }
}

/// How the classifier reached its decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassificationConfidence {
    /// A keyword set matched
    Keyword,
    /// Nothing matched; fell back to foods
    Default,
}

/// Result of the category classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductClassification {
    pub kind: ProductKind,
    pub is_dairy_like: bool,
    pub is_cheese: bool,
    pub confidence: ClassificationConfidence,
}

impl ProductClassification {
    /// Plain food classification with no keyword evidence
    pub fn foods() -> Self {
        Self {
            kind: ProductKind::Foods,
            is_dairy_like: false,
            is_cheese: false,
            confidence: ClassificationConfidence::Default,
        }
    }
}

/// NOVA food-processing group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum NovaGroup {
    Unprocessed = 1,
    ProcessedIngredients = 2,
    Processed = 3,
    UltraProcessed = 4,
}

impl NovaGroup {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(NovaGroup::Unprocessed),
            2 => Some(NovaGroup::ProcessedIngredients),
            3 => Some(NovaGroup::Processed),
            4 => Some(NovaGroup::UltraProcessed),
            _ => None,
        }
    }

    pub fn code(&self) -> u8 {
        *self as u8
    }

    /// Read a group from a JSON number or numeric string
    ///
    /// Anything outside 1-4, fractional codes included, is `None`.
    pub fn from_json(value: &Value) -> Option<Self> {
        let reading = read_value("nova_group", value).ok()??;
        if reading.unit.is_some() || reading.value.fract() != 0.0 {
            return None;
        }
        NovaGroup::from_code(reading.value as i64)
    }
}

/// Unknown or malformed NOVA codes read as "not reported"
fn lenient_nova_group<'de, D>(deserializer: D) -> Result<Option<NovaGroup>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    let group = NovaGroup::from_json(&value);
    if group.is_none() {
        warn!("Ignoring NOVA group {}", value);
    }
    Ok(group)
}

impl TryFrom<u8> for NovaGroup {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        NovaGroup::from_code(code as i64).ok_or_else(|| format!("NOVA group must be 1-4, got {}", code))
    }
}

impl From<NovaGroup> for u8 {
    fn from(group: NovaGroup) -> u8 {
        group.code()
    }
}

/// Organic signal: a label flag or a certified-organic share in percent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Organic {
    Flag(bool),
    Percent(f64),
}

impl Organic {
    /// Organic share in percent, clamped to 0-100
    pub fn percent(&self) -> u8 {
        match self {
            Organic::Flag(true) => 100,
            Organic::Flag(false) => 0,
            Organic::Percent(p) if p.is_finite() => p.clamp(0.0, 100.0).round() as u8,
            Organic::Percent(_) => 0,
        }
    }
}

/// A validated product barcode (EAN-8 through GTIN-14)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Barcode(String);

impl Barcode {
    pub fn parse(code: &str) -> Result<Self, ScoreError> {
        let trimmed = code.trim();
        let valid = (8..=14).contains(&trimmed.len()) && trimmed.bytes().all(|b| b.is_ascii_digit());
        if valid {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(ScoreError::InvalidBarcode(code.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Barcode {
    type Error = String;

    fn try_from(code: String) -> Result<Self, Self::Error> {
        Barcode::parse(&code).map_err(|e| e.to_string())
    }
}

impl From<Barcode> for String {
    fn from(code: Barcode) -> String {
        code.0
    }
}

impl std::fmt::Display for Barcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything known about one product, as gathered by upstream providers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductFacts {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub subcategory: String,
    #[serde(default)]
    pub barcode: Option<Barcode>,
    #[serde(default, alias = "nutrients_basis")]
    pub basis: NutrientBasis,
    /// Serving size in g or ml
    #[serde(default, alias = "serving_size_gml")]
    pub serving_size: Option<f64>,
    #[serde(default)]
    pub nutrients: RawNutrients,
    /// Declared additives; empty when the provider reported none
    #[serde(default)]
    pub additives: Vec<Additive>,
    #[serde(default, deserialize_with = "lenient_nova_group")]
    pub nova_group: Option<NovaGroup>,
    #[serde(default)]
    pub ingredients_text: Option<String>,
    #[serde(default, alias = "ingredients_list")]
    pub ingredients: Vec<IngredientInput>,
    #[serde(default)]
    pub organic: Option<Organic>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nova_group_codes() {
        assert_eq!(NovaGroup::from_code(4), Some(NovaGroup::UltraProcessed));
        assert_eq!(NovaGroup::from_code(0), None);
        assert_eq!(NovaGroup::from_code(5), None);
        assert_eq!(NovaGroup::Processed.code(), 3);
    }

    #[test]
    fn test_nova_group_serde() {
        let group: NovaGroup = serde_json::from_str("2").unwrap();
        assert_eq!(group, NovaGroup::ProcessedIngredients);
        assert!(serde_json::from_str::<NovaGroup>("7").is_err());
        assert_eq!(serde_json::to_string(&NovaGroup::UltraProcessed).unwrap(), "4");
    }

    #[test]
    fn test_product_facts_tolerate_odd_nova_group() {
        let read = |nova: &str| {
            serde_json::from_str::<ProductFacts>(&format!(r#"{{"name": "Bar", "nova_group": {}}}"#, nova))
                .unwrap()
                .nova_group
        };
        assert_eq!(read("0"), None);
        assert_eq!(read("5"), None);
        assert_eq!(read("2.5"), None);
        assert_eq!(read(r#""ultra""#), None);
        assert_eq!(read("null"), None);
        assert_eq!(read(r#""4""#), Some(NovaGroup::UltraProcessed));
        assert_eq!(read("3"), Some(NovaGroup::Processed));
    }

    #[test]
    fn test_organic_percent() {
        assert_eq!(Organic::Flag(true).percent(), 100);
        assert_eq!(Organic::Flag(false).percent(), 0);
        assert_eq!(Organic::Percent(140.0).percent(), 100);
        assert_eq!(Organic::Percent(-3.0).percent(), 0);
        assert_eq!(Organic::Percent(62.4).percent(), 62);
    }

    #[test]
    fn test_barcode_validation() {
        assert!(Barcode::parse("3017620422003").is_ok());
        assert!(Barcode::parse("12345678").is_ok());
        assert!(Barcode::parse("1234567").is_err());
        assert!(Barcode::parse("123456789012345").is_err());
        assert!(Barcode::parse("30176204220a3").is_err());
    }

    #[test]
    fn test_product_kind_serde() {
        assert_eq!(
            serde_json::to_string(&ProductKind::BeveragesWater).unwrap(),
            r#""beverages-water""#
        );
    }

    #[test]
    fn test_product_facts_deserialize_minimal() {
        let facts: ProductFacts = serde_json::from_str(
            r#"{
                "name": "Reduced Fat Milk 2%",
                "category": "dairy milk",
                "nutrients_basis": "per100ml",
                "serving_size_gml": 240,
                "nutrients": {"energy_kcal": 60, "sugars_g": 5.8},
                "organic": true
            }"#,
        )
        .unwrap();
        assert_eq!(facts.basis, NutrientBasis::Per100ml);
        assert_eq!(facts.serving_size, Some(240.0));
        assert_eq!(facts.nutrients.sugars_g, Some(5.8));
        assert_eq!(facts.organic, Some(Organic::Flag(true)));
        assert!(facts.additives.is_empty());
    }
}
