//! Open Food Facts adapter
//!
//! Converts a product document from the Open Food Facts v2 API into
//! [`ProductFacts`]. Values are read leniently: a malformed field is logged
//! and treated as missing so one bad nutriment does not lose the product.

use serde_json::{Map, Value};
use tracing::warn;

use crate::error::{EngineResult, ScoreError};
use crate::models::{
    read_value, Additive, Barcode, NovaGroup, NutrientBasis, Organic, ProductFacts, RawNutrients,
    RiskLevel, SodiumReading,
};
use crate::nutrition::MassUnit;

const ENERGY_KCAL_KEYS: &[&str] = &["energy-kcal_100g", "energy-kcal", "energy_kcal"];
const ENERGY_KJ_KEYS: &[&str] = &["energy-kj_100g", "energy-kj", "energy_kj"];
const SUGARS_KEYS: &[&str] = &["sugars_100g"];
const SATURATED_FAT_KEYS: &[&str] = &["saturated-fat_100g", "saturated_fat_100g"];
/// Reported in grams
const SODIUM_KEYS: &[&str] = &["sodium_100g"];
const SALT_KEYS: &[&str] = &["salt_100g"];
const FIBER_KEYS: &[&str] = &["fiber_100g"];
const PROTEIN_KEYS: &[&str] = &["proteins_100g"];
const FRUIT_VEG_KEYS: &[&str] = &[
    "fruits-vegetables-nuts-estimate-from-ingredients_100g",
    "fruits-vegetables-nuts_100g",
];

/// Validate the barcode and convert an API response into product facts
pub fn parse_response(code: &str, response: &Value) -> EngineResult<ProductFacts> {
    let barcode = Barcode::parse(code)?;
    normalize_product(barcode.as_str(), response)
        .ok_or_else(|| ScoreError::NoProductData(barcode.to_string()))
}

/// Convert an API response into product facts
///
/// Returns `None` when the response carries no `product` object.
pub fn normalize_product(code: &str, response: &Value) -> Option<ProductFacts> {
    let product = response.get("product")?.as_object()?;
    let empty = Map::new();
    let nutriments = product
        .get("nutriments")
        .and_then(Value::as_object)
        .unwrap_or(&empty);

    let name = text(product, "product_name")
        .or_else(|| text(product, "brands"))
        .unwrap_or_else(|| code.to_string());

    let nutrients = RawNutrients {
        energy_kcal: number(nutriments, ENERGY_KCAL_KEYS),
        energy_kj: number(nutriments, ENERGY_KJ_KEYS),
        sugars_g: number(nutriments, SUGARS_KEYS),
        saturated_fat_g: number(nutriments, SATURATED_FAT_KEYS),
        sodium_mg: None,
        sodium: number(nutriments, SODIUM_KEYS).map(|value| SodiumReading {
            value,
            unit: Some(MassUnit::Gram),
        }),
        salt_g: number(nutriments, SALT_KEYS),
        fiber_g: number(nutriments, FIBER_KEYS),
        protein_g: number(nutriments, PROTEIN_KEYS),
        fruit_veg_pct: number(nutriments, FRUIT_VEG_KEYS),
    };

    let additives = product
        .get("additives_tags")
        .and_then(Value::as_array)
        .map(|tags| {
            tags.iter()
                .filter_map(Value::as_str)
                .map(|tag| Additive::tagged(RiskLevel::Unknown, tag))
                .collect()
        })
        .unwrap_or_default();

    let nova_group = product.get("nova_group").filter(|v| !v.is_null()).and_then(|raw| {
        let group = NovaGroup::from_json(raw);
        if group.is_none() {
            warn!("Ignoring NOVA group {} for {}", raw, code);
        }
        group
    });

    let organic = text(product, "labels")
        .map(|labels| {
            let labels = labels.to_lowercase();
            labels.contains("organic") || labels.contains("bio")
        })
        .unwrap_or(false);

    Some(ProductFacts {
        name,
        brand: text(product, "brands"),
        category: text(product, "categories").unwrap_or_default(),
        subcategory: String::new(),
        barcode: Barcode::parse(code).ok(),
        basis: NutrientBasis::Per100g,
        serving_size: number(product, &["serving_quantity"]).filter(|s| *s > 0.0),
        nutrients,
        additives,
        nova_group,
        ingredients_text: text(product, "ingredients_text"),
        ingredients: Vec::new(),
        organic: Some(Organic::Flag(organic)),
    })
}

/// Non-empty trimmed string field
fn text(object: &Map<String, Value>, key: &str) -> Option<String> {
    object
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// First readable number among `keys`; malformed values are skipped
fn number(object: &Map<String, Value>, keys: &[&str]) -> Option<f64> {
    keys.iter().find_map(|key| {
        let value = object.get(*key)?;
        match read_value(key, value) {
            Ok(v) => v.map(|q| q.value).filter(|n| n.is_finite()),
            Err(e) => {
                warn!("Skipping Open Food Facts field: {}", e);
                None
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn chips_response() -> Value {
        json!({
            "code": "0028400090858",
            "product": {
                "product_name": "Classic Potato Chips",
                "brands": "Crunchy Co",
                "categories": "Snacks, Salty snacks, Chips",
                "labels": "Gluten-free",
                "serving_quantity": "28",
                "nova_group": 4,
                "ingredients_text": "Potatoes, vegetable oil, salt",
                "additives_tags": ["en:e330", "en:e621"],
                "nutriments": {
                    "energy-kcal_100g": 536,
                    "sugars_100g": 3.5,
                    "saturated-fat_100g": 5.36,
                    "sodium_100g": 0.714,
                    "salt_100g": 1.785,
                    "fiber_100g": 3.6,
                    "proteins_100g": "7.1"
                }
            }
        })
    }

    #[test]
    fn test_normalize_chips() {
        let facts = normalize_product("0028400090858", &chips_response()).unwrap();
        assert_eq!(facts.name, "Classic Potato Chips");
        assert_eq!(facts.brand.as_deref(), Some("Crunchy Co"));
        assert_eq!(facts.basis, NutrientBasis::Per100g);
        assert_eq!(facts.serving_size, Some(28.0));
        assert_eq!(facts.nova_group, Some(NovaGroup::UltraProcessed));
        assert_eq!(facts.additives.len(), 2);
        assert_eq!(facts.additives[0].risk, RiskLevel::Unknown);
        assert_eq!(facts.additives[1].tag.as_deref(), Some("en:e621"));
        assert_eq!(facts.organic, Some(Organic::Flag(false)));
        assert_eq!(facts.nutrients.protein_g, Some(7.1));
        assert_eq!(facts.barcode.unwrap().as_str(), "0028400090858");
    }

    #[test]
    fn test_sodium_grams_become_milligrams() {
        let facts = normalize_product("0028400090858", &chips_response()).unwrap();
        let mg = crate::nutrition::resolve_sodium_mg(&facts.nutrients);
        assert!((mg - 714.0).abs() < 1e-9);
    }

    #[test]
    fn test_salt_fallback() {
        let response = json!({"product": {"nutriments": {"salt_100g": 2.0}}});
        let facts = normalize_product("12345678", &response).unwrap();
        let mg = crate::nutrition::resolve_sodium_mg(&facts.nutrients);
        assert!((mg - 800.0).abs() < 1e-9);
    }

    #[test]
    fn test_name_fallbacks() {
        let brands_only = json!({"product": {"brands": "Acme"}});
        assert_eq!(normalize_product("12345678", &brands_only).unwrap().name, "Acme");

        let nothing = json!({"product": {"product_name": "  "}});
        assert_eq!(normalize_product("12345678", &nothing).unwrap().name, "12345678");
    }

    #[test]
    fn test_organic_labels() {
        let response = json!({"product": {"labels": "Organic, EU Organic"}});
        let facts = normalize_product("12345678", &response).unwrap();
        assert_eq!(facts.organic, Some(Organic::Flag(true)));

        let response = json!({"product": {"labels": "AB Agriculture Biologique"}});
        let facts = normalize_product("12345678", &response).unwrap();
        assert_eq!(facts.organic, Some(Organic::Flag(true)));
    }

    #[test]
    fn test_malformed_fields_are_skipped() {
        let response = json!({"product": {
            "nova_group": 9,
            "serving_quantity": 0,
            "nutriments": {"sugars_100g": "lots", "fiber_100g": [1]}
        }});
        let facts = normalize_product("12345678", &response).unwrap();
        assert_eq!(facts.nova_group, None);
        assert_eq!(facts.serving_size, None);
        assert_eq!(facts.nutrients.sugars_g, None);
        assert_eq!(facts.nutrients.fiber_g, None);
    }

    #[test]
    fn test_missing_product() {
        assert!(normalize_product("12345678", &json!({"status": 0})).is_none());
        assert!(matches!(
            parse_response("12345678", &json!({"status": 0})),
            Err(ScoreError::NoProductData(_))
        ));
    }

    #[test]
    fn test_invalid_barcode() {
        assert!(matches!(
            parse_response("12ab", &chips_response()),
            Err(ScoreError::InvalidBarcode(_))
        ));
    }
}
