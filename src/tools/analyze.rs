//! Scoring tools
//!
//! The operations behind the server's scoring tools. Each takes the shared
//! engine plus loosely-typed tool input and returns serializable output.

use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::cache::ResultCache;
use crate::error::{EngineResult, NutrientError, ScoreError};
use crate::models::{
    Barcode, CleanedIngredients, NutrientBasis, NutrientProfile, PortionAnalysis,
    ProductClassification, ProductFacts, RawNutrients,
};
use crate::scoring::{clean_json, AnalysisReport, ScoringEngine};
use crate::sources::open_food_facts;

/// A food-database product score, possibly served from cache
#[derive(Debug, Clone, Serialize)]
pub struct ScoredProduct {
    pub barcode: String,
    pub cached: bool,
    pub report: AnalysisReport,
}

/// Normalized nutrients along with the inputs they came from
#[derive(Debug, Clone, Serialize)]
pub struct NormalizedNutrients {
    pub basis: NutrientBasis,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serving_size: Option<f64>,
    pub per100: NutrientProfile,
}

/// Score product facts given as JSON
pub fn analyze_product(engine: &ScoringEngine, product: Value) -> EngineResult<AnalysisReport> {
    let facts: ProductFacts = serde_json::from_value(product).map_err(ScoreError::InvalidProduct)?;
    Ok(engine.analyze(&facts))
}

/// Score an Open Food Facts response, consulting the cache by barcode first
pub fn score_food_database_product(
    engine: &ScoringEngine,
    cache: &dyn ResultCache,
    code: &str,
    response: &Value,
) -> EngineResult<ScoredProduct> {
    let barcode = Barcode::parse(code)?;

    if let Some(report) = cache.get(barcode.as_str()) {
        info!("Serving cached score for {}", barcode);
        return Ok(ScoredProduct {
            barcode: barcode.to_string(),
            cached: true,
            report,
        });
    }

    let facts = open_food_facts::parse_response(barcode.as_str(), response)?;
    let report = engine.analyze(&facts);
    cache.put(barcode.as_str(), report.clone());
    info!(
        "Scored {} ({}): {} {}",
        barcode,
        report.name,
        report.score.overall,
        report.score.label.as_str()
    );

    Ok(ScoredProduct {
        barcode: barcode.to_string(),
        cached: false,
        report,
    })
}

/// Clean an ingredient list given as JSON
pub fn clean_ingredients(
    engine: &ScoringEngine,
    ingredients: &Value,
    source_text: Option<&str>,
) -> EngineResult<CleanedIngredients> {
    Ok(clean_json(engine.keywords(), ingredients, source_text)?)
}

pub fn classify_product(
    engine: &ScoringEngine,
    name: &str,
    category: Option<&str>,
    subcategory: Option<&str>,
) -> ProductClassification {
    engine.classify(name, category.unwrap_or(""), subcategory.unwrap_or(""))
}

/// Parse and normalize a nutrient bundle
pub fn normalize_nutrients(
    engine: &ScoringEngine,
    nutrients: &Value,
    basis: Option<&str>,
    serving_size: Option<f64>,
) -> EngineResult<NormalizedNutrients> {
    let basis = match basis {
        Some(text) => NutrientBasis::from_str(text).ok_or_else(|| NutrientError::InvalidValue {
            field: "basis".to_string(),
            value: text.to_string(),
        })?,
        None => NutrientBasis::default(),
    };
    let raw = RawNutrients::from_json(nutrients)?;
    Ok(NormalizedNutrients {
        basis,
        serving_size,
        per100: engine.normalize(&raw, basis, serving_size),
    })
}

/// Portion advice for absolute amounts
pub fn portion_analysis(
    engine: &ScoringEngine,
    sugar_g: f64,
    sodium_mg: f64,
    saturated_fat_g: f64,
) -> PortionAnalysis {
    engine.advise_portions(sugar_g, sodium_mg, saturated_fat_g)
}
