//! Scoring pipeline
//!
//! [`ScoringEngine`] holds the compiled keyword set and the scoring policy.
//! It is immutable once built, so one engine can be shared by any number of
//! callers.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::additives::{score_additives, score_processing, AdditivePenalties};
use super::category::classify;
use super::composer::{compose, ThirdScore, WeightProfile};
use super::ingredients::clean;
use super::keywords::Keywords;
use super::nutri::score_nutrition;
use super::portion::{advise_portions, PortionScale};
use crate::error::ConfigError;
use crate::models::{
    Additive, CleanedIngredients, IngredientInput, NutrientBasis, NutrientProfile,
    PortionAnalysis, ProductClassification, ProductFacts, RawNutrients, RiskLevel, ScoreResult,
    ThirdFactor,
};
use crate::nutrition::{normalize, units::BASIS_AMOUNT};

/// Tunable scoring policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScoringPolicy {
    pub weight_profile: WeightProfile,
    pub penalties: AdditivePenalties,
    pub portion_scale: PortionScale,
}

/// Where the additive list used for scoring came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdditiveSource {
    /// The provider declared additives
    Declared,
    /// One high-risk additive per harmful ingredient
    HarmfulIngredients,
    /// Nothing declared or derivable
    Unavailable,
}

/// Everything the pipeline produced for one product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
    pub classification: ProductClassification,
    pub per100: NutrientProfile,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<CleanedIngredients>,
    pub additive_source: AdditiveSource,
    pub score: ScoreResult,
    /// Serving size the portion advice is based on, in g or ml
    pub serving_size: f64,
    pub portion: PortionAnalysis,
}

/// The scoring engine
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    keywords: Keywords,
    policy: ScoringPolicy,
}

impl ScoringEngine {
    pub fn new(keywords: Keywords, policy: ScoringPolicy) -> Self {
        Self { keywords, policy }
    }

    /// Engine with the built-in keyword set and default policy
    pub fn builtin() -> Result<Self, ConfigError> {
        Ok(Self::new(Keywords::builtin()?, ScoringPolicy::default()))
    }

    pub fn keywords(&self) -> &Keywords {
        &self.keywords
    }

    pub fn policy(&self) -> &ScoringPolicy {
        &self.policy
    }

    pub fn classify(&self, name: &str, category: &str, subcategory: &str) -> ProductClassification {
        classify(&self.keywords, name, category, subcategory)
    }

    pub fn clean_ingredients(
        &self,
        ingredients: &[IngredientInput],
        source_text: Option<&str>,
    ) -> CleanedIngredients {
        clean(&self.keywords, ingredients, source_text)
    }

    pub fn normalize(
        &self,
        raw: &RawNutrients,
        basis: NutrientBasis,
        serving_size: Option<f64>,
    ) -> NutrientProfile {
        normalize(raw, basis, serving_size)
    }

    /// Portion advice from absolute amounts
    pub fn advise_portions(&self, sugar_g: f64, sodium_mg: f64, saturated_fat_g: f64) -> PortionAnalysis {
        advise_portions(self.policy.portion_scale, sugar_g, sodium_mg, saturated_fat_g)
    }

    /// Run the whole pipeline for one product
    pub fn analyze(&self, facts: &ProductFacts) -> AnalysisReport {
        let classification = self.classify(&facts.name, &facts.category, &facts.subcategory);
        let per100 = self.normalize(&facts.nutrients, facts.basis, facts.serving_size);

        let ingredients = if facts.ingredients.is_empty() {
            None
        } else {
            Some(self.clean_ingredients(&facts.ingredients, facts.ingredients_text.as_deref()))
        };

        let (additives, additive_source) = self.additives_for(facts, ingredients.as_ref());
        let ingredient_text = ingredient_text(facts, ingredients.as_ref());

        let nutrition = score_nutrition(&per100, &classification);
        let additive_score = score_additives(
            &self.keywords,
            &self.policy.penalties,
            &additives,
            &ingredient_text,
        );

        let weights = self.policy.weight_profile.weights();
        let third = match weights.third_factor {
            ThirdFactor::Organic => {
                ThirdScore::Organic(facts.organic.map(|o| o.percent()).unwrap_or(0))
            }
            ThirdFactor::Processing => ThirdScore::Processing(score_processing(
                &self.keywords,
                facts.nova_group,
                &ingredient_text,
            )),
        };

        let score = compose(
            &weights,
            &nutrition,
            &additive_score,
            third,
            &per100,
            classification.kind,
        );

        let serving_size = facts
            .serving_size
            .filter(|s| s.is_finite() && *s > 0.0)
            .unwrap_or(BASIS_AMOUNT);
        let portion_amounts = per100 * (serving_size / BASIS_AMOUNT);
        let portion = self.advise_portions(
            portion_amounts.sugars_g,
            portion_amounts.sodium_mg,
            portion_amounts.saturated_fat_g,
        );

        debug!(
            "Scored '{}': {} ({}), nutrition {} additives {}",
            facts.name,
            score.overall,
            score.label.as_str(),
            nutrition.letter.as_str(),
            additive_score.percent
        );

        AnalysisReport {
            name: facts.name.clone(),
            brand: facts.brand.clone(),
            barcode: facts.barcode.as_ref().map(|b| b.to_string()),
            classification,
            per100,
            ingredients,
            additive_source,
            score,
            serving_size,
            portion,
        }
    }

    fn additives_for(
        &self,
        facts: &ProductFacts,
        ingredients: Option<&CleanedIngredients>,
    ) -> (Vec<Additive>, AdditiveSource) {
        if !facts.additives.is_empty() {
            return (facts.additives.clone(), AdditiveSource::Declared);
        }

        let derived: Vec<Additive> = ingredients
            .map(|cleaned| {
                cleaned
                    .harmful()
                    .map(|record| Additive::tagged(RiskLevel::High, record.name.clone()))
                    .collect()
            })
            .unwrap_or_default();

        if derived.is_empty() {
            (derived, AdditiveSource::Unavailable)
        } else {
            (derived, AdditiveSource::HarmfulIngredients)
        }
    }
}

/// Text searched for ultra-processed markers
fn ingredient_text(facts: &ProductFacts, ingredients: Option<&CleanedIngredients>) -> String {
    match (&facts.ingredients_text, ingredients) {
        (Some(text), _) if !text.trim().is_empty() => text.clone(),
        (_, Some(cleaned)) => cleaned.names().join(", "),
        _ => String::new(),
    }
}
