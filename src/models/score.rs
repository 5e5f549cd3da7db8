//! Score models
//!
//! Sub-score details and the composed score returned to callers. Everything
//! here serializes directly to the JSON the UI layer renders.

use serde::{Deserialize, Serialize};

use super::{NutrientProfile, ProductKind};

/// Nutri-Score style letter grade
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum NutritionGrade {
    A,
    B,
    C,
    D,
    E,
}

impl NutritionGrade {
    /// Percent the grade contributes to the nutrition sub-score
    pub fn percent(&self) -> u8 {
        match self {
            NutritionGrade::A => 100,
            NutritionGrade::B => 80,
            NutritionGrade::C => 60,
            NutritionGrade::D => 40,
            NutritionGrade::E => 20,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NutritionGrade::A => "A",
            NutritionGrade::B => "B",
            NutritionGrade::C => "C",
            NutritionGrade::D => "D",
            NutritionGrade::E => "E",
        }
    }
}

/// Overall verdict shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScoreLabel {
    Excellent,
    Good,
    Mediocre,
    Bad,
}

impl ScoreLabel {
    /// Label for an overall score
    pub fn from_score(score: u8) -> Self {
        match score {
            75..=u8::MAX => ScoreLabel::Excellent,
            50..=74 => ScoreLabel::Good,
            25..=49 => ScoreLabel::Mediocre,
            _ => ScoreLabel::Bad,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreLabel::Excellent => "Excellent",
            ScoreLabel::Good => "Good",
            ScoreLabel::Mediocre => "Mediocre",
            ScoreLabel::Bad => "Bad",
        }
    }
}

/// Detail of the nutrition sub-score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NutritionScore {
    pub percent: u8,
    pub letter: NutritionGrade,
    /// Negative points minus counted positive points
    pub raw: i32,
    /// Energy, sugar, saturated fat and sodium points
    pub negative_points: i32,
    /// Fruit/veg, fiber and (unless suppressed) protein points
    pub positive_points: i32,
    pub fruit_veg_points: i32,
    pub fiber_points: i32,
    pub protein_points: i32,
    pub protein_counted: bool,
    pub kind: ProductKind,
    pub per100: NutrientProfile,
}

/// Count of additives per risk level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskCounts {
    pub high: u32,
    pub medium: u32,
    pub low: u32,
    pub unknown: u32,
}

/// Detail of the additive sub-score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdditiveScore {
    pub percent: u8,
    pub penalty: u32,
    pub counts: RiskCounts,
    /// No additives were listed, so a baseline was used instead of 100
    pub baseline_applied: bool,
    pub ultra_processed_match: bool,
}

/// Where the processing sub-score came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingSource {
    Nova,
    KeywordHeuristic,
}

/// Detail of the processing sub-score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingScore {
    pub percent: u8,
    pub source: ProcessingSource,
    pub nova_group: Option<u8>,
    pub ultra_processed_match: bool,
}

/// Third blended factor, depending on the weighting profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThirdFactor {
    Organic,
    Processing,
}

/// Sub-score weights; always sum to 1.0
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    pub nutrition: f64,
    pub additives: f64,
    pub third: f64,
    pub third_factor: ThirdFactor,
}

/// A hard cap that lowered the weighted score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapRule {
    FoodSugar,
    FoodSaturatedFat,
    FoodSodium,
    BeverageSugar,
}

impl CapRule {
    pub fn description(&self) -> &'static str {
        match self {
            CapRule::FoodSugar => "Sugar above 20 g/100g",
            CapRule::FoodSaturatedFat => "Saturated fat above 10 g/100g",
            CapRule::FoodSodium => "Sodium above 800 mg/100g",
            CapRule::BeverageSugar => "Sugar above 8 g/100ml in a beverage",
        }
    }
}

/// A triggered cap and the ceiling it imposed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedCap {
    pub rule: CapRule,
    pub limit: u8,
}

/// Sub-scores that went into the blend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscores {
    pub nutrition: u8,
    pub additives: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organic: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing: Option<u8>,
}

/// Structured detail behind a score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub weights: Weights,
    /// Weighted blend before caps
    pub weighted: u8,
    pub caps_applied: Vec<AppliedCap>,
    pub kind: ProductKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nutrition: Option<NutritionScore>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additives: Option<AdditiveScore>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing: Option<ProcessingScore>,
}

/// Final score for a product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub overall: u8,
    pub label: ScoreLabel,
    pub subscores: Subscores,
    pub breakdown: ScoreBreakdown,
}
