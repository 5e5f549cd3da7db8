//! Data models
//!
//! Plain data passed into and out of the scoring engine.

mod additive;
mod ingredient;
mod nutrition;
mod portion;
mod product;
mod score;

pub use additive::{Additive, RiskLevel};
pub use ingredient::{
    CleanedIngredients, DropReason, DroppedIngredient, IngredientInput, IngredientRecord,
};
pub use nutrition::{read_value, NutrientBasis, NutrientProfile, RawNutrients, SodiumReading};
pub use portion::{AgeGroup, AgeGroupAdvice, NutrientAdvice, PortionAnalysis, PortionLevel};
pub use product::{
    Barcode, ClassificationConfidence, NovaGroup, Organic, ProductClassification, ProductFacts,
    ProductKind,
};
pub use score::{
    AdditiveScore, AppliedCap, CapRule, NutritionGrade, NutritionScore, ProcessingScore,
    ProcessingSource, RiskCounts, ScoreBreakdown, ScoreLabel, ScoreResult, Subscores,
    ThirdFactor, Weights,
};
