//! Score composer
//!
//! Blends the sub-scores with a weighting profile, then applies hard caps as
//! a final `min`. Caps can only lower a score.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::models::{
    AdditiveScore, AppliedCap, CapRule, NutrientProfile, NutritionScore, ProcessingScore,
    ProductKind, ScoreBreakdown, ScoreLabel, ScoreResult, Subscores, ThirdFactor, Weights,
};

/// Sub-score weighting profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightProfile {
    /// Nutrition 60%, additives 30%, organic 10%
    #[default]
    #[serde(alias = "organic")]
    OrganicBonus,
    /// Nutrition 60%, additives 25%, processing 15%
    Processing,
}

impl WeightProfile {
    pub fn weights(&self) -> Weights {
        match self {
            WeightProfile::OrganicBonus => Weights {
                nutrition: 0.60,
                additives: 0.30,
                third: 0.10,
                third_factor: ThirdFactor::Organic,
            },
            WeightProfile::Processing => Weights {
                nutrition: 0.60,
                additives: 0.25,
                third: 0.15,
                third_factor: ThirdFactor::Processing,
            },
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "organic" | "organic_bonus" | "organic-bonus" => Some(WeightProfile::OrganicBonus),
            "processing" | "nova" => Some(WeightProfile::Processing),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WeightProfile::OrganicBonus => "organic",
            WeightProfile::Processing => "processing",
        }
    }
}

/// The third blended sub-score
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ThirdScore {
    /// Organic share, 0-100
    Organic(u8),
    Processing(ProcessingScore),
}

impl ThirdScore {
    pub fn percent(&self) -> u8 {
        match self {
            ThirdScore::Organic(p) => *p,
            ThirdScore::Processing(score) => score.percent,
        }
    }
}

/// Caps triggered by a per-100 profile
pub fn caps_for(profile: &NutrientProfile, kind: ProductKind) -> Vec<AppliedCap> {
    let mut caps = Vec::new();
    match kind {
        ProductKind::BeveragesWater => {}
        ProductKind::Beverages => {
            if profile.sugars_g > 8.0 {
                caps.push(AppliedCap { rule: CapRule::BeverageSugar, limit: 40 });
            }
        }
        ProductKind::Foods => {
            if profile.sugars_g > 20.0 {
                caps.push(AppliedCap { rule: CapRule::FoodSugar, limit: 45 });
            }
            if profile.saturated_fat_g > 10.0 {
                caps.push(AppliedCap { rule: CapRule::FoodSaturatedFat, limit: 35 });
            }
            if profile.sodium_mg > 800.0 {
                caps.push(AppliedCap { rule: CapRule::FoodSodium, limit: 35 });
            }
        }
    }
    caps
}

/// Weighted blend rounded to 0-100
pub fn blend(weights: &Weights, nutrition: u8, additives: u8, third: u8) -> u8 {
    let total = weights.nutrition * nutrition as f64
        + weights.additives * additives as f64
        + weights.third * third as f64;
    total.round().clamp(0.0, 100.0) as u8
}

/// Compose the final score
pub fn compose(
    weights: &Weights,
    nutrition: &NutritionScore,
    additives: &AdditiveScore,
    third: ThirdScore,
    profile: &NutrientProfile,
    kind: ProductKind,
) -> ScoreResult {
    let weighted = blend(weights, nutrition.percent, additives.percent, third.percent());

    let caps_applied = caps_for(profile, kind);
    let overall = caps_applied
        .iter()
        .map(|cap| cap.limit)
        .fold(weighted, u8::min);

    if overall < weighted {
        let rules: Vec<&str> = caps_applied.iter().map(|c| c.rule.description()).collect();
        info!("Score capped from {} to {}: {}", weighted, overall, rules.join("; "));
    }

    let (organic, processing) = match third {
        ThirdScore::Organic(p) => (Some(p), None),
        ThirdScore::Processing(score) => (None, Some(score)),
    };

    ScoreResult {
        overall,
        label: ScoreLabel::from_score(overall),
        subscores: Subscores {
            nutrition: nutrition.percent,
            additives: additives.percent,
            organic,
            processing: processing.map(|p| p.percent),
        },
        breakdown: ScoreBreakdown {
            weights: *weights,
            weighted,
            caps_applied,
            kind,
            nutrition: Some(*nutrition),
            additives: Some(*additives),
            processing,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NutritionGrade, ProcessingSource, RiskCounts};

    fn nutrition(percent: u8, kind: ProductKind) -> NutritionScore {
        NutritionScore {
            percent,
            letter: NutritionGrade::C,
            raw: 5,
            negative_points: 5,
            positive_points: 0,
            fruit_veg_points: 0,
            fiber_points: 0,
            protein_points: 0,
            protein_counted: true,
            kind,
            per100: NutrientProfile::zero(),
        }
    }

    fn additives(percent: u8) -> AdditiveScore {
        AdditiveScore {
            percent,
            penalty: 100 - percent as u32,
            counts: RiskCounts::default(),
            baseline_applied: false,
            ultra_processed_match: false,
        }
    }

    #[test]
    fn test_profile_weights_sum_to_one() {
        for profile in [WeightProfile::OrganicBonus, WeightProfile::Processing] {
            let w = profile.weights();
            assert!((w.nutrition + w.additives + w.third - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_profile_from_str() {
        assert_eq!(WeightProfile::from_str("Organic"), Some(WeightProfile::OrganicBonus));
        assert_eq!(WeightProfile::from_str("processing"), Some(WeightProfile::Processing));
        assert_eq!(WeightProfile::from_str("fancy"), None);
    }

    #[test]
    fn test_blend_rounds() {
        let w = WeightProfile::OrganicBonus.weights();
        assert_eq!(blend(&w, 100, 100, 100), 100);
        assert_eq!(blend(&w, 0, 0, 0), 0);
        // 80.5 sits on a float rounding edge
        assert!((80..=81).contains(&blend(&w, 80, 75, 100)));
    }

    #[test]
    fn test_no_caps_for_clean_food() {
        let w = WeightProfile::OrganicBonus.weights();
        let result = compose(
            &w,
            &nutrition(80, ProductKind::Foods),
            &additives(100),
            ThirdScore::Organic(100),
            &NutrientProfile::zero(),
            ProductKind::Foods,
        );
        assert_eq!(result.overall, 88);
        assert_eq!(result.label, ScoreLabel::Excellent);
        assert!(result.breakdown.caps_applied.is_empty());
        assert_eq!(result.subscores.organic, Some(100));
        assert_eq!(result.subscores.processing, None);
    }

    #[test]
    fn test_sodium_cap_dominates() {
        let w = WeightProfile::OrganicBonus.weights();
        let salty = NutrientProfile {
            sodium_mg: 900.0,
            ..NutrientProfile::zero()
        };
        let result = compose(
            &w,
            &nutrition(100, ProductKind::Foods),
            &additives(100),
            ThirdScore::Organic(100),
            &salty,
            ProductKind::Foods,
        );
        assert_eq!(result.breakdown.weighted, 100);
        assert_eq!(result.overall, 35);
        assert_eq!(result.breakdown.caps_applied[0].rule, CapRule::FoodSodium);
    }

    #[test]
    fn test_lowest_cap_wins() {
        let profile = NutrientProfile {
            sugars_g: 30.0,
            saturated_fat_g: 12.0,
            ..NutrientProfile::zero()
        };
        let caps = caps_for(&profile, ProductKind::Foods);
        assert_eq!(caps.len(), 2);
        let w = WeightProfile::OrganicBonus.weights();
        let result = compose(
            &w,
            &nutrition(100, ProductKind::Foods),
            &additives(100),
            ThirdScore::Organic(0),
            &profile,
            ProductKind::Foods,
        );
        assert_eq!(result.overall, 35);
    }

    #[test]
    fn test_cap_never_raises() {
        let w = WeightProfile::OrganicBonus.weights();
        let sweet = NutrientProfile {
            sugars_g: 30.0,
            ..NutrientProfile::zero()
        };
        let result = compose(
            &w,
            &nutrition(20, ProductKind::Foods),
            &additives(0),
            ThirdScore::Organic(0),
            &sweet,
            ProductKind::Foods,
        );
        assert_eq!(result.overall, 12);
        assert_eq!(result.label, ScoreLabel::Bad);
    }

    #[test]
    fn test_beverage_and_water_caps() {
        let sweet = NutrientProfile {
            sugars_g: 10.0,
            sodium_mg: 1000.0,
            ..NutrientProfile::zero()
        };
        let beverage = caps_for(&sweet, ProductKind::Beverages);
        assert_eq!(beverage, vec![AppliedCap { rule: CapRule::BeverageSugar, limit: 40 }]);
        assert!(caps_for(&sweet, ProductKind::BeveragesWater).is_empty());
    }

    #[test]
    fn test_processing_profile_fills_processing_subscore() {
        let w = WeightProfile::Processing.weights();
        let processing = ProcessingScore {
            percent: 15,
            source: ProcessingSource::Nova,
            nova_group: Some(4),
            ultra_processed_match: true,
        };
        let result = compose(
            &w,
            &nutrition(60, ProductKind::Foods),
            &additives(100),
            ThirdScore::Processing(processing),
            &NutrientProfile::zero(),
            ProductKind::Foods,
        );
        // 36 + 25 + 2.25
        assert_eq!(result.overall, 63);
        assert_eq!(result.subscores.processing, Some(15));
        assert_eq!(result.subscores.organic, None);
        assert_eq!(result.breakdown.processing, Some(processing));
    }
}
