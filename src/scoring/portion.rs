//! Portion and age-group advisor
//!
//! Compares absolute amounts in a portion with each group's daily limits.

use serde::{Deserialize, Serialize};

use crate::models::{AgeGroup, AgeGroupAdvice, NutrientAdvice, PortionAnalysis, PortionLevel};

/// Daily limits for one age group
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyLimits {
    pub sugar_g: f64,
    pub sodium_mg: f64,
    pub saturated_fat_g: f64,
}

impl DailyLimits {
    pub fn for_group(group: AgeGroup) -> Self {
        match group {
            AgeGroup::Children4To8 => DailyLimits {
                sugar_g: 25.0,
                sodium_mg: 1200.0,
                saturated_fat_g: 10.0,
            },
            AgeGroup::Adults19To50 => DailyLimits {
                sugar_g: 50.0,
                sodium_mg: 2300.0,
                saturated_fat_g: 20.0,
            },
            AgeGroup::Seniors51Plus => DailyLimits {
                sugar_g: 30.0,
                sodium_mg: 1500.0,
                saturated_fat_g: 15.0,
            },
        }
    }
}

/// How percent-of-limit maps to a level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortionScale {
    /// Above 100% Excessive, above 50% High, else Recommended
    #[default]
    Strict,
    /// Above 40% High, above 20% Medium, else Low
    Graded,
}

impl PortionScale {
    pub fn as_str(&self) -> &'static str {
        match self {
            PortionScale::Strict => "strict",
            PortionScale::Graded => "graded",
        }
    }

    pub fn level(&self, percent: u32) -> PortionLevel {
        match self {
            PortionScale::Strict => {
                if percent > 100 {
                    PortionLevel::Excessive
                } else if percent > 50 {
                    PortionLevel::High
                } else {
                    PortionLevel::Recommended
                }
            }
            PortionScale::Graded => {
                if percent > 40 {
                    PortionLevel::High
                } else if percent > 20 {
                    PortionLevel::Medium
                } else {
                    PortionLevel::Low
                }
            }
        }
    }
}

/// Rounded percent of a limit; unusable amounts count as zero
pub fn percent_of_limit(amount: f64, limit: f64) -> u32 {
    if !amount.is_finite() || amount <= 0.0 || limit <= 0.0 {
        return 0;
    }
    (100.0 * amount / limit).round().min(u32::MAX as f64) as u32
}

fn advice(scale: PortionScale, amount: f64, limit: f64) -> NutrientAdvice {
    let percent = percent_of_limit(amount, limit);
    NutrientAdvice {
        level: scale.level(percent),
        percent_of_limit: percent,
    }
}

/// Advise on a portion given absolute amounts
pub fn advise_portions(
    scale: PortionScale,
    sugar_g: f64,
    sodium_mg: f64,
    saturated_fat_g: f64,
) -> PortionAnalysis {
    let groups = AgeGroup::ALL
        .iter()
        .map(|&age_group| {
            let limits = DailyLimits::for_group(age_group);
            AgeGroupAdvice {
                age_group,
                sugar: advice(scale, sugar_g, limits.sugar_g),
                sodium: advice(scale, sodium_mg, limits.sodium_mg),
                saturated_fat: advice(scale, saturated_fat_g, limits.saturated_fat_g),
            }
        })
        .collect();

    PortionAnalysis { groups }
}
