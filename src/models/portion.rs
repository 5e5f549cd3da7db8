//! Portion analysis models

use serde::{Deserialize, Serialize};

/// Age group with its own daily limits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgeGroup {
    #[serde(rename = "Children 4-8")]
    Children4To8,
    #[serde(rename = "Adults 19-50")]
    Adults19To50,
    #[serde(rename = "Seniors 51+")]
    Seniors51Plus,
}

impl AgeGroup {
    pub const ALL: [AgeGroup; 3] = [
        AgeGroup::Children4To8,
        AgeGroup::Adults19To50,
        AgeGroup::Seniors51Plus,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AgeGroup::Children4To8 => "Children 4-8",
            AgeGroup::Adults19To50 => "Adults 19-50",
            AgeGroup::Seniors51Plus => "Seniors 51+",
        }
    }
}

/// Qualitative share of a daily limit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortionLevel {
    Recommended,
    Low,
    Medium,
    High,
    Excessive,
}

/// One nutrient measured against one group's limit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NutrientAdvice {
    pub level: PortionLevel,
    pub percent_of_limit: u32,
}

/// Advice for one age group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeGroupAdvice {
    pub age_group: AgeGroup,
    pub sugar: NutrientAdvice,
    pub sodium: NutrientAdvice,
    pub saturated_fat: NutrientAdvice,
}

/// Portion advice for every age group, in fixed order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortionAnalysis {
    pub groups: Vec<AgeGroupAdvice>,
}

impl PortionAnalysis {
    pub fn for_group(&self, group: AgeGroup) -> Option<&AgeGroupAdvice> {
        self.groups.iter().find(|g| g.age_group == group)
    }
}
