//! Additive and processing sub-scorers

use serde::{Deserialize, Serialize};

use super::keywords::Keywords;
use crate::models::{
    Additive, AdditiveScore, NovaGroup, ProcessingScore, ProcessingSource, RiskCounts, RiskLevel,
};

/// Additive sub-score when nothing was declared
pub const EMPTY_LIST_BASELINE: u8 = 75;
/// Same, when the ingredient text looks ultra-processed
pub const EMPTY_LIST_ULTRA_PROCESSED_BASELINE: u8 = 40;

/// Processing sub-score without a NOVA group
pub const PROCESSING_UNKNOWN: u8 = 60;
pub const PROCESSING_UNKNOWN_ULTRA_PROCESSED: u8 = 35;

/// Points deducted from 100 per additive, by risk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdditivePenalties {
    pub high: u32,
    pub medium: u32,
    pub low: u32,
    pub unknown: u32,
}

impl Default for AdditivePenalties {
    fn default() -> Self {
        Self {
            high: 35,
            medium: 15,
            low: 0,
            unknown: 5,
        }
    }
}

impl AdditivePenalties {
    pub fn for_risk(&self, risk: RiskLevel) -> u32 {
        match risk {
            RiskLevel::High => self.high,
            RiskLevel::Medium => self.medium,
            RiskLevel::Low => self.low,
            RiskLevel::Unknown => self.unknown,
        }
    }
}

/// Score the declared additives
///
/// An empty list is not proof of a clean product, so it earns a baseline
/// below 100 instead.
pub fn score_additives(
    keywords: &Keywords,
    penalties: &AdditivePenalties,
    additives: &[Additive],
    ingredient_text: &str,
) -> AdditiveScore {
    let ultra_processed_match = keywords.matches_ultra_processed(ingredient_text);

    if additives.is_empty() {
        let percent = if ultra_processed_match {
            EMPTY_LIST_ULTRA_PROCESSED_BASELINE
        } else {
            EMPTY_LIST_BASELINE
        };
        return AdditiveScore {
            percent,
            penalty: 0,
            counts: RiskCounts::default(),
            baseline_applied: true,
            ultra_processed_match,
        };
    }

    let mut counts = RiskCounts::default();
    let mut penalty: u32 = 0;
    for additive in additives {
        match additive.risk {
            RiskLevel::High => counts.high += 1,
            RiskLevel::Medium => counts.medium += 1,
            RiskLevel::Low => counts.low += 1,
            RiskLevel::Unknown => counts.unknown += 1,
        }
        penalty = penalty.saturating_add(penalties.for_risk(additive.risk));
    }

    AdditiveScore {
        percent: 100u32.saturating_sub(penalty) as u8,
        penalty,
        counts,
        baseline_applied: false,
        ultra_processed_match,
    }
}

/// Score how processed a product is
pub fn score_processing(
    keywords: &Keywords,
    nova_group: Option<NovaGroup>,
    ingredient_text: &str,
) -> ProcessingScore {
    let ultra_processed_match = keywords.matches_ultra_processed(ingredient_text);

    match nova_group {
        Some(group) => ProcessingScore {
            percent: match group {
                NovaGroup::Unprocessed => 100,
                NovaGroup::ProcessedIngredients => 85,
                NovaGroup::Processed => 55,
                NovaGroup::UltraProcessed => 15,
            },
            source: ProcessingSource::Nova,
            nova_group: Some(group.code()),
            ultra_processed_match,
        },
        None => ProcessingScore {
            percent: if ultra_processed_match {
                PROCESSING_UNKNOWN_ULTRA_PROCESSED
            } else {
                PROCESSING_UNKNOWN
            },
            source: ProcessingSource::KeywordHeuristic,
            nova_group: None,
            ultra_processed_match,
        },
    }
}
