//! Nutrition sub-scorer
//!
//! Nutri-Score style banded points. Each threshold table lists ascending
//! cutoffs; a nutrient earns one point per cutoff its value strictly exceeds.

use crate::models::{NutrientProfile, NutritionGrade, NutritionScore, ProductClassification, ProductKind};

/// Cutoffs for the four negative nutrients of one product kind
struct NegativeTable {
    energy_kj: [f64; 10],
    sugars_g: [f64; 10],
}

const FOOD_TABLE: NegativeTable = NegativeTable {
    energy_kj: [335.0, 670.0, 1000.0, 1340.0, 1600.0, 1800.0, 2000.0, 2300.0, 2600.0, 2900.0],
    sugars_g: [4.5, 9.0, 13.5, 18.0, 22.5, 27.0, 31.0, 36.0, 40.0, 45.0],
};

const BEVERAGE_TABLE: NegativeTable = NegativeTable {
    energy_kj: [30.0, 60.0, 90.0, 120.0, 150.0, 180.0, 210.0, 240.0, 270.0, 300.0],
    sugars_g: [1.5, 3.0, 4.5, 6.0, 7.5, 9.0, 10.5, 12.0, 13.5, 15.0],
};

/// Shared by both kinds
const SATURATED_FAT_G: [f64; 10] = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
const SODIUM_MG: [f64; 10] = [90.0, 180.0, 270.0, 360.0, 450.0, 540.0, 630.0, 720.0, 810.0, 900.0];
const FIBER_G: [f64; 5] = [0.9, 1.9, 2.8, 3.7, 4.7];
const PROTEIN_G: [f64; 5] = [1.6, 3.2, 4.8, 6.4, 8.0];

/// Negative points at which protein stops counting
const PROTEIN_SUPPRESSION_POINTS: i32 = 11;

/// Number of cutoffs strictly exceeded
pub fn points(value: f64, cutoffs: &[f64]) -> i32 {
    cutoffs.iter().filter(|&&cutoff| value > cutoff).count() as i32
}

pub fn fruit_veg_points(pct: f64) -> i32 {
    if pct >= 80.0 {
        5
    } else if pct >= 60.0 {
        2
    } else if pct >= 40.0 {
        1
    } else {
        0
    }
}

/// Letter grade for a raw score
pub fn letter_for(kind: ProductKind, raw: i32) -> NutritionGrade {
    match kind {
        ProductKind::BeveragesWater => NutritionGrade::A,
        ProductKind::Beverages => match raw {
            i32::MIN..=1 => NutritionGrade::A,
            2..=5 => NutritionGrade::B,
            6..=9 => NutritionGrade::C,
            10..=13 => NutritionGrade::D,
            _ => NutritionGrade::E,
        },
        ProductKind::Foods => match raw {
            i32::MIN..=-1 => NutritionGrade::A,
            0..=2 => NutritionGrade::B,
            3..=10 => NutritionGrade::C,
            11..=18 => NutritionGrade::D,
            _ => NutritionGrade::E,
        },
    }
}

/// Score a per-100 profile
pub fn score_nutrition(
    profile: &NutrientProfile,
    classification: &ProductClassification,
) -> NutritionScore {
    let kind = classification.kind;
    let table = if kind.is_beverage() {
        &BEVERAGE_TABLE
    } else {
        &FOOD_TABLE
    };

    let negative_points = points(profile.energy_kj, &table.energy_kj)
        + points(profile.sugars_g, &table.sugars_g)
        + points(profile.saturated_fat_g, &SATURATED_FAT_G)
        + points(profile.sodium_mg, &SODIUM_MG);

    let fruit_veg = fruit_veg_points(profile.fruit_veg_pct);
    let fiber = points(profile.fiber_g, &FIBER_G);
    let protein = points(profile.protein_g, &PROTEIN_G);

    let protein_counted = !(negative_points >= PROTEIN_SUPPRESSION_POINTS
        && fruit_veg < 5
        && !classification.is_cheese);

    let positive_points = fruit_veg + fiber + if protein_counted { protein } else { 0 };
    let raw = negative_points - positive_points;
    let letter = letter_for(kind, raw);

    NutritionScore {
        percent: letter.percent(),
        letter,
        raw,
        negative_points,
        positive_points,
        fruit_veg_points: fruit_veg,
        fiber_points: fiber,
        protein_points: protein,
        protein_counted,
        kind,
        per100: *profile,
    }
}
