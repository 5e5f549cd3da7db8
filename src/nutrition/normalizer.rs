//! Unit normalization
//!
//! Brings a provider's nutrient bundle onto the per-100g/ml basis that every
//! scoring threshold is defined on.

use crate::models::{NutrientBasis, NutrientProfile, RawNutrients};

use super::units::{kcal_to_kj, salt_to_sodium_mg, MassUnit, BASIS_AMOUNT};

/// Normalize a raw nutrient bundle to per-100 values
///
/// # Arguments
/// * `raw` - Nutrient readings as supplied
/// * `basis` - What the readings are stated per
/// * `serving_size` - Serving size in g/ml, only consulted for per-serving data
///
/// Missing, non-finite and negative readings resolve to zero so downstream
/// arithmetic is always defined.
pub fn normalize(raw: &RawNutrients, basis: NutrientBasis, serving_size: Option<f64>) -> NutrientProfile {
    let factor = if basis.is_per_100() {
        1.0
    } else {
        serving_scale_factor(serving_size)
    };

    let scaled = |v: f64| sanitize(v) * factor;

    NutrientProfile {
        energy_kj: scaled(resolve_energy_kj(raw)),
        sugars_g: scaled(raw.sugars_g.unwrap_or(0.0)),
        saturated_fat_g: scaled(raw.saturated_fat_g.unwrap_or(0.0)),
        sodium_mg: scaled(resolve_sodium_mg(raw)),
        fiber_g: scaled(raw.fiber_g.unwrap_or(0.0)),
        protein_g: scaled(raw.protein_g.unwrap_or(0.0)),
        fruit_veg_pct: sanitize(raw.fruit_veg_pct.unwrap_or(0.0)).min(100.0),
    }
}

/// Multiplier that rebases a per-serving reading to per-100
///
/// A missing or unusable serving size leaves values unscaled rather than
/// dividing by zero.
pub fn serving_scale_factor(serving_size: Option<f64>) -> f64 {
    match serving_size {
        Some(size) if size.is_finite() && size > 0.0 => BASIS_AMOUNT / size,
        other => {
            tracing::warn!(
                "Per-serving nutrients without a usable serving size ({:?}); leaving values unscaled",
                other
            );
            1.0
        }
    }
}

/// Energy in kJ, preferring a stated kJ value over a converted kcal one
///
/// A kJ value that is not a positive number does not shadow kcal.
pub fn resolve_energy_kj(raw: &RawNutrients) -> f64 {
    match (raw.energy_kj, raw.energy_kcal) {
        (Some(kj), _) if kj.is_finite() && kj > 0.0 => kj,
        (_, Some(kcal)) if kcal.is_finite() => kcal_to_kj(kcal),
        _ => 0.0,
    }
}

/// Sodium in mg
///
/// Precedence: `sodium_mg`, then a unit-tagged reading (grams when the unit
/// is missing), then an estimate from salt.
pub fn resolve_sodium_mg(raw: &RawNutrients) -> f64 {
    if let Some(mg) = raw.sodium_mg.filter(|v| v.is_finite()) {
        return mg;
    }

    if let Some(reading) = raw.sodium.filter(|r| r.value.is_finite()) {
        let unit = reading.unit.unwrap_or(MassUnit::Gram);
        return unit.to_milligrams(reading.value);
    }

    if let Some(salt) = raw.salt_g.filter(|v| v.is_finite()) {
        tracing::debug!("Estimating sodium from {} g salt", salt);
        return salt_to_sodium_mg(salt);
    }

    0.0
}

/// Clamp a reading into the finite, non-negative range
pub fn sanitize(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SodiumReading;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_per_100_passes_through() {
        let raw = RawNutrients {
            energy_kj: Some(1000.0),
            sugars_g: Some(12.0),
            sodium_mg: Some(300.0),
            ..Default::default()
        };
        let profile = normalize(&raw, NutrientBasis::Per100g, Some(30.0));
        assert_eq!(profile.energy_kj, 1000.0);
        assert_eq!(profile.sugars_g, 12.0);
        assert_eq!(profile.sodium_mg, 300.0);
        assert_eq!(profile.fiber_g, 0.0);
    }

    #[test]
    fn test_per_serving_rescales() {
        // 28g serving with 2g sugar -> 7.142857g per 100g
        let raw = RawNutrients {
            sugars_g: Some(2.0),
            protein_g: Some(2.0),
            fruit_veg_pct: Some(45.0),
            ..Default::default()
        };
        let profile = normalize(&raw, NutrientBasis::PerServing, Some(28.0));
        assert!(approx(profile.sugars_g, 200.0 / 28.0));
        assert!(approx(profile.protein_g, 200.0 / 28.0));
        assert_eq!(profile.fruit_veg_pct, 45.0);
    }

    #[test]
    fn test_missing_serving_size_is_noop() {
        let raw = RawNutrients {
            sugars_g: Some(9.0),
            ..Default::default()
        };
        for serving in [None, Some(0.0), Some(-5.0), Some(f64::NAN)] {
            let profile = normalize(&raw, NutrientBasis::PerServing, serving);
            assert_eq!(profile.sugars_g, 9.0);
        }
    }

    #[test]
    fn test_energy_prefers_kj() {
        let raw = RawNutrients {
            energy_kj: Some(250.0),
            energy_kcal: Some(100.0),
            ..Default::default()
        };
        assert_eq!(resolve_energy_kj(&raw), 250.0);

        let raw = RawNutrients {
            energy_kcal: Some(535.0),
            ..Default::default()
        };
        assert!(approx(resolve_energy_kj(&raw), 2238.44));
    }

    #[test]
    fn test_unusable_kj_falls_back_to_kcal() {
        for kj in [-50.0, 0.0, f64::NAN, f64::INFINITY] {
            let raw = RawNutrients {
                energy_kj: Some(kj),
                energy_kcal: Some(100.0),
                ..Default::default()
            };
            assert!(approx(resolve_energy_kj(&raw), 418.4), "kJ {} shadowed kcal", kj);
        }
    }

    #[test]
    fn test_sodium_precedence() {
        let raw = RawNutrients {
            sodium_mg: Some(714.0),
            salt_g: Some(5.0),
            ..Default::default()
        };
        assert_eq!(resolve_sodium_mg(&raw), 714.0);

        let raw = RawNutrients {
            sodium: Some(SodiumReading { value: 0.714, unit: None }),
            salt_g: Some(5.0),
            ..Default::default()
        };
        assert!(approx(resolve_sodium_mg(&raw), 714.0));

        let raw = RawNutrients {
            sodium: Some(SodiumReading { value: 90.0, unit: Some(MassUnit::Milligram) }),
            ..Default::default()
        };
        assert_eq!(resolve_sodium_mg(&raw), 90.0);
    }

    #[test]
    fn test_sodium_falls_back_to_salt() {
        let raw = RawNutrients {
            salt_g: Some(1.25),
            ..Default::default()
        };
        assert_eq!(resolve_sodium_mg(&raw), 500.0);
    }

    #[test]
    fn test_bad_values_become_zero() {
        let raw = RawNutrients {
            sugars_g: Some(-3.0),
            saturated_fat_g: Some(f64::NAN),
            fiber_g: Some(f64::INFINITY),
            ..Default::default()
        };
        let profile = normalize(&raw, NutrientBasis::Per100g, None);
        assert_eq!(profile.sugars_g, 0.0);
        assert_eq!(profile.saturated_fat_g, 0.0);
        assert_eq!(profile.fiber_g, 0.0);
        assert_eq!(profile.energy_kj, 0.0);
    }
}
