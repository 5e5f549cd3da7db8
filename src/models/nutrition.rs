//! Nutrient data structures
//!
//! `RawNutrients` is what upstream providers hand us; `NutrientProfile` is the
//! canonical per-100g/ml snapshot every scorer consumes.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::{json_kind, NutrientError};
use crate::nutrition::units::{kcal_to_kj, parse_quantity, EnergyUnit, MassUnit, ParsedQuantity, KJ_PER_KCAL};

/// Basis a nutrient bundle is stated on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NutrientBasis {
    #[default]
    Per100g,
    Per100ml,
    #[serde(alias = "per_serving", alias = "serving")]
    PerServing,
}

impl NutrientBasis {
    /// Whether values are already on the canonical per-100 basis
    pub fn is_per_100(&self) -> bool {
        matches!(self, NutrientBasis::Per100g | NutrientBasis::Per100ml)
    }

    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace(['_', ' '], "").as_str() {
            "per100g" | "100g" => Some(NutrientBasis::Per100g),
            "per100ml" | "100ml" => Some(NutrientBasis::Per100ml),
            "perserving" | "serving" => Some(NutrientBasis::PerServing),
            _ => None,
        }
    }
}

/// A sodium reading with an explicit unit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SodiumReading {
    pub value: f64,
    /// Grams when not stated
    pub unit: Option<MassUnit>,
}

/// Nutrient facts as supplied by a provider, before normalization
///
/// Every field is optional; absent readings resolve to zero during
/// normalization. Deserialization goes through [`RawNutrients::from_json`] so
/// numeric strings such as `"12.5 g"` are accepted and garbage is rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RawNutrients {
    pub energy_kcal: Option<f64>,
    pub energy_kj: Option<f64>,
    pub sugars_g: Option<f64>,
    pub saturated_fat_g: Option<f64>,
    pub sodium_mg: Option<f64>,
    pub sodium: Option<SodiumReading>,
    pub salt_g: Option<f64>,
    pub fiber_g: Option<f64>,
    pub protein_g: Option<f64>,
    pub fruit_veg_pct: Option<f64>,
}

const ENERGY_KCAL_KEYS: &[&str] = &["energy_kcal", "calories", "kcal"];
const ENERGY_KJ_KEYS: &[&str] = &["energy_kj", "kj"];
const SUGARS_KEYS: &[&str] = &["sugars_g", "sugar_g", "sugars", "sugar"];
const SATURATED_FAT_KEYS: &[&str] = &["saturated_fat_g", "satfat_g", "sat_fat_g", "saturated_fat"];
const SODIUM_MG_KEYS: &[&str] = &["sodium_mg"];
const SODIUM_G_KEYS: &[&str] = &["sodium_g"];
const SALT_KEYS: &[&str] = &["salt_g", "salt"];
const FIBER_KEYS: &[&str] = &["fiber_g", "fibre_g", "fiber", "fibre"];
const PROTEIN_KEYS: &[&str] = &["protein_g", "proteins_g", "protein"];
const FRUIT_VEG_KEYS: &[&str] = &["fruit_veg_pct", "fvn_pct", "fvn_percent", "fruit_veg_percent"];

/// Unit a field's numbers are stored in once parsed
#[derive(Debug, Clone, Copy, PartialEq)]
enum FieldUnit {
    Mass(MassUnit),
    Energy(EnergyUnit),
    Percent,
}

impl FieldUnit {
    /// Bring a reading written in `unit` onto this field's unit
    ///
    /// `None` when the written unit does not measure the same thing.
    fn convert(self, value: f64, unit: Option<&str>) -> Option<f64> {
        let Some(unit) = unit else {
            return Some(value);
        };
        match self {
            FieldUnit::Mass(target) => {
                let written = MassUnit::from_str(unit)?;
                Some(written.to_milligrams(value) / target.milligrams_per_unit())
            }
            FieldUnit::Energy(target) => match (EnergyUnit::from_str(unit)?, target) {
                (EnergyUnit::Kcal, EnergyUnit::Kj) => Some(kcal_to_kj(value)),
                (EnergyUnit::Kj, EnergyUnit::Kcal) => Some(value / KJ_PER_KCAL),
                _ => Some(value),
            },
            FieldUnit::Percent => (unit == "%").then_some(value),
        }
    }
}

const GRAMS: FieldUnit = FieldUnit::Mass(MassUnit::Gram);
const MILLIGRAMS: FieldUnit = FieldUnit::Mass(MassUnit::Milligram);

impl RawNutrients {
    /// Read a nutrient bundle from loosely-typed JSON
    ///
    /// Accepts alternate field names (`sugar_g`, `satfat_g`, `fibre_g`, ...),
    /// JSON numbers and numeric strings. A unit written in a string
    /// (`"0.7 g"` under `sodium_mg`) is converted to the field's unit.
    /// `null`, missing keys and empty strings are treated as absent. A
    /// non-numeric string or a unit of the wrong kind is an error.
    pub fn from_json(value: &Value) -> Result<Self, NutrientError> {
        let obj = value
            .as_object()
            .ok_or_else(|| NutrientError::NotAnObject(json_kind(value)))?;

        let sodium = match obj.get("sodium") {
            Some(Value::Object(pair)) => Some(parse_sodium_pair(pair)?),
            Some(other) => read_sodium_text(other)?,
            None => None,
        };

        // "sodium_g" is folded into the explicit-unit reading
        let sodium = match (sodium, read_field(obj, SODIUM_G_KEYS, GRAMS)?) {
            (Some(s), _) => Some(s),
            (None, Some(grams)) => Some(SodiumReading { value: grams, unit: Some(MassUnit::Gram) }),
            (None, None) => None,
        };

        let mut energy_kcal = read_field(obj, ENERGY_KCAL_KEYS, FieldUnit::Energy(EnergyUnit::Kcal))?;
        let mut energy_kj = read_field(obj, ENERGY_KJ_KEYS, FieldUnit::Energy(EnergyUnit::Kj))?;
        if energy_kcal.is_none() && energy_kj.is_none() {
            if let Some(raw) = obj.get("energy") {
                if let Some(q) = read_value("energy", raw)? {
                    let unit = match q.unit.as_deref() {
                        Some(u) => EnergyUnit::from_str(u).ok_or_else(|| invalid_value("energy", raw))?,
                        None => EnergyUnit::Kcal,
                    };
                    match unit {
                        EnergyUnit::Kj => energy_kj = Some(q.value),
                        EnergyUnit::Kcal => energy_kcal = Some(q.value),
                    }
                }
            }
        }

        Ok(Self {
            energy_kcal,
            energy_kj,
            sugars_g: read_field(obj, SUGARS_KEYS, GRAMS)?,
            saturated_fat_g: read_field(obj, SATURATED_FAT_KEYS, GRAMS)?,
            sodium_mg: read_field(obj, SODIUM_MG_KEYS, MILLIGRAMS)?,
            sodium,
            salt_g: read_field(obj, SALT_KEYS, GRAMS)?,
            fiber_g: read_field(obj, FIBER_KEYS, GRAMS)?,
            protein_g: read_field(obj, PROTEIN_KEYS, GRAMS)?,
            fruit_veg_pct: read_field(obj, FRUIT_VEG_KEYS, FieldUnit::Percent)?,
        })
    }
}

impl<'de> Deserialize<'de> for RawNutrients {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        RawNutrients::from_json(&value).map_err(serde::de::Error::custom)
    }
}

fn invalid_value(field: &str, value: &Value) -> NutrientError {
    NutrientError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
    }
}

/// First present, non-null key among the aliases, converted to `unit`
fn read_field(
    obj: &Map<String, Value>,
    keys: &[&str],
    unit: FieldUnit,
) -> Result<Option<f64>, NutrientError> {
    for key in keys {
        if let Some(value) = obj.get(*key) {
            if let Some(q) = read_value(key, value)? {
                let converted = unit
                    .convert(q.value, q.unit.as_deref())
                    .ok_or_else(|| invalid_value(key, value))?;
                return Ok(Some(converted));
            }
        }
    }
    Ok(None)
}

/// Parse one nutrient value with any unit written next to it
///
/// `Ok(None)` means "not reported". JSON numbers never carry a unit.
pub fn read_value(field: &str, value: &Value) -> Result<Option<ParsedQuantity>, NutrientError> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => n
            .as_f64()
            .map(|v| Some(ParsedQuantity { value: v, unit: None }))
            .ok_or_else(|| invalid_value(field, value)),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => parse_quantity(s)
            .map(Some)
            .ok_or_else(|| invalid_value(field, value)),
        _ => Err(invalid_value(field, value)),
    }
}

/// A bare `"sodium"` reading; the unit stays as written, grams when absent
fn read_sodium_text(value: &Value) -> Result<Option<SodiumReading>, NutrientError> {
    let Some(q) = read_value("sodium", value)? else {
        return Ok(None);
    };
    let unit = match q.unit.as_deref() {
        Some(u) => Some(MassUnit::from_str(u).ok_or_else(|| invalid_value("sodium", value))?),
        None => None,
    };
    Ok(Some(SodiumReading { value: q.value, unit }))
}

fn parse_sodium_pair(pair: &Map<String, Value>) -> Result<SodiumReading, NutrientError> {
    let value = match pair.get("value") {
        Some(v) => match read_value("sodium.value", v)? {
            Some(q) if q.unit.is_none() => q.value,
            Some(_) => return Err(invalid_value("sodium.value", v)),
            None => 0.0,
        },
        None => 0.0,
    };
    let unit = match pair.get("unit") {
        Some(Value::String(u)) => Some(MassUnit::from_str(u).ok_or_else(|| {
            NutrientError::InvalidValue {
                field: "sodium.unit".to_string(),
                value: u.clone(),
            }
        })?),
        Some(Value::Null) | None => None,
        Some(other) => return Err(invalid_value("sodium.unit", other)),
    };
    Ok(SodiumReading { value, unit })
}

/// Canonical per-100g/ml nutrient snapshot
///
/// All fields are finite and non-negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NutrientProfile {
    pub energy_kj: f64,
    pub sugars_g: f64,
    pub saturated_fat_g: f64,
    pub sodium_mg: f64,
    pub fiber_g: f64,
    pub protein_g: f64,
    /// Fruit/vegetable/nut share in percent; a ratio, never rescaled
    pub fruit_veg_pct: f64,
}

impl NutrientProfile {
    /// Create a profile with all zeros
    pub fn zero() -> Self {
        Self::default()
    }

    /// Scale the quantity fields by a multiplier
    ///
    /// `fruit_veg_pct` is left alone since it does not depend on amount.
    pub fn scale(&self, multiplier: f64) -> Self {
        Self {
            energy_kj: self.energy_kj * multiplier,
            sugars_g: self.sugars_g * multiplier,
            saturated_fat_g: self.saturated_fat_g * multiplier,
            sodium_mg: self.sodium_mg * multiplier,
            fiber_g: self.fiber_g * multiplier,
            protein_g: self.protein_g * multiplier,
            fruit_veg_pct: self.fruit_veg_pct,
        }
    }
}

impl std::ops::Mul<f64> for NutrientProfile {
    type Output = NutrientProfile;

    fn mul(self, multiplier: f64) -> NutrientProfile {
        self.scale(multiplier)
    }
}
