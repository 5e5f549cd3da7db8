//! Nutrition normalization module
//!
//! Handles unit conversions and rebasing nutrient readings to per-100g/ml.

pub mod normalizer;
pub mod units;

pub use normalizer::{normalize, resolve_energy_kj, resolve_sodium_mg, serving_scale_factor};
pub use units::{kcal_to_kj, parse_quantity, salt_to_sodium_mg, EnergyUnit, MassUnit, ParsedQuantity};
