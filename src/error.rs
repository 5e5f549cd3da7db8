//! Error types
//!
//! The engine degrades gracefully for almost every irregular input. These are
//! the few conditions that are reported to the caller instead.

use thiserror::Error;

/// Errors raised while reading nutrient values
#[derive(Debug, Error, PartialEq)]
pub enum NutrientError {
    #[error("Invalid value for nutrient '{field}': {value}")]
    InvalidValue { field: String, value: String },

    #[error("Nutrient bundle must be a JSON object, got {0}")]
    NotAnObject(String),
}

/// Errors raised by the ingredient cleaner
#[derive(Debug, Error, PartialEq)]
pub enum IngredientError {
    #[error("Ingredient list must be an array, got {0}")]
    NotArray(String),

    #[error("Ingredient entry {index} has no usable name")]
    InvalidEntry { index: usize },
}

/// Errors raised while loading engine configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read keyword file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse keyword file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Invalid value for {var}: {value}")]
    InvalidEnv { var: &'static str, value: String },
}

/// Top-level error for scoring operations
#[derive(Debug, Error)]
pub enum ScoreError {
    #[error(transparent)]
    Nutrient(#[from] NutrientError),

    #[error(transparent)]
    Ingredient(#[from] IngredientError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Invalid product facts: {0}")]
    InvalidProduct(#[source] serde_json::Error),

    #[error("Invalid barcode '{0}': expected 8 to 14 digits")]
    InvalidBarcode(String),

    #[error("No product data in food database response for {0}")]
    NoProductData(String),
}

/// Result type for scoring operations
pub type EngineResult<T> = Result<T, ScoreError>;

/// Short JSON type name used in error messages
pub(crate) fn json_kind(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
    .to_string()
}
