//! Ingredient models
//!
//! Raw ingredient entries from an extraction step and the cleaned records the
//! ingredient cleaner produces from them.

use serde::{Deserialize, Serialize};

/// An ingredient as supplied upstream: a bare name or a detailed entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IngredientInput {
    Name(String),
    Detailed {
        name: String,
        #[serde(default)]
        description: String,
        #[serde(default)]
        is_harmful: bool,
    },
}

impl IngredientInput {
    pub fn name(&self) -> &str {
        match self {
            IngredientInput::Name(name) => name,
            IngredientInput::Detailed { name, .. } => name,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            IngredientInput::Name(_) => "",
            IngredientInput::Detailed { description, .. } => description,
        }
    }

    /// Whether the upstream source already flagged this ingredient
    pub fn is_harmful(&self) -> bool {
        match self {
            IngredientInput::Name(_) => false,
            IngredientInput::Detailed { is_harmful, .. } => *is_harmful,
        }
    }
}

impl From<&str> for IngredientInput {
    fn from(name: &str) -> Self {
        IngredientInput::Name(name.to_string())
    }
}

/// A cleaned ingredient
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientRecord {
    /// Normalized name: uppercase, non-empty, unique within a list
    pub name: String,
    pub original_name: String,
    pub is_harmful: bool,
    pub description: String,
    /// Whether the correction table rewrote the name
    pub corrected: bool,
}

/// Why a token was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    Empty,
    TooShort,
    ShortNotAllowlisted,
    NoVowel,
    MostlyNonAlphabetic,
    NotInSourceText,
}

impl DropReason {
    pub fn description(&self) -> &'static str {
        match self {
            DropReason::Empty => "Empty after normalization",
            DropReason::TooShort => "Shorter than two characters",
            DropReason::ShortNotAllowlisted => "Short token not on the allowlist",
            DropReason::NoVowel => "No vowel; likely OCR noise",
            DropReason::MostlyNonAlphabetic => "Fewer than half the characters are letters",
            DropReason::NotInSourceText => "Short token not present in the source text",
        }
    }
}

impl std::fmt::Display for DropReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.description())
    }
}

/// A token removed by the cleaner, kept for auditing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DroppedIngredient {
    pub original: String,
    pub normalized: String,
    pub reason: DropReason,
}

/// Output of the ingredient cleaner
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanedIngredients {
    pub cleaned: Vec<IngredientRecord>,
    pub dropped: Vec<DroppedIngredient>,
}

impl CleanedIngredients {
    pub fn harmful(&self) -> impl Iterator<Item = &IngredientRecord> {
        self.cleaned.iter().filter(|r| r.is_harmful)
    }

    pub fn names(&self) -> Vec<&str> {
        self.cleaned.iter().map(|r| r.name.as_str()).collect()
    }
}
