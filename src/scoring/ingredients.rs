//! Ingredient cleaner
//!
//! Turns a noisy, possibly OCR-derived ingredient list into normalized,
//! unique records. Tokens that look like noise are dropped and reported with
//! a reason. Corrections are exact-match lookups only.

use std::collections::HashSet;

use serde_json::Value;
use tracing::debug;

use super::keywords::Keywords;
use crate::error::{json_kind, IngredientError};
use crate::models::{
    CleanedIngredients, DropReason, DroppedIngredient, IngredientInput, IngredientRecord,
};

/// Tokens shorter than this must appear in the source text when one is given
const EVIDENCE_GATE_LEN: usize = 5;

/// Uppercase, trim, collapse inner whitespace and strip trailing `.,;:`
pub fn normalize_name(name: &str) -> String {
    let collapsed = name.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed
        .to_uppercase()
        .trim_end_matches(|c| matches!(c, '.' | ',' | ';' | ':'))
        .trim_end()
        .to_string()
}

/// Why a normalized token should be dropped, if at all
pub fn junk_reason(keywords: &Keywords, token: &str, source: Option<&str>) -> Option<DropReason> {
    let len = token.chars().count();
    if len == 0 {
        return Some(DropReason::Empty);
    }
    if len < 2 {
        return Some(DropReason::TooShort);
    }

    let allowlisted = keywords.is_safe_short_token(token);
    let additive_code = keywords.is_additive_code(token);

    if len < 4 && !allowlisted && !additive_code {
        return Some(DropReason::ShortNotAllowlisted);
    }

    let has_vowel = token.chars().any(|c| matches!(c, 'A' | 'E' | 'I' | 'O' | 'U' | 'Y'));
    if !has_vowel && !allowlisted && !additive_code {
        return Some(DropReason::NoVowel);
    }

    // E-codes are mostly digits by construction
    let letters = token.chars().filter(|c| c.is_ascii_alphabetic()).count();
    if !additive_code && letters * 2 < len {
        return Some(DropReason::MostlyNonAlphabetic);
    }

    if let Some(source) = source {
        if len < EVIDENCE_GATE_LEN && !source.contains(token) {
            return Some(DropReason::NotInSourceText);
        }
    }

    None
}

/// Clean an ingredient list
///
/// `source_text` is the raw label text the list was extracted from. When
/// present, short tokens must literally appear in it.
pub fn clean(
    keywords: &Keywords,
    ingredients: &[IngredientInput],
    source_text: Option<&str>,
) -> CleanedIngredients {
    let source = source_text
        .map(normalize_name)
        .filter(|s| !s.is_empty());

    let mut result = CleanedIngredients::default();
    let mut seen = HashSet::new();

    for item in ingredients {
        let original = item.name();
        let token = normalize_name(original);

        if let Some(reason) = junk_reason(keywords, &token, source.as_deref()) {
            debug!("Dropping ingredient '{}': {}", original, reason);
            result.dropped.push(DroppedIngredient {
                original: original.to_string(),
                normalized: token,
                reason,
            });
            continue;
        }

        let (name, corrected) = match keywords.correction_for(&token) {
            Some(fixed) if fixed != token => (fixed.to_string(), true),
            _ => (token, false),
        };

        if !seen.insert(name.clone()) {
            continue;
        }

        let is_harmful = item.is_harmful() || keywords.is_harmful(&name);

        result.cleaned.push(IngredientRecord {
            name,
            original_name: original.to_string(),
            is_harmful,
            description: item.description().to_string(),
            corrected,
        });
    }

    result
}

/// Clean an ingredient list given as raw JSON
pub fn clean_json(
    keywords: &Keywords,
    value: &Value,
    source_text: Option<&str>,
) -> Result<CleanedIngredients, IngredientError> {
    let entries = value
        .as_array()
        .ok_or_else(|| IngredientError::NotArray(json_kind(value)))?;

    let inputs = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| parse_entry(index, entry))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(clean(keywords, &inputs, source_text))
}

fn parse_entry(index: usize, entry: &Value) -> Result<IngredientInput, IngredientError> {
    match entry {
        Value::String(name) => Ok(IngredientInput::Name(name.clone())),
        Value::Number(n) => Ok(IngredientInput::Name(n.to_string())),
        Value::Object(_) => serde_json::from_value(entry.clone())
            .map_err(|_| IngredientError::InvalidEntry { index }),
        _ => Err(IngredientError::InvalidEntry { index }),
    }
}
