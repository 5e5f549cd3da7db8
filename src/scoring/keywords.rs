//! Keyword configuration
//!
//! Every keyword list and pattern the heuristics use lives here as data. The
//! built-in defaults can be replaced wholesale or field by field from a JSON
//! file, then compiled once into [`Keywords`].

use std::collections::{HashMap, HashSet};
use std::path::Path;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Tunable keyword lists, as loaded from configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordConfig {
    /// Substrings of a normalized ingredient name that mark it harmful
    pub harmful_keywords: Vec<String>,
    /// Regex fragments that signal an ultra-processed ingredient list
    pub ultra_processed_patterns: Vec<String>,
    /// Terms that mark a product as plain water
    pub water_terms: Vec<String>,
    /// Terms that veto the water classification ("watermelon")
    pub water_exclusions: Vec<String>,
    /// Whole-word terms that mark a beverage
    pub beverage_terms: Vec<String>,
    /// Terms that keep a drink in the foods table
    pub dairy_terms: Vec<String>,
    pub cheese_terms: Vec<String>,
    /// Short ingredient tokens that are real words, not OCR noise
    pub safe_short_tokens: Vec<String>,
    /// Exact-match OCR misreads
    pub ocr_corrections: HashMap<String, String>,
    /// Exact-match plural to singular rewrites
    pub singular_forms: HashMap<String, String>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn pairs(items: &[(&str, &str)]) -> HashMap<String, String> {
    items
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

impl Default for KeywordConfig {
    fn default() -> Self {
        Self {
            harmful_keywords: strings(&[
                "RED 40", "RED 3", "YELLOW 5", "YELLOW 6", "BLUE 1", "BLUE 2", "GREEN 3",
                "FD&C", "ARTIFICIAL COLOR", "ARTIFICIAL FLAVOR", "CARAMEL COLOR",
                "MSG", "MONOSODIUM GLUTAMATE", "DISODIUM INOSINATE", "DISODIUM GUANYLATE",
                "HYDROGENATED", "HIGH FRUCTOSE CORN SYRUP",
                "ASPARTAME", "SUCRALOSE", "ACESULFAME", "SACCHARIN",
                "SODIUM NITRITE", "SODIUM NITRATE", "SODIUM BENZOATE", "POTASSIUM BENZOATE",
                "POTASSIUM BROMATE", "BHA", "BHT", "TBHQ", "PROPYL GALLATE",
                "CARRAGEENAN", "TITANIUM DIOXIDE",
                "E102", "E110", "E129", "E133", "E150D", "E171", "E250", "E251", "E621",
            ]),
            ultra_processed_patterns: strings(&[
                r"maltodextrin",
                r"corn syrup",
                r"high[- ]fructose",
                r"hydrogenated",
                r"artificial (colou?rs?|flavou?rs?)",
                r"modified (corn |food |tapioca )?starch",
                r"hydrolyzed",
                r"protein isolate",
                r"mono-? ?and diglycerides",
                r"dextrose",
                r"carrageenan",
                r"sucralose|aspartame|acesulfame",
                r"sodium benzoate|potassium sorbate",
                r"\b(tbhq|bht|bha)\b",
                r"\be ?2\d\d\b",
                r"\b(red|yellow|blue) \d\b",
            ]),
            water_terms: strings(&["water"]),
            water_exclusions: strings(&["melon"]),
            beverage_terms: strings(&[
                "drink", "beverage", "soda", "juice", "cola", "tea", "coffee",
            ]),
            dairy_terms: strings(&["milk", "yogurt", "yoghurt", "kefir", "dairy"]),
            cheese_terms: strings(&["cheese"]),
            safe_short_tokens: strings(&[
                "MSG", "BHA", "BHT", "TEA", "OIL", "GUM", "RED", "DYE", "SOY", "EGG", "FAT",
                "OAT", "RYE", "CORN", "MILK", "SALT",
            ]),
            ocr_corrections: pairs(&[
                ("LAG ACID", "LACTIC ACID"),
                ("LAC ACID", "LACTIC ACID"),
                ("VEG OIL", "VEGETABLE OIL"),
                ("F.D.C", "FD&C"),
            ]),
            singular_forms: pairs(&[
                ("SPICES", "SPICE"),
                ("CHIPS", "CHIP"),
                ("FLAVORS", "FLAVOR"),
                ("COLORS", "COLOR"),
                ("PRESERVATIVES", "PRESERVATIVE"),
            ]),
        }
    }
}

impl KeywordConfig {
    /// Load keyword lists from a JSON file; missing fields keep their defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Compile into matchers
    pub fn compile(&self) -> Result<Keywords, ConfigError> {
        let ultra_processed = alternation(&self.ultra_processed_patterns)?;
        let beverage_words: Vec<String> = lower(&self.beverage_terms)
            .iter()
            .map(|t| format!(r"\b{}s?\b", regex::escape(t)))
            .collect();
        let beverage = alternation(&beverage_words)?;

        Ok(Keywords {
            harmful: upper(&self.harmful_keywords),
            ultra_processed,
            water: lower(&self.water_terms),
            water_exclusions: lower(&self.water_exclusions),
            beverage,
            dairy: lower(&self.dairy_terms),
            cheese: lower(&self.cheese_terms),
            safe_short: upper(&self.safe_short_tokens).into_iter().collect(),
            corrections: upper_map(&self.ocr_corrections),
            singulars: upper_map(&self.singular_forms),
            additive_code: Regex::new(r"^E\d+[A-Z]?$").map_err(|source| ConfigError::Pattern {
                pattern: r"^E\d+[A-Z]?$".to_string(),
                source,
            })?,
        })
    }
}

fn upper(items: &[String]) -> Vec<String> {
    items
        .iter()
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .collect()
}

fn lower(items: &[String]) -> Vec<String> {
    items
        .iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

fn upper_map(map: &HashMap<String, String>) -> HashMap<String, String> {
    map.iter()
        .map(|(k, v)| (k.trim().to_uppercase(), v.trim().to_uppercase()))
        .collect()
}

/// Join fragments into one case-insensitive regex; an empty list matches nothing
fn alternation(fragments: &[String]) -> Result<Option<Regex>, ConfigError> {
    let parts: Vec<&str> = fragments
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();
    if parts.is_empty() {
        return Ok(None);
    }

    // Validate each fragment alone so errors name the offending pattern
    for part in &parts {
        Regex::new(part).map_err(|source| ConfigError::Pattern {
            pattern: part.to_string(),
            source,
        })?;
    }

    let pattern = parts
        .iter()
        .map(|p| format!("(?:{})", p))
        .collect::<Vec<_>>()
        .join("|");
    RegexBuilder::new(&pattern)
        .case_insensitive(true)
        .build()
        .map(Some)
        .map_err(|source| ConfigError::Pattern { pattern, source })
}

/// Compiled keyword matchers
///
/// Immutable after construction and safe to share across threads.
#[derive(Debug, Clone)]
pub struct Keywords {
    harmful: Vec<String>,
    ultra_processed: Option<Regex>,
    water: Vec<String>,
    water_exclusions: Vec<String>,
    beverage: Option<Regex>,
    dairy: Vec<String>,
    cheese: Vec<String>,
    safe_short: HashSet<String>,
    corrections: HashMap<String, String>,
    singulars: HashMap<String, String>,
    additive_code: Regex,
}

impl Keywords {
    /// Built-in keyword set
    pub fn builtin() -> Result<Self, ConfigError> {
        KeywordConfig::default().compile()
    }

    /// Whether a normalized (uppercase) ingredient name contains a harmful keyword
    pub fn is_harmful(&self, name: &str) -> bool {
        self.harmful.iter().any(|k| name.contains(k.as_str()))
    }

    /// Whether ingredient text looks ultra-processed
    pub fn matches_ultra_processed(&self, text: &str) -> bool {
        self.ultra_processed
            .as_ref()
            .map(|re| re.is_match(text))
            .unwrap_or(false)
    }

    pub fn is_water(&self, haystack: &str) -> bool {
        contains_any(haystack, &self.water) && !contains_any(haystack, &self.water_exclusions)
    }

    pub fn is_beverage(&self, haystack: &str) -> bool {
        self.beverage
            .as_ref()
            .map(|re| re.is_match(haystack))
            .unwrap_or(false)
    }

    pub fn is_dairy(&self, haystack: &str) -> bool {
        contains_any(haystack, &self.dairy)
    }

    pub fn is_cheese(&self, haystack: &str) -> bool {
        contains_any(haystack, &self.cheese)
    }

    pub fn is_safe_short_token(&self, token: &str) -> bool {
        self.safe_short.contains(token)
    }

    /// `E` followed by digits, e.g. E330 or E150D
    pub fn is_additive_code(&self, token: &str) -> bool {
        self.additive_code.is_match(token)
    }

    /// Exact-match correction, OCR table first, then singular forms
    pub fn correction_for(&self, name: &str) -> Option<&str> {
        self.corrections
            .get(name)
            .or_else(|| self.singulars.get(name))
            .map(String::as_str)
    }
}

fn contains_any(haystack: &str, needles: &[String]) -> bool {
    needles.iter().any(|n| haystack.contains(n.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keywords() -> Keywords {
        Keywords::builtin().unwrap()
    }

    #[test]
    fn test_builtin_compiles() {
        assert!(Keywords::builtin().is_ok());
    }

    #[test]
    fn test_harmful_keywords() {
        let kw = keywords();
        assert!(kw.is_harmful("RED 40"));
        assert!(kw.is_harmful("MSG"));
        assert!(kw.is_harmful("PARTIALLY HYDROGENATED SOYBEAN OIL"));
        assert!(!kw.is_harmful("SUGAR"));
    }

    #[test]
    fn test_ultra_processed_patterns() {
        let kw = keywords();
        assert!(kw.matches_ultra_processed("Sugar, Maltodextrin, Salt"));
        assert!(kw.matches_ultra_processed("CORN SYRUP SOLIDS"));
        assert!(kw.matches_ultra_processed("water, sugar, e211"));
        assert!(kw.matches_ultra_processed("Artificial Flavors"));
        assert!(!kw.matches_ultra_processed("Milk, Vitamin D3"));
        assert!(!kw.matches_ultra_processed(""));
    }

    #[test]
    fn test_beverage_whole_words() {
        let kw = keywords();
        assert!(kw.is_beverage("orange juice"));
        assert!(kw.is_beverage("soft drinks"));
        assert!(kw.is_beverage("green tea"));
        assert!(!kw.is_beverage("beef steak"));
        assert!(!kw.is_beverage("chocolate bar"));
    }

    #[test]
    fn test_water_exclusions() {
        let kw = keywords();
        assert!(kw.is_water("sparkling mineral water"));
        assert!(!kw.is_water("watermelon slices"));
    }

    #[test]
    fn test_additive_code() {
        let kw = keywords();
        assert!(kw.is_additive_code("E330"));
        assert!(kw.is_additive_code("E150D"));
        assert!(!kw.is_additive_code("EGG"));
        assert!(!kw.is_additive_code("E"));
    }

    #[test]
    fn test_corrections_are_exact_match() {
        let kw = keywords();
        assert_eq!(kw.correction_for("LAG ACID"), Some("LACTIC ACID"));
        assert_eq!(kw.correction_for("SPICES"), Some("SPICE"));
        assert_eq!(kw.correction_for("MIXED SPICES"), None);
        assert_eq!(kw.correction_for("PUM"), None);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = KeywordConfig::from_json_str(r#"{"water_exclusions": ["melon", "cress"]}"#).unwrap();
        assert_eq!(config.water_exclusions, vec!["melon", "cress"]);
        assert_eq!(config.dairy_terms, KeywordConfig::default().dairy_terms);

        let kw = config.compile().unwrap();
        assert!(!kw.is_water("watercress salad"));
    }

    #[test]
    fn test_invalid_pattern_is_reported() {
        let config = KeywordConfig {
            ultra_processed_patterns: vec!["(unclosed".to_string()],
            ..Default::default()
        };
        match config.compile() {
            Err(ConfigError::Pattern { pattern, .. }) => assert_eq!(pattern, "(unclosed"),
            other => panic!("expected pattern error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_pattern_list_matches_nothing() {
        let config = KeywordConfig {
            ultra_processed_patterns: Vec::new(),
            ..Default::default()
        };
        let kw = config.compile().unwrap();
        assert!(!kw.matches_ultra_processed("maltodextrin"));
    }
}
