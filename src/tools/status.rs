//! NutriScan Status Tool
//!
//! Provides runtime status information about the NutriScan service.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;
use crate::config::EngineConfig;

/// Scoring instructions for AI assistants
pub const SCORING_INSTRUCTIONS: &str = r#"
# NutriScan Scoring Instructions

This guide explains how to score food products with the NutriScan tools.

## Overview

NutriScan turns nutrient and ingredient facts into a 0-100 health score, a
label, and portion advice for three age groups. It never fetches data: you
supply facts read from a label or a food-database response.

---

## Scoring a Label

**Tool:** `analyze_product`

Pass a product object:

```json
{
  "name": "Sea Salt Potato Chips",
  "category": "snacks",
  "basis": "per100g",
  "serving_size": 28,
  "nutrients": {
    "energy_kcal": 535, "sugars_g": 3.5, "saturated_fat_g": 5.36,
    "sodium_mg": 714, "fiber_g": 3.6, "protein_g": 7.1
  },
  "additives": [{"risk": "high"}, {"risk": "medium"}],
  "ingredients": ["Potatoes", "Sunflower Oil", "Salt"],
  "ingredients_text": "Ingredients: potatoes, sunflower oil, salt",
  "organic": false
}
```

- `basis` is `per100g`, `per100ml` or `per_serving`. For `per_serving`,
  `serving_size` (g or ml) is required to rebase values.
- Nutrient values may be numbers or strings with units ("12.5 g").
- Sodium may be given as `sodium_mg`, as `{"value": 0.7, "unit": "g"}`, or
  estimated from `salt_g`.
- Always pass `ingredients_text` when you have the raw label text. Short
  ingredient tokens that do not appear in it are dropped as OCR noise.

---

## Scoring a Barcode

**Tool:** `score_open_food_facts_product`

Fetch `https://world.openfoodfacts.org/api/v2/product/<barcode>.json`
yourself and pass the barcode and the full response. Results are cached per
barcode.

---

## Reading the Result

| Overall | Label     |
|---------|-----------|
| 75-100  | Excellent |
| 50-74   | Good      |
| 25-49   | Mediocre  |
| 0-24    | Bad       |

- `breakdown.caps_applied` lists hard limits that lowered the score (sugar,
  saturated fat or sodium above a threshold). Mention them to the user.
- `additive_source` tells whether additives were declared or derived from
  harmful ingredients.
- Portion advice compares one serving against daily limits for
  Children 4-8, Adults 19-50 and Seniors 51+.

---

## Other Tools

- `clean_ingredients` - normalize and deduplicate an ingredient list
- `classify_product` - food, beverage or water
- `normalize_nutrients` - convert any nutrient bundle to per-100 values
- `portion_analysis` - advice for absolute amounts already eaten
"#;

/// Status information for the NutriScan service
#[derive(Debug, Clone, Serialize)]
pub struct NutriScanStatus {
    /// Build information
    pub version: &'static str,
    pub build_timestamp: &'static str,
    pub build_profile: &'static str,

    /// Scoring configuration
    pub weight_profile: &'static str,
    pub unknown_additive_penalty: u32,
    pub keywords_source: String,

    /// Cache information
    pub cache_entries: usize,
    pub cache_ttl_seconds: u64,

    /// Process information
    pub started_at: DateTime<Utc>,
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    started_at: DateTime<Utc>,
    config: EngineConfig,
}

impl StatusTracker {
    /// Create a new status tracker
    pub fn new(config: EngineConfig) -> Self {
        Self {
            start_time: Instant::now(),
            started_at: Utc::now(),
            config,
        }
    }

    /// Get the current status
    pub fn get_status(&self, cache_entries: usize) -> NutriScanStatus {
        let build_info = BuildInfo::current();

        let keywords_source = self
            .config
            .keywords_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "built-in".to_string());

        // Get process info
        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        NutriScanStatus {
            version: build_info.version,
            build_timestamp: build_info.build_timestamp,
            build_profile: build_info.build_profile,
            weight_profile: self.config.policy.weight_profile.as_str(),
            unknown_additive_penalty: self.config.policy.penalties.unknown,
            keywords_source,
            cache_entries,
            cache_ttl_seconds: self.config.cache_ttl.as_secs(),
            started_at: self.started_at,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}
