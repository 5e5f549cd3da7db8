//! Engine configuration
//!
//! Read once at startup from `NUTRISCAN_*` environment variables.

use std::path::PathBuf;
use std::time::Duration;

use tracing::info;

use crate::error::ConfigError;
use crate::scoring::{
    AdditivePenalties, KeywordConfig, PortionScale, ScoringEngine, ScoringPolicy, WeightProfile,
};

pub const ENV_KEYWORDS_PATH: &str = "NUTRISCAN_KEYWORDS_PATH";
pub const ENV_WEIGHT_PROFILE: &str = "NUTRISCAN_WEIGHT_PROFILE";
pub const ENV_UNKNOWN_PENALTY: &str = "NUTRISCAN_UNKNOWN_ADDITIVE_PENALTY";
pub const ENV_PORTION_SCALE: &str = "NUTRISCAN_PORTION_SCALE";
pub const ENV_CACHE_TTL_SECS: &str = "NUTRISCAN_CACHE_TTL_SECS";
pub const ENV_CACHE_MAX_ENTRIES: &str = "NUTRISCAN_CACHE_MAX_ENTRIES";

/// One day, matching how long food-database answers are considered fresh
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(86_400);
pub const DEFAULT_CACHE_MAX_ENTRIES: usize = 1024;

/// Startup configuration
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// JSON keyword file; built-in lists when unset
    pub keywords_path: Option<PathBuf>,
    pub policy: ScoringPolicy,
    pub cache_ttl: Duration,
    pub cache_max_entries: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            keywords_path: None,
            policy: ScoringPolicy::default(),
            cache_ttl: DEFAULT_CACHE_TTL,
            cache_max_entries: DEFAULT_CACHE_MAX_ENTRIES,
        }
    }
}

impl EngineConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration through `lookup`; blank values count as unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = Self::default();

        config.keywords_path = get(ENV_KEYWORDS_PATH).map(PathBuf::from);

        if let Some(value) = get(ENV_WEIGHT_PROFILE) {
            config.policy.weight_profile = WeightProfile::from_str(&value).ok_or(ConfigError::InvalidEnv {
                var: ENV_WEIGHT_PROFILE,
                value,
            })?;
        }

        if let Some(value) = get(ENV_PORTION_SCALE) {
            config.policy.portion_scale = match value.to_lowercase().as_str() {
                "strict" => PortionScale::Strict,
                "graded" => PortionScale::Graded,
                _ => {
                    return Err(ConfigError::InvalidEnv {
                        var: ENV_PORTION_SCALE,
                        value,
                    })
                }
            };
        }

        if let Some(value) = get(ENV_UNKNOWN_PENALTY) {
            let unknown = parse_number::<u32>(ENV_UNKNOWN_PENALTY, value)?;
            config.policy.penalties = AdditivePenalties {
                unknown,
                ..config.policy.penalties
            };
        }

        if let Some(value) = get(ENV_CACHE_TTL_SECS) {
            config.cache_ttl = Duration::from_secs(parse_number(ENV_CACHE_TTL_SECS, value)?);
        }

        if let Some(value) = get(ENV_CACHE_MAX_ENTRIES) {
            config.cache_max_entries = parse_number(ENV_CACHE_MAX_ENTRIES, value)?;
        }

        Ok(config)
    }

    /// Load keywords and build the engine
    pub fn build_engine(&self) -> Result<ScoringEngine, ConfigError> {
        let keyword_config = match &self.keywords_path {
            Some(path) => {
                info!("Loading keyword lists from {}", path.display());
                KeywordConfig::from_file(path)?
            }
            None => KeywordConfig::default(),
        };
        Ok(ScoringEngine::new(keyword_config.compile()?, self.policy))
    }
}

fn parse_number<T: std::str::FromStr>(var: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::InvalidEnv { var, value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<EngineConfig, ConfigError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        EngineConfig::from_lookup(|var| env.get(var).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.policy.weight_profile, WeightProfile::OrganicBonus);
        assert_eq!(config.policy.penalties.unknown, 5);
        assert_eq!(config.cache_ttl, DEFAULT_CACHE_TTL);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            (ENV_WEIGHT_PROFILE, "processing"),
            (ENV_UNKNOWN_PENALTY, "12"),
            (ENV_PORTION_SCALE, "Graded"),
            (ENV_CACHE_TTL_SECS, "60"),
            (ENV_CACHE_MAX_ENTRIES, "10"),
            (ENV_KEYWORDS_PATH, "/etc/nutriscan/keywords.json"),
        ])
        .unwrap();
        assert_eq!(config.policy.weight_profile, WeightProfile::Processing);
        assert_eq!(config.policy.penalties.unknown, 12);
        assert_eq!(config.policy.penalties.high, 35);
        assert_eq!(config.policy.portion_scale, PortionScale::Graded);
        assert_eq!(config.cache_ttl, Duration::from_secs(60));
        assert_eq!(config.cache_max_entries, 10);
        assert_eq!(
            config.keywords_path,
            Some(PathBuf::from("/etc/nutriscan/keywords.json"))
        );
    }

    #[test]
    fn test_blank_values_are_unset() {
        let config = config_from(&[(ENV_WEIGHT_PROFILE, "  "), (ENV_KEYWORDS_PATH, "")]).unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_invalid_values() {
        let err = config_from(&[(ENV_WEIGHT_PROFILE, "vibes")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { var: ENV_WEIGHT_PROFILE, .. }));

        let err = config_from(&[(ENV_UNKNOWN_PENALTY, "-3")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { var: ENV_UNKNOWN_PENALTY, .. }));
    }

    #[test]
    fn test_missing_keyword_file() {
        let config = EngineConfig {
            keywords_path: Some(PathBuf::from("/nonexistent/nutriscan-keywords.json")),
            ..Default::default()
        };
        assert!(matches!(config.build_engine(), Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_keyword_file_is_loaded() {
        let path = std::env::temp_dir().join(format!("nutriscan-keywords-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"beverage_terms": ["smoothie"]}"#).unwrap();

        let config = EngineConfig {
            keywords_path: Some(path.clone()),
            ..Default::default()
        };
        let engine = config.build_engine().unwrap();
        std::fs::remove_file(&path).unwrap();

        assert!(engine.keywords().is_beverage("mango smoothie"));
        assert!(!engine.keywords().is_beverage("orange juice"));
    }
}
