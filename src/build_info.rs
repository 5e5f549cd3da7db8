//! Build and startup information
//!
//! Compile-time metadata plus the banner that tells an operator which scoring
//! configuration the server came up with.

use serde::Serialize;

use crate::config::EngineConfig;

/// Build timestamp in ISO 8601 format
pub const BUILD_TIMESTAMP: &str = match option_env!("NUTRISCAN_BUILD_TIMESTAMP") {
    Some(s) => s,
    None => "unknown",
};

/// Cargo profile the binary was built with (debug or release)
pub const BUILD_PROFILE: &str = match option_env!("NUTRISCAN_BUILD_PROFILE") {
    Some(s) => s,
    None => "unknown",
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[derive(Debug, Clone, Serialize)]
pub struct BuildInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub build_timestamp: &'static str,
    pub build_profile: &'static str,
}

impl BuildInfo {
    pub fn current() -> Self {
        Self {
            name: NAME,
            version: VERSION,
            build_timestamp: BUILD_TIMESTAMP,
            build_profile: BUILD_PROFILE,
        }
    }
}

impl std::fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} ({} build, {})",
            self.name, self.version, self.build_profile, self.build_timestamp
        )
    }
}

/// Startup banner describing the build and the active scoring configuration
pub fn startup_banner(config: &EngineConfig) -> String {
    let keywords = config
        .keywords_path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "built-in".to_string());

    let rule = "=".repeat(47);
    [
        rule.clone(),
        format!("  NutriScan Scoring Engine {}", BuildInfo::current()),
        format!(
            "  Weight profile: {} | Unknown additive penalty: {}",
            config.policy.weight_profile.as_str(),
            config.policy.penalties.unknown
        ),
        format!("  Portion scale: {}", config.policy.portion_scale.as_str()),
        format!("  Keywords: {}", keywords),
        format!(
            "  Result cache: {} entries, {}s TTL",
            config.cache_max_entries,
            config.cache_ttl.as_secs()
        ),
        rule,
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::WeightProfile;
    use std::path::PathBuf;

    #[test]
    fn test_build_info_display() {
        let text = BuildInfo::current().to_string();
        assert!(text.starts_with("nutriscan "));
        assert!(text.contains(VERSION));
    }

    #[test]
    fn test_banner_reports_scoring_config() {
        let banner = startup_banner(&EngineConfig::default());
        assert!(banner.contains("Weight profile: organic"));
        assert!(banner.contains("Unknown additive penalty: 5"));
        assert!(banner.contains("Keywords: built-in"));
        assert!(banner.contains("1024 entries, 86400s TTL"));

        let mut config = EngineConfig::default();
        config.policy.weight_profile = WeightProfile::Processing;
        config.keywords_path = Some(PathBuf::from("/etc/nutriscan/keywords.json"));
        let banner = startup_banner(&config);
        assert!(banner.contains("Weight profile: processing"));
        assert!(banner.contains("Keywords: /etc/nutriscan/keywords.json"));
    }
}
