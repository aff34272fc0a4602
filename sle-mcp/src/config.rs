//! Server configuration from the environment

use sle_core::RoundingPolicy;

pub const LOG_ENV: &str = "RUST_LOG";
pub const ERROR_CORRECTION_ENV: &str = "SLE_ERROR_CORRECTION";
pub const MIN_RUN_ENV: &str = "SLE_MIN_RUN";
pub const MAX_DECIMALS_ENV: &str = "SLE_MAX_DECIMALS";

const DEFAULT_LOG_FILTER: &str = "info";

/// Settings read once at start-up
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// `tracing` filter directive
    pub log_filter: String,
    /// Apply the rounding pass unless a call says otherwise
    pub error_correction: bool,
    pub rounding: RoundingPolicy,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            error_correction: false,
            rounding: RoundingPolicy::default(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unparsable values fall back to defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let log_filter = lookup(LOG_ENV)
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(defaults.log_filter);

        let error_correction = lookup(ERROR_CORRECTION_ENV)
            .and_then(|s| parse_flag(&s))
            .unwrap_or(defaults.error_correction);

        let min_run = lookup(MIN_RUN_ENV)
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.rounding.min_run);

        let max_decimals = lookup(MAX_DECIMALS_ENV)
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.rounding.max_decimals);

        Self {
            log_filter,
            error_correction,
            rounding: RoundingPolicy { min_run, max_decimals },
        }
    }

    /// Rounding policy for a call, honoring a per-call override
    pub fn rounding_for(&self, requested: Option<bool>) -> Option<RoundingPolicy> {
        if requested.unwrap_or(self.error_correction) {
            Some(self.rounding)
        } else {
            None
        }
    }
}

fn parse_flag(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> ServerConfig {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let cfg = config(&[]);
        assert_eq!(cfg, ServerConfig::default());
        assert_eq!(cfg.log_filter, "info");
        assert_eq!(cfg.rounding_for(None), None);
    }

    #[test]
    fn test_overrides() {
        let cfg = config(&[
            (LOG_ENV, "debug"),
            (ERROR_CORRECTION_ENV, "on"),
            (MIN_RUN_ENV, "5"),
            (MAX_DECIMALS_ENV, "6"),
        ]);
        assert_eq!(cfg.log_filter, "debug");
        assert!(cfg.error_correction);
        assert_eq!(cfg.rounding, RoundingPolicy { min_run: 5, max_decimals: 6 });
    }

    #[test]
    fn test_bad_values_fall_back() {
        let cfg = config(&[(ERROR_CORRECTION_ENV, "maybe"), (MIN_RUN_ENV, "-2")]);
        assert!(!cfg.error_correction);
        assert_eq!(cfg.rounding.min_run, 3);
    }

    #[test]
    fn test_per_call_override() {
        let cfg = config(&[(ERROR_CORRECTION_ENV, "true")]);
        assert!(cfg.rounding_for(None).is_some());
        assert!(cfg.rounding_for(Some(false)).is_none());
        assert!(ServerConfig::default().rounding_for(Some(true)).is_some());
    }
}
