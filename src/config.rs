// src/config.rs
// Process-wide configuration loaded once from the environment

use once_cell::sync::Lazy;
use std::env;
use std::str::FromStr;

pub static CONFIG: Lazy<PhonicaConfig> = Lazy::new(PhonicaConfig::from_env);

#[derive(Debug, Clone)]
pub struct PhonicaConfig {
    // ── Gemini backend
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,

    // ── Pipeline settings
    pub wordbank_ttl_secs: u64,
    pub max_attempts_per_page: usize,
}

impl PhonicaConfig {
    fn from_env() -> Self {
        Self {
            gemini_api_key: env::var("GEMINI_API_KEY").ok().filter(|k| !k.is_empty()),
            gemini_model: env_or("GEMINI_MODEL", "gemini-2.0-flash"),
            gemini_base_url: env_or(
                "GEMINI_BASE_URL",
                "https://generativelanguage.googleapis.com/v1beta",
            ),
            wordbank_ttl_secs: env_parse("WORDBANK_TTL_SECS", 300),
            max_attempts_per_page: env_parse("MAX_ATTEMPTS_PER_PAGE", 2),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_parse_falls_back_on_garbage() {
        // Key that is never set in any environment we run under.
        assert_eq!(env_parse::<u64>("PHONICA_TEST_UNSET_KEY", 42), 42);
    }
}
