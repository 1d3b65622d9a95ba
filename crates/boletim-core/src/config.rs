use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::SkillError;

/// Environment variable that overrides `data.api_token`.
pub const API_TOKEN_ENV: &str = "BOLETIM_API_TOKEN";

/// Top-level Boletim configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub skill: SkillConfig,
    #[serde(default)]
    pub data: DataConfig,
}

/// General skill settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillConfig {
    /// Locale used when the request's locale has no table. Must exist.
    #[serde(default = "default_locale")]
    pub default_locale: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Outer deadline for one dispatch, in milliseconds.
    #[serde(default = "default_deadline_ms")]
    pub deadline_ms: u64,
    /// Directory with `<locale>.toml` files overriding the bundled tables.
    #[serde(default)]
    pub locales_dir: Option<String>,
}

impl Default for SkillConfig {
    fn default() -> Self {
        Self {
            default_locale: default_locale(),
            log_level: default_log_level(),
            deadline_ms: default_deadline_ms(),
            locales_dir: None,
        }
    }
}

/// Upstream data API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Country aggregate series (ascending by date).
    #[serde(default = "default_country_url")]
    pub country_url: String,
    /// Per-state dataset endpoint.
    #[serde(default = "default_states_url")]
    pub states_url: String,
    /// Per-call HTTP timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Optional brasil.io token, sent as `Authorization: Token <token>`.
    #[serde(default)]
    pub api_token: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            country_url: default_country_url(),
            states_url: default_states_url(),
            timeout_secs: default_timeout_secs(),
            api_token: String::new(),
        }
    }
}

// --- Default value functions ---

fn default_locale() -> String {
    "pt".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_deadline_ms() -> u64 {
    8000
}
fn default_country_url() -> String {
    "https://api.covid19api.com/total/dayone/country/brazil".to_string()
}
fn default_states_url() -> String {
    "https://brasil.io/api/dataset/covid19/caso/data/".to_string()
}
fn default_timeout_secs() -> u64 {
    4
}

/// Load configuration from a TOML file.
///
/// Falls back to defaults if the file does not exist. The
/// `BOLETIM_API_TOKEN` environment variable wins over the file's token.
pub fn load(path: &str) -> Result<Config, SkillError> {
    let path = Path::new(path);
    let mut config = if !path.exists() {
        tracing::info!(
            "Config file not found at {}, using defaults",
            path.display()
        );
        Config::default()
    } else {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SkillError::Config(format!("failed to read {}: {}", path.display(), e)))?;
        toml::from_str(&content)
            .map_err(|e| SkillError::Config(format!("failed to parse config: {}", e)))?
    };

    if let Ok(token) = std::env::var(API_TOKEN_ENV) {
        if !token.trim().is_empty() {
            config.data.api_token = token.trim().to_string();
        }
    }

    if config.skill.default_locale.trim().is_empty() {
        return Err(SkillError::Config("skill.default_locale must not be empty".into()));
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.skill.default_locale, "pt");
        assert_eq!(cfg.skill.deadline_ms, 8000);
        assert_eq!(cfg.data.timeout_secs, 4);
        assert!(cfg.data.country_url.ends_with("/total/dayone/country/brazil"));
        assert!(cfg.data.api_token.is_empty());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let toml_str = r#"
            [skill]
            default_locale = "en"

            [data]
            timeout_secs = 3
        "#;
        let cfg: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(cfg.skill.default_locale, "en");
        assert_eq!(cfg.skill.log_level, "info");
        assert_eq!(cfg.data.timeout_secs, 3);
        assert!(cfg.data.states_url.starts_with("https://brasil.io/"));
    }

    #[test]
    fn test_empty_toml_is_valid() {
        let cfg: Config = toml::from_str("").unwrap();
        assert_eq!(cfg.skill.default_locale, "pt");
        assert!(cfg.skill.locales_dir.is_none());
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let cfg = load("/nonexistent/__boletim_test__/config.toml").unwrap();
        assert_eq!(cfg.skill.default_locale, "pt");
    }

    #[test]
    fn test_load_rejects_invalid_toml() {
        let tmp = std::env::temp_dir().join("__boletim_test_bad_config__.toml");
        std::fs::write(&tmp, "[skill\ndefault_locale = ").unwrap();
        let err = load(tmp.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, SkillError::Config(_)));
        let _ = std::fs::remove_file(&tmp);
    }

    #[test]
    fn test_load_rejects_blank_default_locale() {
        let tmp = std::env::temp_dir().join("__boletim_test_blank_locale__.toml");
        std::fs::write(&tmp, "[skill]\ndefault_locale = \"  \"\n").unwrap();
        let err = load(tmp.to_str().unwrap()).unwrap_err();
        assert!(err.to_string().contains("default_locale"));
        let _ = std::fs::remove_file(&tmp);
    }
}
