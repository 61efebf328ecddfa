//! CLI configuration file.

use std::path::Path;

use anyhow::{bail, Context, Result};
use reel_discovery::{CatalogConfig, DiscoveryConfig, SearchConfig, StoreConfig};
use reel_observability::{LogFormat, LogLevel, LoggingConfig};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// File names searched for, in order, in each directory.
pub const CONFIG_NAMES: [&str; 3] = ["reel.toml", ".reel.toml", "reel.json"];

/// Contents of `reel.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        if is_json(path) {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
        }
    }

    /// Save config to a file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = if is_json(path) {
            serde_json::to_string_pretty(self)?
        } else {
            toml::to_string_pretty(self)?
        };

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    /// File settings overridden by the environment.
    pub fn discovery(&self) -> DiscoveryConfig {
        let mut config = DiscoveryConfig {
            catalog: self.catalog.clone(),
            store: self.store.clone(),
            search: self.search.clone(),
        };
        config.apply_env();
        config
    }

    /// Logging settings with command-line flags applied.
    ///
    /// `--json` switches logs to JSON lines; `ansi` is off when stderr
    /// cannot show colors.
    pub fn logging_for(&self, verbose: bool, json: bool, ansi: bool) -> LoggingConfig {
        let mut logging = self.logging.clone();
        if verbose {
            logging = logging.with_level(LogLevel::Debug);
        }
        if json {
            logging = logging.with_format(LogFormat::Json);
        }
        if !ansi {
            logging = logging.with_ansi(false);
        }
        logging
    }

    /// Read a value by dot-separated key. Unset values are `null`.
    pub fn value(&self, key: &str) -> Result<Value> {
        let parts: Vec<&str> = key.split('.').collect();

        let value = match parts.as_slice() {
            ["catalog", "base_url"] => json!(self.catalog.base_url),
            ["catalog", "api_key"] => json!(self.catalog.api_key),
            ["catalog", "timeout_ms"] => json!(self.catalog.timeout_ms),
            ["store", "backend"] => json!(self.store.backend.as_str()),
            ["store", "endpoint"] => json!(self.store.endpoint),
            ["store", "project_id"] => json!(self.store.project_id),
            ["store", "database_id"] => json!(self.store.database_id),
            ["store", "collection_id"] => json!(self.store.collection_id),
            ["store", "api_key"] => json!(self.store.api_key),
            ["search", "debounce_ms"] => json!(self.search.debounce_ms),
            ["search", "trending_limit"] => json!(self.search.trending_limit),
            ["logging", "level"] => json!(self.logging.level.as_str()),
            ["logging", "format"] => json!(self.logging.format.as_str()),
            _ => bail!("Unknown config key: {}", key),
        };

        Ok(value)
    }

    /// Set a value by dot-separated key.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["catalog", "base_url"] => self.catalog.base_url = value.to_string(),
            ["catalog", "api_key"] => self.catalog.api_key = Some(value.to_string()),
            ["catalog", "timeout_ms"] => self.catalog.timeout_ms = Some(value.parse()?),
            ["store", "backend"] => self.store.backend = value.parse()?,
            ["store", "endpoint"] => self.store.endpoint = value.to_string(),
            ["store", "project_id"] => self.store.project_id = Some(value.to_string()),
            ["store", "database_id"] => self.store.database_id = Some(value.to_string()),
            ["store", "collection_id"] => self.store.collection_id = Some(value.to_string()),
            ["store", "api_key"] => self.store.api_key = Some(value.to_string()),
            ["search", "debounce_ms"] => self.search.debounce_ms = value.parse()?,
            ["search", "trending_limit"] => self.search.trending_limit = value.parse()?,
            ["logging", "level"] => self.logging.level = value.parse()?,
            ["logging", "format"] => self.logging.format = value.parse()?,
            _ => bail!("Unknown config key: {}", key),
        }

        Ok(())
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

/// Hide all but the last four characters of a secret.
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 4 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{}", tail)
}

/// Generate a default reel.toml config file.
pub fn generate_default_config() -> String {
    r#"# Reel configuration
#
# Secrets can be left out and supplied through the environment instead:
# TMDB_API_KEY, APPWRITE_ENDPOINT, APPWRITE_PROJECT_ID, APPWRITE_DATABASE_ID,
# APPWRITE_COLLECTION_ID, APPWRITE_API_KEY (each also read with a VITE_ prefix).

[catalog]
base_url = "https://api.themoviedb.org/3"
# api_key = "<TMDB read access token>"
# timeout_ms = 10000

[store]
# "appwrite" or "memory"
backend = "appwrite"
endpoint = "https://cloud.appwrite.io/v1"
# project_id = ""
# database_id = ""
# collection_id = ""

[search]
debounce_ms = 700
trending_limit = 5

[logging]
level = "info"
# "human", "compact" or "json"
format = "human"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use reel_discovery::StoreBackend;

    #[test]
    fn test_default_template_parses() {
        let config: CliConfig = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config, CliConfig::default());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: CliConfig = toml::from_str(
            r#"
            [store]
            backend = "memory"

            [logging]
            format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.search.debounce_ms, 700);
        assert_eq!(config.catalog.base_url, "https://api.themoviedb.org/3");
    }

    #[test]
    fn test_value_and_set() {
        let mut config = CliConfig::default();
        assert_eq!(config.value("store.project_id").unwrap(), Value::Null);

        config.set("store.project_id", "proj").unwrap();
        config.set("search.debounce_ms", "300").unwrap();
        config.set("logging.level", "debug").unwrap();
        config.set("store.backend", "memory").unwrap();

        assert_eq!(config.value("store.project_id").unwrap(), json!("proj"));
        assert_eq!(config.value("search.debounce_ms").unwrap(), json!(300));
        assert_eq!(config.value("store.backend").unwrap(), json!("memory"));
        assert_eq!(config.logging.level, LogLevel::Debug);

        assert!(config.set("search.debounce_ms", "soon").is_err());
        assert!(config.set("store.backend", "redis").is_err());
        assert!(config.value("nope.nothing").is_err());
    }

    #[test]
    fn test_value_renders_as_valid_json() {
        let mut config = CliConfig::default();
        config.set("store.project_id", r#"a"b\c"#).unwrap();

        let value = config.value("store.project_id").unwrap();
        let rendered = json!({ "key": "store.project_id", "value": value }).to_string();
        let parsed: Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed["value"], json!(r#"a"b\c"#));
        assert_eq!(config.value("catalog.timeout_ms").unwrap(), Value::Null);
    }

    #[test]
    fn test_round_trip_through_file() {
        let dir = std::env::temp_dir().join(format!("reel-cli-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let mut config = CliConfig::default();
        config.set("catalog.timeout_ms", "2500").unwrap();
        config.set("store.collection_id", "metrics").unwrap();

        for name in ["reel.toml", "reel.json"] {
            let path = dir.join(name);
            config.save(&path).unwrap();
            assert_eq!(CliConfig::load(&path).unwrap(), config);
        }
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_logging_for_applies_flags() {
        let config = CliConfig::default();
        assert_eq!(config.logging_for(false, false, true), LoggingConfig::default());

        let logging = config.logging_for(true, true, false);
        assert_eq!(logging.level, LogLevel::Debug);
        assert_eq!(logging.format, LogFormat::Json);
        assert!(!logging.ansi);
    }

    #[test]
    fn test_mask_secret() {
        assert_eq!(mask_secret("abcdefgh1234"), "****1234");
        assert_eq!(mask_secret("abc"), "****");
    }
}
