//! Discovery configuration.
//!
//! Values come from defaults, then a config file (handled by the caller via
//! serde), then environment variables. Every environment key is also read
//! with a `VITE_` prefix, the names used by the web build.

use std::time::Duration;

use reel_store::AppwriteConfig;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

pub const DEFAULT_CATALOG_URL: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_STORE_ENDPOINT: &str = "https://cloud.appwrite.io/v1";
pub const DEFAULT_DEBOUNCE_MS: u64 = 700;
pub const DEFAULT_TRENDING_LIMIT: usize = 5;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    pub catalog: CatalogConfig,
    pub store: StoreConfig,
    pub search: SearchConfig,
}

/// Movie catalog connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub base_url: String,
    /// Read-access token, sent as a bearer token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Overall request timeout. Unset means the HTTP client default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_CATALOG_URL.to_string(),
            api_key: None,
            timeout_ms: None,
        }
    }
}

/// Where search counters are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Appwrite,
    /// Process-local, lost on exit.
    Memory,
}

impl StoreBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Appwrite => "appwrite",
            Self::Memory => "memory",
        }
    }
}

impl std::str::FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "appwrite" => Ok(Self::Appwrite),
            "memory" => Ok(Self::Memory),
            other => Err(ConfigError::Invalid {
                key: "store.backend",
                message: format!("expected `appwrite` or `memory`, got `{}`", other),
            }),
        }
    }
}

/// Search analytics store connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub endpoint: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Appwrite,
            endpoint: DEFAULT_STORE_ENDPOINT.to_string(),
            project_id: None,
            database_id: None,
            collection_id: None,
            api_key: None,
        }
    }
}

/// Search behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Quiet period before a typed term is searched.
    pub debounce_ms: u64,
    /// Number of trending terms shown.
    pub trending_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            trending_limit: DEFAULT_TRENDING_LIMIT,
        }
    }
}

impl SearchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl DiscoveryConfig {
    /// Defaults overridden by the process environment.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Override fields from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_vars(|key| std::env::var(key).ok());
    }

    /// Override fields from a variable lookup. Empty values are ignored.
    pub fn apply_vars(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let get = |key: &str| non_empty(key).or_else(|| non_empty(&format!("VITE_{}", key)));

        if let Some(v) = get("TMDB_API_KEY") {
            self.catalog.api_key = Some(v);
        }
        if let Some(v) = get("APPWRITE_ENDPOINT") {
            self.store.endpoint = v;
        }
        if let Some(v) = get("APPWRITE_PROJECT_ID") {
            self.store.project_id = Some(v);
        }
        if let Some(v) = get("APPWRITE_DATABASE_ID") {
            self.store.database_id = Some(v);
        }
        if let Some(v) = get("APPWRITE_COLLECTION_ID") {
            self.store.collection_id = Some(v);
        }
        if let Some(v) = get("APPWRITE_API_KEY") {
            self.store.api_key = Some(v);
        }
    }

    /// Check that everything needed to run a search is present.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.catalog_api_key()?;
        if self.catalog.timeout_ms == Some(0) {
            return Err(ConfigError::Invalid {
                key: "catalog.timeout_ms",
                message: "must be greater than zero".to_string(),
            });
        }
        if self.search.trending_limit == 0 {
            return Err(ConfigError::Invalid {
                key: "search.trending_limit",
                message: "must be greater than zero".to_string(),
            });
        }
        if self.store.backend == StoreBackend::Appwrite {
            self.appwrite()?;
        }
        Ok(())
    }

    pub fn catalog_api_key(&self) -> Result<&str, ConfigError> {
        self.catalog
            .api_key
            .as_deref()
            .ok_or(ConfigError::Missing("TMDB_API_KEY"))
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.catalog.timeout_ms.map(Duration::from_millis)
    }

    /// Counter collection id. The memory backend falls back to `metrics`.
    pub fn collection_id(&self) -> Result<String, ConfigError> {
        match (&self.store.collection_id, self.store.backend) {
            (Some(id), _) => Ok(id.clone()),
            (None, StoreBackend::Memory) => Ok("metrics".to_string()),
            (None, StoreBackend::Appwrite) => Err(ConfigError::Missing("APPWRITE_COLLECTION_ID")),
        }
    }

    /// Connection settings for the hosted store.
    pub fn appwrite(&self) -> Result<AppwriteConfig, ConfigError> {
        let store = &self.store;
        let project_id = store
            .project_id
            .clone()
            .ok_or(ConfigError::Missing("APPWRITE_PROJECT_ID"))?;
        let database_id = store
            .database_id
            .clone()
            .ok_or(ConfigError::Missing("APPWRITE_DATABASE_ID"))?;
        self.collection_id()?;

        Ok(AppwriteConfig {
            endpoint: store.endpoint.clone(),
            project_id,
            database_id,
            api_key: store.api_key.clone(),
        })
    }
}
