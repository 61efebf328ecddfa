//! Catalog records.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Prefix for poster images at card size.
pub const POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";
/// Image shown when a movie has no poster.
pub const NO_POSTER: &str = "/no-movie.png";

/// A movie as returned by the catalog.
///
/// Only the fields used for display are typed; everything else is kept in
/// `extra` so the record serializes back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vote_average: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Movie {
    /// Full poster URL, or the placeholder image.
    pub fn poster_url(&self) -> String {
        match self.poster_path.as_deref() {
            Some(path) if !path.is_empty() => format!("{}{}", POSTER_BASE_URL, path),
            _ => NO_POSTER.to_string(),
        }
    }

    /// Average vote to one decimal. Unrated movies (missing or zero) show `N/A`.
    pub fn rating(&self) -> String {
        match self.vote_average {
            Some(v) if v != 0.0 => format!("{:.1}", v),
            _ => "N/A".to_string(),
        }
    }

    /// Release year, or `N/A`.
    pub fn year(&self) -> &str {
        self.release_date
            .as_deref()
            .and_then(|date| date.split('-').next())
            .filter(|year| !year.is_empty())
            .unwrap_or("N/A")
    }

    pub fn language(&self) -> &str {
        self.original_language.as_deref().unwrap_or("N/A")
    }
}

/// One page of catalog results.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogPage {
    #[serde(default)]
    pub page: Option<u64>,
    #[serde(default)]
    pub results: Option<Vec<Movie>>,
    #[serde(default)]
    pub total_results: Option<u64>,
    /// Legacy failure flag, `"false"` or `false` when the lookup failed.
    #[serde(default)]
    response: Option<Value>,
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    status_message: Option<String>,
}

impl CatalogPage {
    /// Whether a 2xx body still reports failure.
    pub fn is_failure(&self) -> bool {
        let flagged = match &self.response {
            Some(Value::String(s)) => s.eq_ignore_ascii_case("false"),
            Some(Value::Bool(b)) => !b,
            _ => false,
        };
        flagged || self.success == Some(false)
    }

    /// Failure description reported by the catalog, if any.
    pub fn failure_message(&self) -> &str {
        self.status_message
            .as_deref()
            .unwrap_or("catalog flagged the response as failed")
    }

    /// Results, empty when the field is absent or null.
    pub fn into_results(self) -> Vec<Movie> {
        self.results.unwrap_or_default()
    }
}
