//! Discovery service configuration
//!
//! Configuration loads from an optional `config/discovery` file overlaid with
//! `CINESCOUT`-prefixed environment variables, with a `.env` file picked up
//! first. The catalog API key may also come from the conventional
//! `TMDB_API_KEY` variable; a missing key is the one fatal startup error.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::{DiscoveryError, Result};

/// Discovery configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DiscoveryConfig {
    /// Catalog API access
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Search window scanning
    #[serde(default)]
    pub search: SearchConfig,

    /// Person name resolution
    #[serde(default)]
    pub people: PeopleConfig,
}

/// Upstream catalog access configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogConfig {
    /// API key for the upstream catalog (required)
    pub api_key: String,

    /// Catalog API base URL
    pub base_url: String,

    /// Image CDN base URL used to expand poster references
    pub image_base_url: String,

    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.themoviedb.org/3".to_string(),
            image_base_url: "https://image.tmdb.org/t/p/".to_string(),
            timeout_ms: 10_000,
        }
    }
}

/// Search aggregation configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    /// Hard ceiling on upstream pages scanned per search request.
    ///
    /// Bounds worst-case upstream calls; a cost/quality tradeoff rather than
    /// a correctness guarantee.
    pub scan_page_limit: u32,

    /// Default local window size
    pub page_size: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            scan_page_limit: 10,
            page_size: 20,
        }
    }
}

/// Person resolution configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PeopleConfig {
    /// Minimum combined similarity score a candidate must reach
    pub match_threshold: f64,

    /// Popular-people pages pooled by the fallback resolver
    pub popular_scan_pages: u32,
}

impl Default for PeopleConfig {
    fn default() -> Self {
        Self {
            match_threshold: 0.68,
            popular_scan_pages: 3,
        }
    }
}

impl DiscoveryConfig {
    /// Load configuration from `config/discovery` and the environment.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let settings = config::Config::builder()
            .add_source(config::File::with_name("config/discovery").required(false))
            .add_source(config::Environment::with_prefix("CINESCOUT").separator("__"))
            .build()
            .map_err(|e| DiscoveryError::Config(e.to_string()))?;

        let mut loaded: DiscoveryConfig = settings
            .try_deserialize()
            .map_err(|e| DiscoveryError::Config(e.to_string()))?;

        if loaded.catalog.api_key.trim().is_empty() {
            if let Ok(key) = std::env::var("TMDB_API_KEY") {
                loaded.catalog.api_key = key;
            }
        }

        loaded.validate()?;
        Ok(loaded)
    }

    /// Check invariants the services rely on. A missing API key fails here,
    /// at startup, rather than on the first request.
    pub fn validate(&self) -> Result<()> {
        if self.catalog.api_key.trim().is_empty() {
            return Err(DiscoveryError::Config(
                "catalog API key is not set".to_string(),
            ));
        }
        if self.search.scan_page_limit == 0 {
            return Err(DiscoveryError::Config(
                "search.scan_page_limit must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.people.match_threshold) {
            return Err(DiscoveryError::Config(
                "people.match_threshold must be within [0, 1]".to_string(),
            ));
        }
        Ok(())
    }

    /// Per-request catalog timeout as a `Duration`.
    pub fn catalog_timeout(&self) -> Duration {
        Duration::from_millis(self.catalog.timeout_ms)
    }
}
