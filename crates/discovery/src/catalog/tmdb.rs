//! TMDB-backed catalog client
//!
//! Thin REST client for the TMDB v3 API. No retries and no response caching:
//! a failed or timed-out call surfaces as one `Upstream` error, which the
//! services absorb as an empty result for that call.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use cinescout_core::MediaType;

use super::{CatalogClient, CatalogPage, DetailExtra, DiscoverFilters};
use crate::config::CatalogConfig;
use crate::{DiscoveryError, Result};

/// Catalog client for the TMDB v3 API.
pub struct TmdbCatalog {
    client: Client,
    api_key: String,
    base_url: String,
}

impl TmdbCatalog {
    /// Build a client from catalog configuration.
    ///
    /// Fails when the API key is missing; this is the fatal startup error of
    /// the whole crate, everything later degrades instead of failing.
    pub fn new(config: &CatalogConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(DiscoveryError::Config(
                "catalog API key is not set".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get(&self, path: &str, params: &[(&str, String)]) -> Result<Value> {
        let mut url = format!("{}{}?api_key={}", self.base_url, path, self.api_key);
        for (name, value) in params {
            url.push_str(&format!("&{}={}", name, urlencoding::encode(value)));
        }

        debug!(path = %path, "catalog request");

        let response = self.client.get(&url).send().await?.error_for_status()?;
        Ok(response.json().await?)
    }

    fn page_of(data: Value) -> Result<CatalogPage> {
        let results = data
            .get("results")
            .and_then(Value::as_array)
            .cloned()
            .ok_or_else(|| DiscoveryError::Malformed("no results array in response".to_string()))?;

        let total_pages = data
            .get("total_pages")
            .and_then(Value::as_u64)
            .unwrap_or(0) as u32;

        Ok(CatalogPage {
            results,
            total_pages,
        })
    }

    fn join_ids(ids: &[i64]) -> String {
        ids.iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }
}

#[async_trait]
impl CatalogClient for TmdbCatalog {
    async fn search_multi(&self, query: &str, page: u32) -> Result<CatalogPage> {
        let data = self
            .get(
                "/search/multi",
                &[
                    ("query", query.to_string()),
                    ("page", page.to_string()),
                    ("include_adult", "false".to_string()),
                ],
            )
            .await?;
        Self::page_of(data)
    }

    async fn discover(
        &self,
        media: MediaType,
        filters: &DiscoverFilters,
        page: u32,
    ) -> Result<CatalogPage> {
        let mut params = vec![
            ("sort_by", "popularity.desc".to_string()),
            ("include_adult", "false".to_string()),
            ("page", page.to_string()),
        ];
        if !filters.genres.is_empty() {
            params.push(("with_genres", Self::join_ids(&filters.genres)));
        }
        if !filters.keywords.is_empty() {
            params.push(("with_keywords", Self::join_ids(&filters.keywords)));
        }
        if !filters.people.is_empty() {
            params.push(("with_people", Self::join_ids(&filters.people)));
        }
        if let Some(floor) = filters.min_vote_count {
            params.push(("vote_count.gte", floor.to_string()));
        }

        let data = self
            .get(&format!("/discover/{}", media.as_str()), &params)
            .await?;
        Self::page_of(data)
    }

    async fn detail(&self, media: MediaType, id: i64, extras: &[DetailExtra]) -> Result<Value> {
        let mut params = Vec::new();
        if !extras.is_empty() {
            let appended = extras
                .iter()
                .map(DetailExtra::as_str)
                .collect::<Vec<_>>()
                .join(",");
            params.push(("append_to_response", appended));
        }

        self.get(&format!("/{}/{}", media.as_str(), id), &params)
            .await
    }

    async fn recommendations(&self, media: MediaType, id: i64, page: u32) -> Result<CatalogPage> {
        let data = self
            .get(
                &format!("/{}/{}/recommendations", media.as_str(), id),
                &[("page", page.to_string())],
            )
            .await?;
        Self::page_of(data)
    }

    async fn search_person(&self, query: &str, page: u32) -> Result<CatalogPage> {
        let data = self
            .get(
                "/search/person",
                &[
                    ("query", query.to_string()),
                    ("page", page.to_string()),
                    ("include_adult", "false".to_string()),
                ],
            )
            .await?;
        Self::page_of(data)
    }

    async fn popular_people(&self, page: u32) -> Result<CatalogPage> {
        let data = self
            .get("/person/popular", &[("page", page.to_string())])
            .await?;
        Self::page_of(data)
    }

    async fn person_combined_credits(&self, person_id: i64) -> Result<Vec<Value>> {
        let data = self
            .get(&format!("/person/{}/combined_credits", person_id), &[])
            .await?;

        data.get("cast")
            .and_then(Value::as_array)
            .cloned()
            .ok_or_else(|| DiscoveryError::Malformed("no cast array in credits".to_string()))
    }

    async fn watch_providers(&self, media: MediaType, id: i64) -> Result<Value> {
        self.get(&format!("/{}/{}/watch/providers", media.as_str(), id), &[])
            .await
    }

    async fn genre_list(&self, media: MediaType) -> Result<Vec<Value>> {
        let data = self
            .get(&format!("/genre/{}/list", media.as_str()), &[])
            .await?;

        data.get("genres")
            .and_then(Value::as_array)
            .cloned()
            .ok_or_else(|| DiscoveryError::Malformed("no genres array in response".to_string()))
    }

    async fn trending(&self, media: MediaType, page: u32) -> Result<CatalogPage> {
        let data = self
            .get(
                &format!("/trending/{}/week", media.as_str()),
                &[("page", page.to_string())],
            )
            .await?;
        Self::page_of(data)
    }
}
