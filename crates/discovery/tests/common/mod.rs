//! Scripted catalog fixture shared by the integration tests.
//!
//! Endpoints serve whatever the test loaded into the corresponding field;
//! anything left unset fails the way an unavailable upstream would, which
//! doubles as coverage for the absorb-and-degrade error policy.

#![allow(dead_code)]

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{json, Value};

use cinescout_core::{LikedItem, MediaKey, MediaType};
use cinescout_discovery::catalog::{CatalogClient, CatalogPage, DetailExtra, DiscoverFilters};
use cinescout_discovery::{DiscoveryError, Result};

#[derive(Default)]
pub struct MockCatalog {
    pub search_pages: Vec<Vec<Value>>,
    pub search_total_pages: u32,
    pub discover_combined: HashMap<MediaType, Vec<Value>>,
    pub discover_genre_only: HashMap<MediaType, Vec<Value>>,
    pub discover_total_pages: u32,
    pub details: HashMap<MediaKey, Value>,
    pub recommendation_feeds: HashMap<MediaKey, Vec<Value>>,
    pub person_results: HashMap<String, Vec<Value>>,
    pub popular_pages: Vec<Vec<Value>>,
    pub combined_credits: HashMap<i64, Vec<Value>>,
    pub genre_lists: HashMap<MediaType, Vec<Value>>,
    pub trending_results: Vec<Value>,
    pub providers: HashMap<MediaKey, Value>,
}

fn upstream_down() -> DiscoveryError {
    DiscoveryError::Malformed("scripted upstream failure".to_string())
}

#[async_trait]
impl CatalogClient for MockCatalog {
    async fn search_multi(&self, _query: &str, page: u32) -> Result<CatalogPage> {
        Ok(CatalogPage {
            results: self
                .search_pages
                .get((page.max(1) - 1) as usize)
                .cloned()
                .unwrap_or_default(),
            total_pages: self.search_total_pages,
        })
    }

    async fn discover(
        &self,
        media: MediaType,
        filters: &DiscoverFilters,
        _page: u32,
    ) -> Result<CatalogPage> {
        let source = if filters.keywords.is_empty() && filters.people.is_empty() {
            &self.discover_genre_only
        } else {
            &self.discover_combined
        };

        Ok(CatalogPage {
            results: source.get(&media).cloned().unwrap_or_default(),
            total_pages: self.discover_total_pages,
        })
    }

    async fn detail(&self, media: MediaType, id: i64, _extras: &[DetailExtra]) -> Result<Value> {
        self.details
            .get(&(media, id))
            .cloned()
            .ok_or_else(upstream_down)
    }

    async fn recommendations(&self, media: MediaType, id: i64, _page: u32) -> Result<CatalogPage> {
        let results = self
            .recommendation_feeds
            .get(&(media, id))
            .cloned()
            .ok_or_else(upstream_down)?;
        Ok(CatalogPage {
            results,
            total_pages: 1,
        })
    }

    async fn search_person(&self, query: &str, _page: u32) -> Result<CatalogPage> {
        let results = self
            .person_results
            .get(query)
            .cloned()
            .ok_or_else(upstream_down)?;
        Ok(CatalogPage {
            results,
            total_pages: 1,
        })
    }

    async fn popular_people(&self, page: u32) -> Result<CatalogPage> {
        if self.popular_pages.is_empty() {
            return Err(upstream_down());
        }
        Ok(CatalogPage {
            results: self
                .popular_pages
                .get((page.max(1) - 1) as usize)
                .cloned()
                .unwrap_or_default(),
            total_pages: self.popular_pages.len() as u32,
        })
    }

    async fn person_combined_credits(&self, person_id: i64) -> Result<Vec<Value>> {
        self.combined_credits
            .get(&person_id)
            .cloned()
            .ok_or_else(upstream_down)
    }

    async fn watch_providers(&self, media: MediaType, id: i64) -> Result<Value> {
        self.providers
            .get(&(media, id))
            .cloned()
            .ok_or_else(upstream_down)
    }

    async fn genre_list(&self, media: MediaType) -> Result<Vec<Value>> {
        self.genre_lists
            .get(&media)
            .cloned()
            .ok_or_else(upstream_down)
    }

    async fn trending(&self, _media: MediaType, _page: u32) -> Result<CatalogPage> {
        if self.trending_results.is_empty() {
            return Err(upstream_down());
        }
        Ok(CatalogPage {
            results: self.trending_results.clone(),
            total_pages: 1,
        })
    }
}

pub fn movie_record(id: i64, title: &str) -> Value {
    json!({
        "media_type": "movie",
        "id": id,
        "title": title,
        "release_date": "2020-01-01",
        "poster_path": format!("/m{id}.jpg"),
        "overview": format!("{title} overview")
    })
}

pub fn tv_record(id: i64, title: &str) -> Value {
    json!({
        "media_type": "tv",
        "id": id,
        "name": title,
        "first_air_date": "2021-06-01",
        "poster_path": format!("/t{id}.jpg")
    })
}

/// Recommendation-feed record in its usual shape: no media type, no poster
/// guarantees.
pub fn feed_record(id: i64, title: &str, poster: bool) -> Value {
    let mut record = json!({
        "id": id,
        "title": title,
        "release_date": "2019-05-01"
    });
    if poster {
        record["poster_path"] = json!(format!("/f{id}.jpg"));
    }
    record
}

pub fn person_record(id: i64, name: &str) -> Value {
    json!({"id": id, "name": name})
}

pub fn liked(media_type: MediaType, id: i64, title: &str) -> LikedItem {
    LikedItem {
        media_type,
        catalog_id: id,
        title: title.to_string(),
        liked_at: Utc::now(),
    }
}
