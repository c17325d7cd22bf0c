//! Catalog API client seam
//!
//! One trait method per upstream operation. Every call may fail with a
//! transport or status error; services treat any failure uniformly as "no
//! data" for that one call. Responses are raw `serde_json::Value` records;
//! the result normalizer owns the mapping into domain types.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use cinescout_core::MediaType;

use crate::Result;

pub mod tmdb;

pub use tmdb::TmdbCatalog;

/// One upstream result page with the upstream's own page accounting.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogPage {
    /// Raw records in upstream order
    pub results: Vec<Value>,

    /// Total page count reported by the upstream for this query
    pub total_pages: u32,
}

/// Sub-resources that can be attached to a single detail fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailExtra {
    Credits,
    Keywords,
    Videos,
    Similar,
}

impl DetailExtra {
    /// Wire name used in the `append_to_response` parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            DetailExtra::Credits => "credits",
            DetailExtra::Keywords => "keywords",
            DetailExtra::Videos => "videos",
            DetailExtra::Similar => "similar",
        }
    }
}

/// Filters for a discovery query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoverFilters {
    /// Genre ids, all applied
    pub genres: Vec<i64>,

    /// Keyword ids, all applied
    pub keywords: Vec<i64>,

    /// Person ids (cast or crew), all applied
    pub people: Vec<i64>,

    /// Minimum upstream vote count
    pub min_vote_count: Option<u32>,
}

impl DiscoverFilters {
    /// The same query reduced to its genre filter; the suggestion engine's
    /// retry path when the combined query comes back empty.
    pub fn genres_only(&self) -> Self {
        Self {
            genres: self.genres.clone(),
            keywords: Vec::new(),
            people: Vec::new(),
            min_vote_count: self.min_vote_count,
        }
    }
}

/// Remote catalog operations consumed by the discovery services.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Free-text search across movies, TV shows, and people.
    async fn search_multi(&self, query: &str, page: u32) -> Result<CatalogPage>;

    /// Filtered discovery listing, popularity-descending, adult excluded.
    async fn discover(
        &self,
        media: MediaType,
        filters: &DiscoverFilters,
        page: u32,
    ) -> Result<CatalogPage>;

    /// Full detail record with the requested sub-resources attached.
    async fn detail(&self, media: MediaType, id: i64, extras: &[DetailExtra]) -> Result<Value>;

    /// "More like this" records for one item.
    async fn recommendations(&self, media: MediaType, id: i64, page: u32) -> Result<CatalogPage>;

    /// Person search by name.
    async fn search_person(&self, query: &str, page: u32) -> Result<CatalogPage>;

    /// The upstream's popular-people listing.
    async fn popular_people(&self, page: u32) -> Result<CatalogPage>;

    /// A person's combined movie and TV credits.
    async fn person_combined_credits(&self, person_id: i64) -> Result<Vec<Value>>;

    /// Streaming availability by region for one item.
    async fn watch_providers(&self, media: MediaType, id: i64) -> Result<Value>;

    /// Genre id/name pairs for one media type.
    async fn genre_list(&self, media: MediaType) -> Result<Vec<Value>>;

    /// The upstream's weekly trending listing.
    async fn trending(&self, media: MediaType, page: u32) -> Result<CatalogPage>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_extra_wire_names() {
        assert_eq!(DetailExtra::Credits.as_str(), "credits");
        assert_eq!(DetailExtra::Keywords.as_str(), "keywords");
        assert_eq!(DetailExtra::Videos.as_str(), "videos");
        assert_eq!(DetailExtra::Similar.as_str(), "similar");
    }

    #[test]
    fn test_genres_only_keeps_vote_floor() {
        let filters = DiscoverFilters {
            genres: vec![28, 12],
            keywords: vec![9715],
            people: vec![6384],
            min_vote_count: Some(50),
        };

        let reduced = filters.genres_only();
        assert_eq!(reduced.genres, vec![28, 12]);
        assert!(reduced.keywords.is_empty());
        assert!(reduced.people.is_empty());
        assert_eq!(reduced.min_vote_count, Some(50));
    }
}
