//! # CineScout Discovery
//!
//! Media discovery and personalization over an external, paginated,
//! rate-limited catalog API.
//!
//! The crate exposes five cooperating services plus the collaborator seams
//! they depend on:
//!
//! - [`PagedSearchAggregator`]: stable local page windows over multi-page
//!   upstream search results
//! - [`PersonResolver`] / [`ActorCredits`]: fuzzy actor-name resolution with
//!   tiered fallbacks, and filmography listings
//! - [`TasteProfileBuilder`]: genre/keyword/person weight counters derived
//!   from a user's liked items
//! - [`SuggestionEngine`]: taste-driven discovery queries with a trending
//!   fallback
//! - [`RecommendationMerger`]: suggestion output merged with per-item
//!   recommendation feeds
//!
//! Upstream failures never propagate past a service boundary; every service
//! degrades to empty or partial results. The only fatal error is a missing
//! catalog credential, raised at construction time.

pub mod catalog;
pub mod config;
pub mod genres;
pub mod normalize;
pub mod people;
pub mod recommend;
pub mod search;
pub mod store;
pub mod suggest;
pub mod taste;
pub mod titles;

pub use catalog::{CatalogClient, CatalogPage, DetailExtra, DiscoverFilters, TmdbCatalog};
pub use config::{CatalogConfig, DiscoveryConfig, PeopleConfig, SearchConfig};
pub use genres::GenreBrowser;
pub use normalize::ResultNormalizer;
pub use people::{best_match, name_score, similarity_ratio, ActorCredits, PersonResolver};
pub use recommend::RecommendationMerger;
pub use search::PagedSearchAggregator;
pub use store::{InMemoryLikedItems, LikedItemsStore};
pub use suggest::SuggestionEngine;
pub use taste::{TasteProfileBuilder, TasteSignal, WeightCounter};
pub use titles::{CastEntry, TitleDetails, TitleService};

use std::sync::Arc;

/// Common error type for discovery operations
///
/// `Upstream` and `Malformed` are always recoverable: callers inside this
/// crate absorb them and degrade to empty results. `Config` is fatal and only
/// raised while constructing services. A resolver or lookup finding nothing
/// is an empty `Option`, never an error.
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    #[error("catalog request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    #[error("catalog returned malformed payload: {0}")]
    Malformed(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("liked-items store error: {0}")]
    Store(String),
}

pub type Result<T> = std::result::Result<T, DiscoveryError>;

/// The full discovery service set, wired against one catalog client.
pub struct DiscoveryServices {
    pub search: PagedSearchAggregator,
    pub people: PersonResolver,
    pub credits: ActorCredits,
    pub suggestions: SuggestionEngine,
    pub recommendations: RecommendationMerger,
    pub genres: GenreBrowser,
    pub titles: TitleService,
}

/// Build every discovery service from configuration and a liked-items store.
///
/// Fails fast when the catalog credential is missing; all later upstream
/// failures are absorbed per-call by the services themselves.
pub fn init_services(
    config: &DiscoveryConfig,
    store: Arc<dyn LikedItemsStore>,
) -> Result<DiscoveryServices> {
    config.validate()?;

    let catalog: Arc<dyn CatalogClient> = Arc::new(TmdbCatalog::new(&config.catalog)?);
    let normalizer = ResultNormalizer::new(&config.catalog.image_base_url);

    Ok(DiscoveryServices {
        search: PagedSearchAggregator::new(
            Arc::clone(&catalog),
            normalizer.clone(),
            config.search.clone(),
        ),
        people: PersonResolver::new(Arc::clone(&catalog), config.people.clone()),
        credits: ActorCredits::new(Arc::clone(&catalog), normalizer.clone()),
        suggestions: SuggestionEngine::new(
            Arc::clone(&catalog),
            Arc::clone(&store),
            normalizer.clone(),
        ),
        recommendations: RecommendationMerger::new(
            Arc::clone(&catalog),
            Arc::clone(&store),
            normalizer.clone(),
        ),
        genres: GenreBrowser::new(Arc::clone(&catalog), normalizer.clone()),
        titles: TitleService::new(catalog, normalizer),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_services_requires_credential() {
        let config = DiscoveryConfig::default();
        let store = Arc::new(InMemoryLikedItems::new());

        let services = init_services(&config, store);
        assert!(matches!(services, Err(DiscoveryError::Config(_))));
    }

    #[test]
    fn test_init_services_with_credential() {
        let mut config = DiscoveryConfig::default();
        config.catalog.api_key = "test-key".to_string();
        let store = Arc::new(InMemoryLikedItems::new());

        assert!(init_services(&config, store).is_ok());
    }
}
