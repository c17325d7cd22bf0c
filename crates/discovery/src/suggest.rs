//! Personalized suggestions from taste signal
//!
//! The engine turns a user's taste signal into discovery queries, strips
//! everything the user already likes, and returns a shuffled, capped batch.
//! Presentation order is deliberately randomized rather than ranked, so
//! repeated calls do not show the same wall of posters.

use std::collections::HashSet;
use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use cinescout_core::{LikedItem, MediaKey, MediaSummary, MediaType};

use crate::catalog::{CatalogClient, DiscoverFilters};
use crate::normalize::ResultNormalizer;
use crate::store::LikedItemsStore;
use crate::taste::TasteProfileBuilder;

/// Cap on returned suggestions.
const MAX_SUGGESTIONS: usize = 10;

/// Per-media-type cap on discovery candidates.
const PER_TYPE_CANDIDATES: usize = 10;

/// Minimum upstream vote count; keeps barely-rated entries out.
const MIN_VOTE_COUNT: u32 = 50;

/// How many of the heaviest ids feed each discovery filter.
const TOP_GENRES: usize = 3;
const TOP_KEYWORDS: usize = 5;
const TOP_PEOPLE: usize = 3;

/// Taste-driven suggestion batches with a trending fallback.
pub struct SuggestionEngine {
    catalog: Arc<dyn CatalogClient>,
    store: Arc<dyn LikedItemsStore>,
    taste: TasteProfileBuilder,
    normalizer: ResultNormalizer,
}

impl SuggestionEngine {
    pub fn new(
        catalog: Arc<dyn CatalogClient>,
        store: Arc<dyn LikedItemsStore>,
        normalizer: ResultNormalizer,
    ) -> Self {
        Self {
            taste: TasteProfileBuilder::new(Arc::clone(&catalog)),
            catalog,
            store,
            normalizer,
        }
    }

    /// Up to ten suggestions for the user, in randomized order. Never fails:
    /// upstream and store trouble degrade to the trending fallback or an
    /// empty batch.
    pub async fn suggest(&self, user: Uuid) -> Vec<MediaSummary> {
        self.suggest_with_rng(user, &mut rand::thread_rng()).await
    }

    /// Same as [`suggest`](Self::suggest) with a caller-provided RNG; tests
    /// pass a seeded generator to pin the shuffle.
    #[instrument(skip(self, rng), fields(user = %user))]
    pub async fn suggest_with_rng<R: Rng + ?Sized>(
        &self,
        user: Uuid,
        rng: &mut R,
    ) -> Vec<MediaSummary> {
        let liked = match self.store.list_for_user(user).await {
            Ok(liked) => liked,
            Err(e) => {
                warn!(error = %e, "liked items unavailable, serving trending");
                Vec::new()
            }
        };

        let signal = self.taste.build(&liked).await;
        if signal.is_empty() {
            debug!("no usable taste signal, serving trending fallback");
            return self.trending_fallback().await;
        }

        let filters = DiscoverFilters {
            genres: signal.genres.top(TOP_GENRES),
            keywords: signal.keywords.top(TOP_KEYWORDS),
            people: signal.people.top(TOP_PEOPLE),
            min_vote_count: Some(MIN_VOTE_COUNT),
        };

        let mut candidates = self.discover_candidates(&filters).await;
        if candidates.is_empty() {
            debug!("combined discovery came back empty, retrying with genres alone");
            candidates = self.discover_candidates(&filters.genres_only()).await;
        }

        let liked_keys: HashSet<MediaKey> = liked.iter().map(LikedItem::key).collect();
        let mut seen: HashSet<MediaKey> = HashSet::new();
        let mut pool: Vec<MediaSummary> = Vec::new();

        for summary in candidates {
            if liked_keys.contains(&summary.key()) {
                continue;
            }
            if seen.insert(summary.key()) {
                pool.push(summary);
            }
        }

        pool.shuffle(rng);
        pool.truncate(MAX_SUGGESTIONS);

        debug!(count = pool.len(), "suggestion batch assembled");
        pool
    }

    /// One discovery query per supported media type; posters required.
    async fn discover_candidates(&self, filters: &DiscoverFilters) -> Vec<MediaSummary> {
        let mut out: Vec<MediaSummary> = Vec::new();

        for media in MediaType::ALL {
            match self.catalog.discover(media, filters, 1).await {
                Ok(listing) => {
                    out.extend(
                        listing
                            .results
                            .iter()
                            .filter_map(|record| {
                                self.normalizer.summary_with_fallback(record, Some(media))
                            })
                            .filter(|summary| summary.poster_url.is_some())
                            .take(PER_TYPE_CANDIDATES),
                    );
                }
                Err(e) => {
                    warn!(error = %e, media = media.as_str(), "discovery query failed");
                }
            }
        }

        out
    }

    /// Unpersonalized fallback: the upstream's trending movies.
    async fn trending_fallback(&self) -> Vec<MediaSummary> {
        match self.catalog.trending(MediaType::Movie, 1).await {
            Ok(listing) => listing
                .results
                .iter()
                .filter_map(|record| {
                    self.normalizer
                        .summary_with_fallback(record, Some(MediaType::Movie))
                })
                .take(MAX_SUGGESTIONS)
                .collect(),
            Err(e) => {
                warn!(error = %e, "trending fallback failed");
                Vec::new()
            }
        }
    }
}
