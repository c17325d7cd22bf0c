//! Merging suggestions with per-item recommendation feeds
//!
//! The merger takes the suggestion engine's batch as-is and fills the
//! remaining capacity with "more like this" results for the user's most
//! recent likes. Base items always come first and are never reordered.

use std::collections::HashSet;
use std::sync::Arc;

use futures::future::join_all;
use tracing::{instrument, warn};
use uuid::Uuid;

use cinescout_core::{LikedItem, MediaKey, MediaSummary};

use crate::catalog::CatalogClient;
use crate::normalize::ResultNormalizer;
use crate::store::LikedItemsStore;

/// Cap on the merged result set.
const MAX_MERGED: usize = 40;

/// Most-recent liked items whose recommendation feeds are fetched.
const RECENT_LIKES: usize = 6;

/// Combines a base result set with per-liked-item recommendations.
pub struct RecommendationMerger {
    catalog: Arc<dyn CatalogClient>,
    store: Arc<dyn LikedItemsStore>,
    normalizer: ResultNormalizer,
}

impl RecommendationMerger {
    pub fn new(
        catalog: Arc<dyn CatalogClient>,
        store: Arc<dyn LikedItemsStore>,
        normalizer: ResultNormalizer,
    ) -> Self {
        Self {
            catalog,
            store,
            normalizer,
        }
    }

    /// Append recommendation items to `base` without disturbing its order.
    ///
    /// Recommendations come from the feeds of the user's six most recent
    /// likes, fetched concurrently; a failed feed is skipped. Items without
    /// posters, items already in `base`, and items the user already likes
    /// are all dropped. The result is truncated to forty entries.
    #[instrument(skip(self, base), fields(user = %user, base = base.len()))]
    pub async fn merge(&self, base: Vec<MediaSummary>, user: Uuid) -> Vec<MediaSummary> {
        let liked = match self.store.list_for_user(user).await {
            Ok(liked) => liked,
            Err(e) => {
                warn!(error = %e, "liked items unavailable, returning base set");
                Vec::new()
            }
        };

        let liked_keys: HashSet<MediaKey> = liked.iter().map(LikedItem::key).collect();

        let fetches = liked.iter().take(RECENT_LIKES).map(|item| {
            let catalog = Arc::clone(&self.catalog);
            async move {
                let outcome = catalog
                    .recommendations(item.media_type, item.catalog_id, 1)
                    .await;
                (item, outcome)
            }
        });

        let mut merged = base;
        let mut seen: HashSet<MediaKey> = merged.iter().map(MediaSummary::key).collect();

        for (item, outcome) in join_all(fetches).await {
            let listing = match outcome {
                Ok(listing) => listing,
                Err(e) => {
                    warn!(
                        error = %e,
                        catalog_id = item.catalog_id,
                        "recommendation feed fetch failed, skipping"
                    );
                    continue;
                }
            };

            for record in &listing.results {
                // feeds usually omit the media type; assume recommendations
                // stay within the source item's type (cross-type entries
                // would be misclassified here)
                let Some(summary) = self
                    .normalizer
                    .summary_with_fallback(record, Some(item.media_type))
                else {
                    continue;
                };
                if summary.poster_url.is_none() {
                    continue;
                }
                if liked_keys.contains(&summary.key()) {
                    continue;
                }
                if seen.insert(summary.key()) {
                    merged.push(summary);
                }
            }
        }

        merged.truncate(MAX_MERGED);
        merged
    }
}
