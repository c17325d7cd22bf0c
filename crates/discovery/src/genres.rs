//! Genre lookup and browsing
//!
//! Genre names arrive as free text from the caller; the upstream only
//! understands genre ids. Lookup is a case-insensitive scan of the upstream
//! genre list; browsing maps one local page to one upstream discover page.

use std::sync::Arc;

use serde_json::Value;
use tracing::{instrument, warn};

use cinescout_core::{MediaSummary, MediaType, Page};

use crate::catalog::{CatalogClient, DiscoverFilters};
use crate::normalize::ResultNormalizer;

/// Genre-keyed browsing over the discovery listing.
pub struct GenreBrowser {
    catalog: Arc<dyn CatalogClient>,
    normalizer: ResultNormalizer,
}

impl GenreBrowser {
    pub fn new(catalog: Arc<dyn CatalogClient>, normalizer: ResultNormalizer) -> Self {
        Self {
            catalog,
            normalizer,
        }
    }

    /// Resolve a genre name to its id and canonical label. Unknown names and
    /// upstream failures both read as no-match.
    #[instrument(skip(self))]
    pub async fn resolve(&self, media: MediaType, name: &str) -> Option<(i64, String)> {
        let records = match self.catalog.genre_list(media).await {
            Ok(records) => records,
            Err(e) => {
                warn!(error = %e, media = media.as_str(), "genre list fetch failed");
                return None;
            }
        };

        let wanted = name.trim().to_lowercase();
        records.iter().find_map(|record| {
            let id = record.get("id").and_then(Value::as_i64)?;
            let label = record.get("name").and_then(Value::as_str)?;
            (label.to_lowercase() == wanted).then(|| (id, label.to_string()))
        })
    }

    /// Popularity-ordered titles for a named genre.
    ///
    /// `None` means the genre name did not resolve; a resolved genre with a
    /// failing listing yields an empty page.
    #[instrument(skip(self))]
    pub async fn browse(
        &self,
        media: MediaType,
        name: &str,
        page: u32,
    ) -> Option<Page<MediaSummary>> {
        let (genre_id, _) = self.resolve(media, name).await?;
        let page = page.max(1);

        let filters = DiscoverFilters {
            genres: vec![genre_id],
            ..DiscoverFilters::default()
        };

        let listing = match self.catalog.discover(media, &filters, page).await {
            Ok(listing) => listing,
            Err(e) => {
                warn!(error = %e, genre_id, "genre discover failed");
                return Some(Page::empty());
            }
        };

        let items = listing
            .results
            .iter()
            .filter_map(|record| self.normalizer.summary_with_fallback(record, Some(media)))
            .collect();

        Some(Page {
            items,
            has_prev: page > 1,
            has_next: listing.total_pages > page,
        })
    }
}
