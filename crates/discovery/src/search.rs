//! Multi-page search aggregation with stable local windows
//!
//! The upstream search endpoint pages a live dataset on its own schedule.
//! This aggregator scans successive upstream pages into a deduplicated
//! accumulator and exposes fixed-size local windows over it, so callers see
//! consistent paging regardless of the upstream page size.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, instrument, warn};

use cinescout_core::{MediaKey, MediaSummary, MediaType, Page};

use crate::catalog::{CatalogClient, CatalogPage};
use crate::config::SearchConfig;
use crate::normalize::ResultNormalizer;

/// Free-text catalog search with local page windows.
pub struct PagedSearchAggregator {
    catalog: Arc<dyn CatalogClient>,
    normalizer: ResultNormalizer,
    config: SearchConfig,
}

impl PagedSearchAggregator {
    pub fn new(
        catalog: Arc<dyn CatalogClient>,
        normalizer: ResultNormalizer,
        config: SearchConfig,
    ) -> Self {
        Self {
            catalog,
            normalizer,
            config,
        }
    }

    /// Search with the configured default window size.
    pub async fn search_page(
        &self,
        query: &str,
        local_page: usize,
        type_filter: Option<MediaType>,
    ) -> Page<MediaSummary> {
        self.search(query, local_page, self.config.page_size, type_filter)
            .await
    }

    /// Assemble one local page window for a free-text query.
    ///
    /// Upstream pages are scanned from page 1 until the requested window plus
    /// one extra item is filled (the extra item detects a following page),
    /// the upstream reports no more pages, or the configured scan ceiling is
    /// reached. A failed page fetch reads as an empty page with a total page
    /// count of zero, which ends the scan the same way exhaustion does.
    #[instrument(skip(self), fields(query = %query, page = %local_page))]
    pub async fn search(
        &self,
        query: &str,
        local_page: usize,
        page_size: usize,
        type_filter: Option<MediaType>,
    ) -> Page<MediaSummary> {
        let local_page = local_page.max(1);
        let page_size = page_size.max(1);
        let start = (local_page - 1) * page_size;
        let end = start + page_size;

        let mut seen: HashSet<MediaKey> = HashSet::new();
        let mut collected: Vec<MediaSummary> = Vec::new();
        let mut cursor: u32 = 1;
        let mut upstream_total: u32 = 1;

        while collected.len() <= end
            && cursor <= upstream_total
            && cursor <= self.config.scan_page_limit
        {
            let upstream = match self.catalog.search_multi(query, cursor).await {
                Ok(upstream) => upstream,
                Err(e) => {
                    warn!(error = %e, upstream_page = cursor, "search page fetch failed, ending scan");
                    CatalogPage::default()
                }
            };

            upstream_total = upstream.total_pages;

            for record in &upstream.results {
                // normalization drops anything that is not a movie or TV show
                let Some(summary) = self.normalizer.summary(record) else {
                    continue;
                };
                if seen.insert(summary.key()) {
                    collected.push(summary);
                }
            }

            cursor += 1;
        }

        let filtered: Vec<MediaSummary> = match type_filter {
            Some(wanted) => collected
                .into_iter()
                .filter(|summary| summary.media_type == wanted)
                .collect(),
            None => collected,
        };

        let total = filtered.len();
        debug!(collected = total, scanned_pages = cursor - 1, "search window assembled");

        let items = if start >= total {
            Vec::new()
        } else {
            filtered[start..end.min(total)].to_vec()
        };

        Page {
            items,
            has_prev: local_page > 1 && start < total,
            has_next: total > end,
        }
    }
}
