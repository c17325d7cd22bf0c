//! Taste signal derived from a user's liked items
//!
//! For each liked item the builder fetches the detail record with credits and
//! keywords attached, then accumulates three independent frequency counters.
//! The signal is built once per suggestion request from the full liked set
//! and discarded afterwards; nothing is shared across requests.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::join_all;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use cinescout_core::LikedItem;

use crate::catalog::{CatalogClient, DetailExtra};

/// Cast members counted from the top of the billing order.
const TOP_BILLED_CAST: usize = 5;

/// Crew jobs that shape a title more than a single appearance does.
const KEY_CREW_JOBS: [&str; 3] = ["Director", "Writer", "Creator"];

/// Weight added per key crew credit (a cast appearance adds 1).
const KEY_CREW_WEIGHT: u32 = 2;

/// Frequency counter that remembers first-encounter order, so equal weights
/// rank deterministically in counting order.
#[derive(Debug, Clone, Default)]
pub struct WeightCounter {
    weights: HashMap<i64, u32>,
    order: Vec<i64>,
}

impl WeightCounter {
    /// Add `weight` to `id`, registering it on first encounter.
    pub fn add(&mut self, id: i64, weight: u32) {
        if !self.weights.contains_key(&id) {
            self.order.push(id);
        }
        *self.weights.entry(id).or_insert(0) += weight;
    }

    /// Accumulated weight for `id`, zero when never counted.
    pub fn weight(&self, id: i64) -> u32 {
        self.weights.get(&id).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// The `n` heaviest ids; equal weights keep encounter order.
    pub fn top(&self, n: usize) -> Vec<i64> {
        let mut ranked: Vec<(usize, i64, u32)> = self
            .order
            .iter()
            .enumerate()
            .map(|(position, &id)| (position, id, self.weights[&id]))
            .collect();

        ranked.sort_by(|a, b| b.2.cmp(&a.2).then(a.0.cmp(&b.0)));
        ranked.into_iter().take(n).map(|(_, id, _)| id).collect()
    }
}

/// Aggregated genre/keyword/person weights for one suggestion request.
#[derive(Debug, Clone, Default)]
pub struct TasteSignal {
    pub genres: WeightCounter,
    pub keywords: WeightCounter,
    pub people: WeightCounter,
}

impl TasteSignal {
    /// True when nothing accumulated: the user has no likes, or every detail
    /// fetch failed. Callers fall back to an unpersonalized listing.
    pub fn is_empty(&self) -> bool {
        self.genres.is_empty() && self.keywords.is_empty() && self.people.is_empty()
    }

    fn absorb(&mut self, detail: &Value) {
        if let Some(genres) = detail.get("genres").and_then(Value::as_array) {
            for genre in genres {
                if let Some(id) = genre.get("id").and_then(Value::as_i64) {
                    self.genres.add(id, 1);
                }
            }
        }

        // movie details nest keywords under `keywords`, TV under `results`
        let keywords = detail
            .get("keywords")
            .and_then(|node| node.get("keywords").or_else(|| node.get("results")))
            .and_then(Value::as_array);
        if let Some(keywords) = keywords {
            for keyword in keywords {
                if let Some(id) = keyword.get("id").and_then(Value::as_i64) {
                    self.keywords.add(id, 1);
                }
            }
        }

        if let Some(cast) = detail.pointer("/credits/cast").and_then(Value::as_array) {
            for member in cast.iter().take(TOP_BILLED_CAST) {
                if let Some(id) = member.get("id").and_then(Value::as_i64) {
                    self.people.add(id, 1);
                }
            }
        }

        if let Some(crew) = detail.pointer("/credits/crew").and_then(Value::as_array) {
            for member in crew {
                let job = member.get("job").and_then(Value::as_str).unwrap_or("");
                if KEY_CREW_JOBS.contains(&job) {
                    if let Some(id) = member.get("id").and_then(Value::as_i64) {
                        self.people.add(id, KEY_CREW_WEIGHT);
                    }
                }
            }
        }
    }
}

/// Builds a [`TasteSignal`] from liked-item detail records.
pub struct TasteProfileBuilder {
    catalog: Arc<dyn CatalogClient>,
}

impl TasteProfileBuilder {
    pub fn new(catalog: Arc<dyn CatalogClient>) -> Self {
        Self { catalog }
    }

    /// Fetch details for every liked item and accumulate the counters.
    ///
    /// Detail fetches run concurrently; results fold in liked-item order so
    /// encounter-order tie-breaks stay deterministic. An individual failure
    /// skips that item, partial signal is acceptable.
    #[instrument(skip(self, liked), fields(liked = liked.len()))]
    pub async fn build(&self, liked: &[LikedItem]) -> TasteSignal {
        let fetches = liked.iter().map(|item| {
            let catalog = Arc::clone(&self.catalog);
            async move {
                let outcome = catalog
                    .detail(
                        item.media_type,
                        item.catalog_id,
                        &[DetailExtra::Credits, DetailExtra::Keywords],
                    )
                    .await;
                (item, outcome)
            }
        });

        let mut signal = TasteSignal::default();
        for (item, outcome) in join_all(fetches).await {
            match outcome {
                Ok(detail) => signal.absorb(&detail),
                Err(e) => {
                    warn!(
                        error = %e,
                        catalog_id = item.catalog_id,
                        "liked item detail fetch failed, skipping"
                    );
                }
            }
        }

        debug!(empty = signal.is_empty(), "taste signal built");
        signal
    }
}
