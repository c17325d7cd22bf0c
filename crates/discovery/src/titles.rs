//! Title detail assembly
//!
//! One detail fetch with credits, videos, and similar titles appended, plus a
//! watch-providers call, assembled into everything a detail surface renders.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use cinescout_core::{MediaSummary, MediaType};

use crate::catalog::{CatalogClient, DetailExtra};
use crate::normalize::ResultNormalizer;

/// Cast rows shown on a detail surface.
const DETAIL_CAST: usize = 5;

/// Similar titles shown on a detail surface.
const DETAIL_SIMILAR: usize = 8;

/// Region used for watch-provider listings.
const PROVIDER_REGION: &str = "US";

/// One cast row for the detail surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CastEntry {
    pub name: String,
    pub character: Option<String>,
}

/// Assembled detail record for one title.
#[derive(Debug, Clone, Serialize)]
pub struct TitleDetails {
    pub summary: MediaSummary,
    pub genres: Vec<String>,
    pub vote_average: Option<f64>,
    pub cast: Vec<CastEntry>,
    pub trailer_url: Option<String>,
    pub similar: Vec<MediaSummary>,
    pub providers: Vec<String>,
}

/// Detail-surface assembly for single titles.
pub struct TitleService {
    catalog: Arc<dyn CatalogClient>,
    normalizer: ResultNormalizer,
}

impl TitleService {
    pub fn new(catalog: Arc<dyn CatalogClient>, normalizer: ResultNormalizer) -> Self {
        Self {
            catalog,
            normalizer,
        }
    }

    /// Fetch and assemble the detail surface for one title.
    ///
    /// An upstream failure on the main detail call reads as "not found"; a
    /// failing provider lookup just leaves the provider list empty.
    #[instrument(skip(self))]
    pub async fn title_details(&self, media: MediaType, id: i64) -> Option<TitleDetails> {
        let detail = match self
            .catalog
            .detail(
                media,
                id,
                &[DetailExtra::Credits, DetailExtra::Videos, DetailExtra::Similar],
            )
            .await
        {
            Ok(detail) => detail,
            Err(e) => {
                warn!(error = %e, id, "detail fetch failed");
                return None;
            }
        };

        let summary = self.normalizer.detail_summary(&detail, Some(media))?;

        let genres = detail
            .get("genres")
            .and_then(Value::as_array)
            .map(|genres| {
                genres
                    .iter()
                    .filter_map(|genre| genre.get("name").and_then(Value::as_str))
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let vote_average = detail.get("vote_average").and_then(Value::as_f64);

        let cast = detail
            .pointer("/credits/cast")
            .and_then(Value::as_array)
            .map(|cast| {
                cast.iter()
                    .take(DETAIL_CAST)
                    .filter_map(|member| {
                        let name = member.get("name").and_then(Value::as_str)?;
                        Some(CastEntry {
                            name: name.to_string(),
                            character: member
                                .get("character")
                                .and_then(Value::as_str)
                                .filter(|text| !text.is_empty())
                                .map(str::to_string),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        let trailer_url = detail
            .pointer("/videos/results")
            .and_then(Value::as_array)
            .and_then(|videos| {
                videos.iter().find(|video| {
                    video.get("site").and_then(Value::as_str) == Some("YouTube")
                        && video.get("type").and_then(Value::as_str) == Some("Trailer")
                })
            })
            .and_then(|video| video.get("key").and_then(Value::as_str))
            .map(|key| format!("https://www.youtube.com/watch?v={key}"));

        let similar = detail
            .pointer("/similar/results")
            .and_then(Value::as_array)
            .map(|records| {
                records
                    .iter()
                    .filter_map(|record| self.normalizer.summary_with_fallback(record, Some(media)))
                    .filter(|summary| summary.poster_url.is_some())
                    .take(DETAIL_SIMILAR)
                    .collect()
            })
            .unwrap_or_default();

        let providers = self.provider_names(media, id).await;

        Some(TitleDetails {
            summary,
            genres,
            vote_average,
            cast,
            trailer_url,
            similar,
            providers,
        })
    }

    async fn provider_names(&self, media: MediaType, id: i64) -> Vec<String> {
        let data = match self.catalog.watch_providers(media, id).await {
            Ok(data) => data,
            Err(e) => {
                debug!(error = %e, id, "watch providers fetch failed");
                return Vec::new();
            }
        };

        data.pointer(&format!("/results/{PROVIDER_REGION}/flatrate"))
            .and_then(Value::as_array)
            .map(|providers| {
                providers
                    .iter()
                    .filter_map(|provider| provider.get("provider_name").and_then(Value::as_str))
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}
