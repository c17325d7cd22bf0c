//! Raw catalog records to canonical media summaries
//!
//! Every path that touches raw catalog output goes through this mapping.
//! Records of unsupported kinds (people, collections) are dropped, and
//! poster references are expanded to full image URLs with a pure string
//! join. Already-normalized fields pass through unchanged, so feeding a
//! summary back through the mapping is a no-op.

use serde_json::Value;

use cinescout_core::{MediaSummary, MediaType};

/// Poster size used on listing surfaces.
pub const LIST_POSTER_SIZE: &str = "w500";

/// Poster size used on detail surfaces.
pub const DETAIL_POSTER_SIZE: &str = "w780";

/// Maps raw catalog records into [`MediaSummary`] values.
#[derive(Debug, Clone)]
pub struct ResultNormalizer {
    image_base: String,
}

impl ResultNormalizer {
    pub fn new(image_base: impl Into<String>) -> Self {
        Self {
            image_base: image_base.into(),
        }
    }

    /// Map one raw record. Records without a supported `media_type` are
    /// dropped.
    pub fn summary(&self, record: &Value) -> Option<MediaSummary> {
        self.summary_with_fallback(record, None)
    }

    /// Map one raw record, defaulting a missing `media_type` to `fallback`.
    ///
    /// Recommendation and discovery feeds often omit the type because it is
    /// implied by the endpoint; the caller supplies it.
    pub fn summary_with_fallback(
        &self,
        record: &Value,
        fallback: Option<MediaType>,
    ) -> Option<MediaSummary> {
        self.map_record(record, fallback, LIST_POSTER_SIZE)
    }

    /// Same mapping with the larger detail-surface poster size.
    pub fn detail_summary(
        &self,
        record: &Value,
        fallback: Option<MediaType>,
    ) -> Option<MediaSummary> {
        self.map_record(record, fallback, DETAIL_POSTER_SIZE)
    }

    fn map_record(
        &self,
        record: &Value,
        fallback: Option<MediaType>,
        poster_size: &str,
    ) -> Option<MediaSummary> {
        let media_type = record
            .get("media_type")
            .and_then(Value::as_str)
            .and_then(MediaType::parse)
            .or(fallback)?;

        let id = record.get("id").and_then(Value::as_i64)?;

        let title = non_empty(record.get("title")).or_else(|| non_empty(record.get("name")))?;

        let release = non_empty(record.get("release_date"))
            .or_else(|| non_empty(record.get("first_air_date")))
            .or_else(|| non_empty(record.get("release")));

        let poster_url = non_empty(record.get("poster_path"))
            .or_else(|| non_empty(record.get("poster_url")))
            .map(|reference| self.expand_poster(&reference, poster_size));

        let overview = non_empty(record.get("overview"));

        Some(MediaSummary {
            id,
            media_type,
            title,
            poster_url,
            release,
            overview,
        })
    }

    /// Expand a bare poster path against the image CDN base. Absolute
    /// references pass through untouched.
    pub fn expand_poster(&self, reference: &str, size: &str) -> String {
        if reference.starts_with("http://") || reference.starts_with("https://") {
            reference.to_string()
        } else {
            format!("{}{}{}", self.image_base, size, reference)
        }
    }
}

fn non_empty(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}
