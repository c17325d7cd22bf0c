//! Domain models for catalog items, liked items, and people
//!
//! These are the request-scoped value types passed between the catalog
//! client, the normalizer, and the discovery services. None of them persist
//! beyond a single aggregation or suggestion call.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Media categories supported by the discovery surface.
///
/// The upstream catalog also returns people and other record kinds from its
/// multi-search endpoint; everything that is not a movie or TV show is
/// filtered out before normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Tv,
}

impl MediaType {
    /// Both supported media types, in the order discovery queries issue them.
    pub const ALL: [MediaType; 2] = [MediaType::Movie, MediaType::Tv];

    /// Wire name used in upstream paths and `media_type` fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Tv => "tv",
        }
    }

    /// Parse an upstream `media_type` value. Unknown kinds yield `None`.
    pub fn parse(value: &str) -> Option<MediaType> {
        match value {
            "movie" => Some(MediaType::Movie),
            "tv" => Some(MediaType::Tv),
            _ => None,
        }
    }
}

/// Identity key for a catalog item.
///
/// Upstream ids are only unique within a media type, so every deduplication
/// step keys on the pair.
pub type MediaKey = (MediaType, i64);

/// Canonical summary of one catalog item.
///
/// Immutable once constructed; produced only by the result normalizer. The
/// poster reference is a fully expanded image URL, never a bare path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaSummary {
    /// Upstream catalog id (unique per media type)
    pub id: i64,

    /// Whether this is a movie or a TV show
    pub media_type: MediaType,

    /// Display title
    pub title: String,

    /// Full poster image URL, if the catalog has artwork
    pub poster_url: Option<String>,

    /// Release indicator (release date for movies, first air date for TV)
    pub release: Option<String>,

    /// Short synopsis
    pub overview: Option<String>,
}

impl MediaSummary {
    /// Identity key used for deduplication across result sets.
    pub fn key(&self) -> MediaKey {
        (self.media_type, self.id)
    }
}

/// A media entry the user has previously marked as a favorite.
///
/// Owned by the external liked-items store; this library only reads them to
/// derive taste signal and to exclude already-liked items from results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikedItem {
    /// Whether the liked entry is a movie or a TV show
    pub media_type: MediaType,

    /// Upstream catalog id of the liked entry
    pub catalog_id: i64,

    /// Title at the time the item was liked
    pub title: String,

    /// When the user liked the item
    pub liked_at: DateTime<Utc>,
}

impl LikedItem {
    /// Identity key matching [`MediaSummary::key`].
    pub fn key(&self) -> MediaKey {
        (self.media_type, self.catalog_id)
    }
}

/// One row from an upstream person search.
///
/// Ephemeral; only used while resolving a free-text name to a person id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonCandidate {
    /// Upstream person id
    pub id: i64,

    /// Person name as listed by the catalog
    pub name: String,
}
