//! # CineScout Core
//!
//! Shared building blocks for the CineScout discovery library.
//!
//! ## Modules
//!
//! - `models`: domain models for catalog items, liked items, and people
//! - `pagination`: caller-facing page windows decoupled from upstream paging
//! - `telemetry`: tracing subscriber initialization for consuming binaries

pub mod models;
pub mod pagination;
pub mod telemetry;

pub use models::{LikedItem, MediaKey, MediaSummary, MediaType, PersonCandidate};
pub use pagination::{window, Page};
pub use telemetry::init_tracing;
