//! Caller-facing page windows decoupled from upstream paging
//!
//! The upstream catalog pages results on its own schedule; callers of this
//! library see fixed-size local windows with plain prev/next indicators.
//! [`window`] cuts a window out of a fully collected listing (actor credits,
//! genre browse). The search aggregator computes its windows directly because
//! its accumulator is only partially materialized.

use serde::{Deserialize, Serialize};

/// One local page window over a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items in this window, in listing order
    pub items: Vec<T>,

    /// Whether an earlier window exists
    pub has_prev: bool,

    /// Whether a later window exists
    pub has_next: bool,
}

impl<T> Page<T> {
    /// A window with no items and no neighbors.
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            has_prev: false,
            has_next: false,
        }
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Cut a fixed-size window out of a fully collected listing.
///
/// Page numbers are 1-based; page 0 is treated as page 1. A window starting
/// past the end of the listing is empty with `has_next = false`.
pub fn window<T>(all: Vec<T>, page: usize, page_size: usize) -> Page<T> {
    let page = page.max(1);
    let page_size = page_size.max(1);
    let total = all.len();
    let start = (page - 1) * page_size;
    let end = start + page_size;

    let items: Vec<T> = if start >= total {
        Vec::new()
    } else {
        all.into_iter().skip(start).take(page_size).collect()
    };

    Page {
        items,
        has_prev: page > 1 && start < total,
        has_next: total > end,
    }
}
