use app_state::PaginationConstants;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// `?limit=&offset=` query parameters of list endpoints.
#[derive(Debug, Default, Clone, Deserialize, IntoParams, ToSchema)]
pub struct PageParams {
    /// Page size, capped at the configured maximum.
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// A resolved page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

impl PageParams {
    /// Applies defaults and bounds. Non-positive limits fall back to the default.
    /// The offset is capped so that `offset + limit` stays representable.
    #[must_use]
    pub fn resolve(&self, bounds: &PaginationConstants) -> Page {
        let limit = match self.limit {
            Some(limit) if limit > 0 => limit.min(bounds.max_limit),
            _ => bounds.default_limit,
        };
        Page {
            limit,
            offset: self.offset.unwrap_or(0).clamp(0, i64::MAX.saturating_sub(limit)),
        }
    }
}

/// One page of results plus the offsets of its neighbours.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Paginated<T> {
    pub count: i64,
    pub next: Option<i64>,
    pub previous: Option<i64>,
    pub results: Vec<T>,
}

impl<T> Paginated<T> {
    #[must_use]
    pub fn new(results: Vec<T>, count: i64, page: Page) -> Self {
        let next = page
            .offset
            .checked_add(page.limit)
            .filter(|&next| next < count);
        let previous = (page.offset > 0).then(|| page.offset.saturating_sub(page.limit).max(0));
        Self {
            count,
            next,
            previous,
            results,
        }
    }
}
