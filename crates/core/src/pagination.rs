//! Page/limit pagination helpers.

/// Items per page when `limit` is omitted.
pub const DEFAULT_PAGE_LIMIT: i64 = 10;

/// Upper bound on `limit`.
pub const MAX_PAGE_LIMIT: i64 = 100;

/// Past listings per page on the single-item view.
pub const DEFAULT_PAST_LISTINGS_LIMIT: i64 = 5;

/// Clamp a user-provided limit to `max`. Absent and non-positive limits
/// use `default`.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.filter(|l| *l > 0).unwrap_or(default).min(max)
}

/// A validated 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl PageRequest {
    /// Build from raw query values. `page` floors at 1; `limit` is clamped.
    pub fn new(page: Option<i64>, limit: Option<i64>, default_limit: i64) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: clamp_limit(limit, default_limit, MAX_PAGE_LIMIT),
        }
    }

    /// Rows to skip.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// `ceil(total / limit)`.
    pub fn total_pages(&self, total: i64) -> i64 {
        if total <= 0 {
            0
        } else {
            (total + self.limit - 1) / self.limit
        }
    }
}
