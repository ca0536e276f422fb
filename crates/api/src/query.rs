//! Shared query parameter types for API handlers.
//!
//! Handlers combine these with their own filter structs by taking more than
//! one `Query` extractor over the same query string.

use serde::Deserialize;
use verde_core::paging::{clamp_limit, clamp_offset, DEFAULT_LIMIT, MAX_LIMIT};

/// Generic pagination parameters (`?limit=&offset=`).
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PaginationParams {
    /// Limit clamped to `1..=MAX_LIMIT`, defaulting to `DEFAULT_LIMIT`.
    pub fn limit(&self) -> i64 {
        clamp_limit(self.limit, DEFAULT_LIMIT, MAX_LIMIT)
    }

    /// Offset clamped to be non-negative.
    pub fn offset(&self) -> i64 {
        clamp_offset(self.offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_and_clamps() {
        let empty = PaginationParams::default();
        assert_eq!((empty.limit(), empty.offset()), (DEFAULT_LIMIT, 0));

        let wild = PaginationParams {
            limit: Some(10_000),
            offset: Some(-4),
        };
        assert_eq!((wild.limit(), wild.offset()), (MAX_LIMIT, 0));
    }
}
