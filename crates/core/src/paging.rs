//! Pagination parameter clamping shared by list endpoints.

/// Default page size for list endpoints.
pub const DEFAULT_LIMIT: i64 = 50;
/// Largest page size a caller may request.
pub const MAX_LIMIT: i64 = 200;

/// Clamp a user-provided limit to `1..=max`, using `default` when absent.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_defaults_and_clamps() {
        assert_eq!(clamp_limit(None, 5, 20), 5);
        assert_eq!(clamp_limit(Some(0), 5, 20), 1);
        assert_eq!(clamp_limit(Some(500), 5, 20), 20);
        assert_eq!(clamp_limit(Some(7), 5, 20), 7);
    }

    #[test]
    fn negative_offset_becomes_zero() {
        assert_eq!(clamp_offset(Some(-3)), 0);
        assert_eq!(clamp_offset(None), 0);
        assert_eq!(clamp_offset(Some(40)), 40);
    }
}
