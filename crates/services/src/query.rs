//! List-query normalization.
//!
//! Turns untrusted [`ListParams`] into a [`PostFilter`] the storage layer can
//! use as-is. Never fails: malformed values fall back to a default (`page`,
//! `rating`), to `None` (`from`, `to`, `title`), or are dropped (`date`, `status`).

use domains::{ListParams, PostFilter, PostStatus, SortOrder};
use once_cell::sync::Lazy;
use regex::Regex;

static DAY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("static date pattern is valid")
});

/// Minimum title length, in UTF-16 code units as browsers count them.
const MIN_TITLE_UNITS: usize = 3;

/// `YYYY-MM-DD` shape only; the calendar itself is not checked.
fn is_day(raw: &str) -> bool {
    DAY_PATTERN.is_match(raw)
}

/// Any finite number above zero is accepted; fractions are floored and the
/// result never drops below the first page.
fn parse_page(raw: Option<&str>) -> u64 {
    raw.and_then(|p| p.trim().parse::<f64>().ok())
        .filter(|p| p.is_finite() && *p > 0.0)
        .map(|p| (p.floor() as u64).max(1))
        .unwrap_or(1)
}

pub fn normalize_list_params(params: &ListParams) -> PostFilter {
    let day = |value: &Option<String>| value.clone().filter(|v| is_day(v));

    let filter = PostFilter {
        page: parse_page(params.page.as_deref()),
        rating: match params.rating.as_deref() {
            Some(SortOrder::ASC) => SortOrder::Asc,
            _ => SortOrder::Desc,
        },
        from: day(&params.from),
        to: day(&params.to),
        title: params
            .title
            .clone()
            .filter(|t| t.encode_utf16().count() >= MIN_TITLE_UNITS),
        date: params.date.as_deref().and_then(SortOrder::from_marker),
        status: params.status.as_deref().and_then(PostStatus::from_marker),
    };

    tracing::debug!(?filter, "normalized list params");
    filter
}
