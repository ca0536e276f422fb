//! Project slug derivation and collision resolution.
//!
//! A slug is derived from the project name, falling back to the current slug
//! and then to an id-derived value. Collisions are resolved by probing
//! `base-2`, `base-3`, ... until an unused candidate is found.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::types::DbId;

/// Runs of characters that are not lowercase ASCII alphanumerics.
static SEPARATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("valid regex"));

/// First suffix tried when the base slug is taken.
const FIRST_SUFFIX: u32 = 2;

/// Convert arbitrary text into a URL-safe slug.
///
/// ```
/// use verde_core::slug::slugify;
///
/// assert_eq!(slugify("Harbor View  Tower #2"), "harbor-view-tower-2");
/// assert_eq!(slugify("---"), "");
/// ```
pub fn slugify(text: &str) -> String {
    let lowered = text.trim().to_lowercase();
    SEPARATOR_RE
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}

/// Slug used when neither the name nor an existing slug yields one.
pub fn fallback_slug(id: DbId) -> String {
    let simple = id.simple().to_string();
    format!("project-{}", &simple[..8])
}

/// Compute the base slug for a project before collision resolution.
pub fn base_slug(name: &str, current_slug: Option<&str>, id: DbId) -> String {
    let from_name = slugify(name);
    if !from_name.is_empty() {
        return from_name;
    }
    match current_slug.map(str::trim).filter(|s| !s.is_empty()) {
        Some(existing) => existing.to_string(),
        None => fallback_slug(id),
    }
}

/// Return `base` if unused, otherwise the first free `base-N` with `N >= 2`.
///
/// `taken` holds slugs already used by *other* projects; the caller excludes
/// the project's own row.
pub fn next_available_slug<I, S>(base: &str, taken: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let taken: HashSet<String> = taken
        .into_iter()
        .map(|s| s.as_ref().to_string())
        .collect();

    if !taken.contains(base) {
        return base.to_string();
    }

    let mut suffix = FIRST_SUFFIX;
    loop {
        let candidate = format!("{base}-{suffix}");
        if !taken.contains(&candidate) {
            return candidate;
        }
        suffix += 1;
    }
}

/// Validate a caller-supplied slug (used by the slug lookup endpoint).
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty() && slugify(slug) == slug
}
