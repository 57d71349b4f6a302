//! URL slug derivation.
//!
//! Uniqueness is enforced by the database: repositories insert candidate
//! slugs in order with `ON CONFLICT (slug) DO NOTHING` until one sticks.

use std::sync::LazyLock;

use regex::Regex;

/// Upper bound on candidates tried before giving up.
pub const MAX_SLUG_ATTEMPTS: u32 = 1000;

static DISALLOWED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9\s-]").expect("valid regex"));
static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));
static HYPHENS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-+").expect("valid regex"));

/// Lowercase, strip everything but ASCII alphanumerics, whitespace and
/// hyphens, turn whitespace runs into hyphens, and collapse hyphen runs.
pub fn slugify(value: &str) -> String {
    let lower = value.to_lowercase();
    let trimmed = lower.trim();
    let stripped = DISALLOWED_RE.replace_all(trimmed, "");
    let hyphenated = WHITESPACE_RE.replace_all(&stripped, "-");
    HYPHENS_RE.replace_all(&hyphenated, "-").into_owned()
}

/// Slug base for `value`, falling back to `fallback` when nothing survives.
pub fn base_slug(value: &str, fallback: &str) -> String {
    let slug = slugify(value);
    if slug.is_empty() {
        fallback.to_string()
    } else {
        slug
    }
}

/// The `attempt`th candidate: `base` first, then `base-2`, `base-3`, ...
pub fn candidate(base: &str, attempt: u32) -> String {
    if attempt <= 1 {
        base.to_string()
    } else {
        format!("{base}-{attempt}")
    }
}
