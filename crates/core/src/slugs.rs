//! Slugs
//!
//! URL-safe identifiers derived from human-readable text.

use rustc_hash::FxHashSet;
use thiserror::Error;

/// Errors raised while assigning a slug.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SlugError {
    /// The source text contains nothing a slug can be built from.
    #[error("source text produces an empty slug")]
    Empty,

    /// Every candidate slug is taken.
    #[error("no free slug left for {0:?}")]
    Exhausted(String),
}

/// Derive a unicode-aware slug from `source`.
///
/// Letters and digits of any script are kept and lowercased, underscores are kept, runs of
/// whitespace and hyphens become a single hyphen and anything else is dropped. Leading and
/// trailing hyphens and underscores are trimmed.
pub fn slugify(source: &str) -> String {
    let mut slug = String::with_capacity(source.len());
    let mut pending_separator = false;

    for ch in source.trim().chars() {
        if ch.is_whitespace() || ch == '-' {
            pending_separator = true;
        } else if ch.is_alphanumeric() || ch == '_' {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }

            pending_separator = false;
            slug.extend(ch.to_lowercase());
        }
    }

    slug.trim_matches(|ch| ch == '-' || ch == '_').to_owned()
}

/// Whether `slug` is already in the form [`slugify`] produces.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty() && slugify(slug) == slug
}

/// Pick the first unused slug for `base` given the slugs already `taken` in its scope.
///
/// Returns `base` when it is free, otherwise `base-1`, `base-2`, ... The callers pass the
/// slugs in scope that start with `base`, excluding the entity being saved, so a re-save
/// keeps its own slug.
///
/// With `n` taken slugs at most `n` candidates can collide, so no more than `n + 1`
/// candidates are examined.
///
/// # Errors
///
/// Returns [`SlugError::Empty`] when `base` is empty.
pub fn unique_slug<'a, I>(base: &str, taken: I) -> Result<String, SlugError>
where
    I: IntoIterator<Item = &'a str>,
{
    if base.is_empty() {
        return Err(SlugError::Empty);
    }

    let taken: FxHashSet<&str> = taken
        .into_iter()
        .filter(|slug| slug.starts_with(base))
        .collect();

    if !taken.contains(base) {
        return Ok(base.to_owned());
    }

    (1..=taken.len())
        .map(|counter| format!("{base}-{counter}"))
        .find(|candidate| !taken.contains(candidate.as_str()))
        .ok_or_else(|| SlugError::Exhausted(base.to_owned()))
}

/// Slugify `source` and make the result unique against `taken`.
///
/// # Errors
///
/// Returns [`SlugError::Empty`] when `source` yields an empty slug.
pub fn assign_slug<'a, I>(source: &str, taken: I) -> Result<String, SlugError>
where
    I: IntoIterator<Item = &'a str>,
{
    unique_slug(&slugify(source), taken)
}
