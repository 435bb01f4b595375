//! Slug validation

use once_cell::sync::Lazy;
use regex::Regex;

use strata_core::context::PUBLIC_PARTITION;
use strata_core::{Error, Result};

// DNS-label-safe: the slug becomes both the partition identifier and the
// leading label of the primary hostname.
static SLUG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z0-9]([a-z0-9-]{0,61}[a-z0-9])?$").expect("slug pattern is valid")
});

/// Validate a tenant slug.
///
/// # Errors
/// - `Error::InvalidSlug` if the slug is malformed or reserved
pub fn validate_slug(slug: &str) -> Result<()> {
    if slug == PUBLIC_PARTITION {
        return Err(Error::InvalidSlug(format!(
            "'{}' is reserved for the shared partition",
            slug
        )));
    }

    if !SLUG_RE.is_match(slug) {
        return Err(Error::InvalidSlug(format!(
            "'{}' must be a lowercase DNS label (letters, digits, inner dashes, max 63 chars)",
            slug
        )));
    }

    Ok(())
}
