//! Hostname normalization

use once_cell::sync::Lazy;
use regex::Regex;

use strata_core::{Error, Result};

// Hostnames are matched after normalization, so the pattern only needs to
// accept lowercase labels. Parked hostnames (`{ts}-{owner}-{host}`) fit the
// same grammar.
static HOSTNAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z0-9]([a-z0-9.-]*[a-z0-9])?$").expect("hostname pattern is valid")
});

/// Normalize a raw request hostname for exact-match lookup.
///
/// Lowercases, strips a `:port` suffix and a trailing dot, and validates
/// the remaining characters. IPv6 literals keep their brackets minus the
/// port.
///
/// # Errors
/// - `Error::InvalidHostname` if nothing usable remains
pub fn normalize_hostname(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidHostname("empty hostname".to_string()));
    }

    // Strip the port: everything after the last ':' outside a bracketed
    // IPv6 literal.
    let without_port = if let Some(end) = trimmed.strip_prefix('[').and_then(|r| r.find(']')) {
        &trimmed[..end + 2]
    } else {
        match trimmed.rsplit_once(':') {
            Some((host, port)) if port.chars().all(|c| c.is_ascii_digit()) => host,
            _ => trimmed,
        }
    };

    let host = without_port.trim_end_matches('.').to_ascii_lowercase();
    if host.is_empty() {
        return Err(Error::InvalidHostname(raw.to_string()));
    }

    // Bracketed IPv6 literals bypass the label grammar
    if host.starts_with('[') {
        return Ok(host);
    }

    if !HOSTNAME_RE.is_match(&host) {
        return Err(Error::InvalidHostname(raw.to_string()));
    }

    Ok(host)
}
