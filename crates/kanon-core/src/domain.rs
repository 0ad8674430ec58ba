//! Registry domain detection
//!
//! A reference such as `nginx` or `bitnami/redis` carries no registry, so the
//! runtime resolves it against Docker Hub. `ensure_domain` makes that explicit
//! before the reference is parsed.

use std::borrow::Cow;

/// Registry prefixed to references that do not name one
pub const DEFAULT_DOMAIN: &str = "docker.io";

/// Prefix [`DEFAULT_DOMAIN`] unless the reference already starts with a registry domain
///
/// The leading segment (everything before the first `/`) is kept as a domain
/// when it contains `.` or `:`, is exactly `localhost`, or contains an
/// uppercase letter. Path-only references always get the default domain.
///
/// The uppercase rule differs from the usual runtime normalization, which
/// rejects uppercase hosts instead; it is kept as-is for compatibility with
/// existing canonicalized manifests.
///
/// ```
/// use kanon_core::ensure_domain;
///
/// assert_eq!(ensure_domain("nginx"), "docker.io/nginx");
/// assert_eq!(ensure_domain("bitnami/redis"), "docker.io/bitnami/redis");
/// assert_eq!(ensure_domain("ghcr.io/org/app"), "ghcr.io/org/app");
/// ```
pub fn ensure_domain(reference: &str) -> Cow<'_, str> {
    match reference.find('/') {
        Some(i) if looks_like_domain(&reference[..i]) => Cow::Borrowed(reference),
        _ => Cow::Owned(format!("{}/{}", DEFAULT_DOMAIN, reference)),
    }
}

fn looks_like_domain(segment: &str) -> bool {
    segment.contains(['.', ':']) || segment == "localhost" || segment.to_lowercase() != segment
}
