//! Tag to package-version derivation
//!
//! Release tags come in shapes like `v1.2.3`, `1.2.3` or
//! `components/cli/v1.2.3`. The published package version is the last
//! path segment with at most one leading `v` removed.

/// Derive a package version from a release tag
///
/// Removal of the `v` prefix happens once: `vv1.0` yields `v1.0`.
#[must_use]
pub fn version_from_tag(tag: &str) -> &str {
    let last = tag.rsplit('/').next().unwrap_or(tag);
    last.strip_prefix('v').unwrap_or(last)
}
