//! Catalog Lister.
//!
//! Lists the animations under the root for the index page. The catalog
//! is small and rarely requested, so it is recomputed on every call.

use std::path::Path;

use tracing::debug;

use crate::name::AnimationName;
use crate::natural::sort_natural;

/// Names of the subdirectories of `root`, in natural order.
///
/// Returns an empty list when `root` is missing, unreadable or empty.
/// Subdirectories whose names are not valid [`AnimationName`]s are
/// skipped, since they could never be requested.
pub fn list_animations(root: &Path) -> Vec<AnimationName> {
    let Ok(entries) = std::fs::read_dir(root) else {
        debug!(root = %root.display(), "animation root not readable, catalog empty");
        return Vec::new();
    };

    let mut names: Vec<AnimationName> = entries
        .filter_map(Result::ok)
        .filter(|entry| entry.path().is_dir())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter_map(|raw| AnimationName::parse(&raw).ok())
        .collect();

    sort_natural(&mut names, AnimationName::as_str);
    names
}
