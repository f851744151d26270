//! Version comparison for outdated detection.
//!
//! This is a positional major.minor.patch comparison, not full semver:
//! pre-release and build metadata are not understood. Components that do not
//! parse as integers count as 0, as do missing components.

use std::cmp::Ordering;

use super::manifest::CUSTOM_VERSION;

/// Placeholder reported when an installed skill has no registry entry.
pub const NOT_IN_REGISTRY: &str = "not in registry";

const COMPARED_COMPONENTS: usize = 3;

/// Returns true when `latest` is strictly newer than `installed`.
#[must_use]
pub fn is_newer(installed: &str, latest: &str) -> bool {
    if installed == CUSTOM_VERSION || latest == NOT_IN_REGISTRY {
        return false;
    }

    let installed = components(installed);
    let latest = components(latest);

    for (i, l) in installed.iter().zip(latest.iter()) {
        match l.cmp(i) {
            Ordering::Greater => return true,
            Ordering::Less => return false,
            Ordering::Equal => {}
        }
    }
    false
}

fn components(version: &str) -> [u64; COMPARED_COMPONENTS] {
    let mut parts = [0; COMPARED_COMPONENTS];
    for (slot, raw) in parts.iter_mut().zip(version.split('.')) {
        *slot = raw.trim().parse().unwrap_or(0);
    }
    parts
}
