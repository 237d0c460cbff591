use crate::domain::{DriftLevel, Version};
use crate::error::{ReleaseError, Result};
use std::cmp::Ordering;

/// Outcome of comparing a version against its base
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Drift {
    /// Most significant component that differs
    pub level: DriftLevel,
    /// Whether the current version carries a pre-release
    pub has_prerelease: bool,
}

/// Find the first component at which `current` drifts from `base`, walking
/// down from major to pre-release.
///
/// Only forward drift is meaningful: a `current` lower than `base` fails with
/// `VersionLessThanBase`, and equal precedence fails with `NoDrift`. Build
/// metadata never counts, so `1.0.0+1` against `1.0.0+2` is no drift.
///
/// Ordering uses semver precedence, but the pre-release level is decided by
/// plain string inequality of the two pre-release strings.
pub fn find_drift(current: &Version, base: &Version) -> Result<Drift> {
    match current.cmp_precedence(base) {
        Ordering::Less => Err(ReleaseError::VersionLessThanBase),
        Ordering::Equal => Err(ReleaseError::NoDrift),
        Ordering::Greater => {
            let level = if current.major != base.major {
                DriftLevel::Major
            } else if current.minor != base.minor {
                DriftLevel::Minor
            } else if current.patch != base.patch {
                DriftLevel::Patch
            } else if current.pre.to_string() != base.pre.to_string() {
                DriftLevel::Prerelease
            } else {
                DriftLevel::None
            };

            Ok(Drift {
                level,
                has_prerelease: !current.pre.is_empty(),
            })
        }
    }
}
