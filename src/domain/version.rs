use crate::domain::prerelease::Prerelease;
use crate::error::{ReleaseError, Result};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Significance of a version component, least to most significant.
///
/// Used both to classify drift between two versions and as the target of
/// [`Version::increment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DriftLevel {
    None,
    Prerelease,
    Patch,
    Minor,
    Major,
}

impl fmt::Display for DriftLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DriftLevel::None => "none",
            DriftLevel::Prerelease => "prerelease",
            DriftLevel::Patch => "patch",
            DriftLevel::Minor => "minor",
            DriftLevel::Major => "major",
        };
        f.write_str(name)
    }
}

/// Semantic version representation
///
/// Equality covers every component, including build metadata and the `v`
/// prefix, so two versions are equal exactly when their canonical strings
/// are. Ordering ignores build metadata and is only available through
/// [`Version::cmp_precedence`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub pre: Prerelease,
    pub build: semver::BuildMetadata,
    pub has_prefix: bool,
}

impl Version {
    /// Create a new stable version without prefix
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Version {
            major,
            minor,
            patch,
            pre: Prerelease::EMPTY,
            build: semver::BuildMetadata::EMPTY,
            has_prefix: false,
        }
    }

    /// Parse version from a string (e.g., "v1.2.3-rc.1+build.5").
    ///
    /// Accepts an optional lowercase `v` prefix followed by a strict
    /// semantic version. Alternate encodings such as leading zeros in
    /// numeric components are rejected rather than normalized.
    pub fn parse(input: &str) -> Result<Self> {
        let (has_prefix, rest) = match input.strip_prefix('v') {
            Some(rest) => (true, rest),
            None => (false, input),
        };

        let parsed =
            semver::Version::parse(rest).map_err(|e| ReleaseError::parse(input, e.to_string()))?;
        let pre = Prerelease::from_semver(&parsed.pre);

        Ok(Version {
            major: parsed.major,
            minor: parsed.minor,
            patch: parsed.patch,
            pre,
            build: parsed.build,
            has_prefix,
        })
    }

    /// Compare by precedence: major, minor, patch, then pre-release.
    /// Build metadata never participates.
    pub fn cmp_precedence(&self, other: &Version) -> Ordering {
        self.major
            .cmp(&other.major)
            .then(self.minor.cmp(&other.minor))
            .then(self.patch.cmp(&other.patch))
            .then_with(|| self.pre.cmp_precedence(&other.pre))
    }

    /// Increment the version in place at the given level.
    ///
    /// Every level is handled explicitly; `DriftLevel::None` leaves the
    /// version untouched. A numeric component already at `u64::MAX` fails
    /// with [`ReleaseError::VersionOverflow`] and leaves the version as it was.
    pub fn increment(&mut self, level: DriftLevel) -> Result<()> {
        match level {
            DriftLevel::Major => {
                self.major = self.bumped(self.major, level)?;
                self.minor = 0;
                self.patch = 0;
                self.clear_suffixes();
            }
            DriftLevel::Minor => {
                self.minor = self.bumped(self.minor, level)?;
                self.patch = 0;
                self.clear_suffixes();
            }
            DriftLevel::Patch => {
                self.patch = self.bumped(self.patch, level)?;
                self.clear_suffixes();
            }
            DriftLevel::Prerelease => self.pre.increment(),
            DriftLevel::None => {}
        }
        Ok(())
    }

    /// Copy of this version incremented at the given level
    pub fn incremented(&self, level: DriftLevel) -> Result<Self> {
        let mut next = self.clone();
        next.increment(level)?;
        Ok(next)
    }

    fn bumped(&self, component: u64, level: DriftLevel) -> Result<u64> {
        component
            .checked_add(1)
            .ok_or_else(|| ReleaseError::VersionOverflow {
                version: self.to_string(),
                level: level.to_string(),
            })
    }

    /// Copy of this version promoted to stable (pre-release removed)
    pub fn without_prerelease(&self) -> Self {
        Version {
            pre: Prerelease::EMPTY,
            ..self.clone()
        }
    }

    pub fn is_prerelease(&self) -> bool {
        !self.pre.is_empty()
    }

    fn clear_suffixes(&mut self) {
        self.pre = Prerelease::EMPTY;
        self.build = semver::BuildMetadata::EMPTY;
    }
}

impl FromStr for Version {
    type Err = ReleaseError;

    fn from_str(s: &str) -> Result<Self> {
        Version::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_prefix {
            f.write_str("v")?;
        }
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if !self.pre.is_empty() {
            write!(f, "-{}", self.pre)?;
        }
        if !self.build.is_empty() {
            write!(f, "+{}", self.build)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    #[test]
    fn test_version_parse() {
        let v = v("1.2.3");
        assert_eq!(v.major, 1);
        assert_eq!(v.minor, 2);
        assert_eq!(v.patch, 3);
        assert!(v.pre.is_empty());
        assert!(v.build.is_empty());
        assert!(!v.has_prefix);
    }

    #[test]
    fn test_version_parse_with_prefix() {
        let parsed = v("v1.2.3");
        assert!(parsed.has_prefix);
        assert_eq!(parsed.major, 1);
    }

    #[test]
    fn test_version_parse_full() {
        let parsed = v("v0.1.2-rc.9+build.001");
        assert_eq!(parsed.pre.to_string(), "rc.9");
        assert_eq!(parsed.build.as_str(), "build.001");
    }

    #[test]
    fn test_version_round_trip() {
        for s in [
            "0.0.0",
            "1.2.3",
            "v1.2.3",
            "1.2.3-alpha",
            "v1.2.3-rc.9",
            "1.2.3+build.5",
            "v10.20.30-beta.9+exp.sha.5114f85",
            "1.0.0-0.3.7",
            "1.0.0-x.7.z.92",
            "1.0.0+0001",
        ] {
            assert_eq!(v(s).to_string(), s);
        }
    }

    #[test]
    fn test_version_parse_invalid() {
        for s in [
            "",
            "v",
            "1.2",
            "1.2.3.4",
            "01.2.3",
            "1.02.3",
            "1.2.03",
            "1.2.3-",
            "1.2.3-alpha..1",
            "1.2.3-000",
            "1.2.3-01",
            "1.2.3+",
            "V1.2.3",
            "a.b.c",
            " 1.2.3",
        ] {
            assert!(Version::parse(s).is_err(), "expected '{}' to fail", s);
        }
    }

    #[test]
    fn test_version_parse_error_names_input() {
        let err = Version::parse("1.2.3-000").unwrap_err();
        assert!(err.to_string().contains("'1.2.3-000'"));
    }

    #[test]
    fn test_equality_includes_build_and_prefix() {
        assert_eq!(v("1.0.0+1"), v("1.0.0+1"));
        assert_ne!(v("1.0.0+1"), v("1.0.0+2"));
        assert_ne!(v("v1.0.0"), v("1.0.0"));
    }

    #[test]
    fn test_compare_numeric_components() {
        assert_eq!(v("1.0.0").cmp_precedence(&v("2.0.0")), Ordering::Less);
        assert_eq!(v("1.10.0").cmp_precedence(&v("1.9.0")), Ordering::Greater);
        assert_eq!(v("1.0.10").cmp_precedence(&v("1.0.9")), Ordering::Greater);
        assert_eq!(v("v1.0.0").cmp_precedence(&v("1.0.0")), Ordering::Equal);
    }

    #[test]
    fn test_compare_prerelease_lower_than_release() {
        assert_eq!(v("1.0.0-rc.1").cmp_precedence(&v("1.0.0")), Ordering::Less);
        assert_eq!(v("1.0.0").cmp_precedence(&v("1.0.0-rc.1")), Ordering::Greater);
    }

    #[test]
    fn test_compare_ignores_build() {
        assert_eq!(v("1.0.0+1").cmp_precedence(&v("1.0.0+2")), Ordering::Equal);
        assert_eq!(
            v("1.0.0-rc.1+a").cmp_precedence(&v("1.0.0-rc.1")),
            Ordering::Equal
        );
    }

    #[test]
    fn test_compare_is_antisymmetric() {
        let versions = [
            "1.0.0-alpha",
            "1.0.0-alpha.1",
            "1.0.0-alpha.beta",
            "1.0.0-beta",
            "1.0.0-beta.2",
            "1.0.0-beta.11",
            "1.0.0-rc.1",
            "1.0.0",
            "1.0.0+build",
            "1.0.1",
            "1.1.0",
            "2.0.0",
        ];
        for a in versions {
            for b in versions {
                assert_eq!(
                    v(a).cmp_precedence(&v(b)),
                    v(b).cmp_precedence(&v(a)).reverse(),
                    "{} vs {}",
                    a,
                    b
                );
            }
        }
    }

    #[test]
    fn test_compare_is_transitive_for_equal_versions() {
        let versions = [
            "1.0.0",
            "v1.0.0",
            "1.0.0+a",
            "v1.0.0+b",
            "1.0.0+a.b.c",
            "1.0.0-rc.1",
            "1.0.0-rc.1+x",
            "v1.0.0-rc.1+y",
            "1.0.1+a",
        ];
        for a in versions {
            for b in versions {
                for c in versions {
                    let (va, vb, vc) = (v(a), v(b), v(c));
                    if va.cmp_precedence(&vb) == Ordering::Equal
                        && vb.cmp_precedence(&vc) == Ordering::Equal
                    {
                        assert_eq!(
                            va.cmp_precedence(&vc),
                            Ordering::Equal,
                            "{} = {} = {}",
                            a,
                            b,
                            c
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_parse_large_prerelease_number() {
        let s = "1.0.0-18446744073709551616";
        assert_eq!(v(s).to_string(), s);
        assert_eq!(
            v("1.0.0-18446744073709551615").cmp_precedence(&v(s)),
            Ordering::Less
        );
    }

    #[test]
    fn test_increment_overflow_is_an_error() {
        let max = u64::MAX;
        for (s, level) in [
            (format!("{}.0.0", max), DriftLevel::Major),
            (format!("1.{}.0", max), DriftLevel::Minor),
            (format!("1.0.{}", max), DriftLevel::Patch),
        ] {
            let mut version = v(&s);
            let err = version.increment(level).unwrap_err();
            assert!(
                matches!(err, ReleaseError::VersionOverflow { .. }),
                "{}: {:?}",
                s,
                err
            );
            assert_eq!(version.to_string(), s, "failed increment must not modify");
        }

        let bumped = v(&format!("1.0.0-rc.{}", max))
            .incremented(DriftLevel::Prerelease)
            .unwrap();
        assert_eq!(bumped.to_string(), "1.0.0-rc.18446744073709551616");
    }

    #[test]
    fn test_increment_major() {
        let bumped = v("1.2.3-rc.1+build").incremented(DriftLevel::Major).unwrap();
        assert_eq!(bumped.to_string(), "2.0.0");
    }

    #[test]
    fn test_increment_minor() {
        let bumped = v("1.2.3-rc.1+build").incremented(DriftLevel::Minor).unwrap();
        assert_eq!(bumped.to_string(), "1.3.0");
    }

    #[test]
    fn test_increment_patch() {
        let bumped = v("1.2.3-rc.1+build").incremented(DriftLevel::Patch).unwrap();
        assert_eq!(bumped.to_string(), "1.2.4");
    }

    #[test]
    fn test_increment_prerelease() {
        assert_eq!(
            v("0.1.2").incremented(DriftLevel::Prerelease).unwrap().to_string(),
            "0.1.2-pre.1"
        );
        assert_eq!(
            v("0.1.2-alpha.1").incremented(DriftLevel::Prerelease).unwrap().to_string(),
            "0.1.2-alpha.2"
        );
        assert_eq!(
            v("0.1.2-alpha").incremented(DriftLevel::Prerelease).unwrap().to_string(),
            "0.1.2-alpha.1"
        );
    }

    #[test]
    fn test_increment_prerelease_keeps_build() {
        assert_eq!(
            v("0.1.2-alpha.1+b7").incremented(DriftLevel::Prerelease).unwrap().to_string(),
            "0.1.2-alpha.2+b7"
        );
    }

    #[test]
    fn test_increment_none() {
        let original = v("v1.2.3-rc.1+b");
        assert_eq!(original.incremented(DriftLevel::None).unwrap(), original);
    }

    #[test]
    fn test_increment_keeps_prefix() {
        assert_eq!(v("v1.2.3").incremented(DriftLevel::Minor).unwrap().to_string(), "v1.3.0");
    }

    #[test]
    fn test_increment_in_place() {
        let mut version = v("1.2.3");
        version.increment(DriftLevel::Patch).unwrap();
        version.increment(DriftLevel::Prerelease).unwrap();
        assert_eq!(version.to_string(), "1.2.4-pre.1");
    }

    #[test]
    fn test_without_prerelease() {
        assert_eq!(v("0.0.1-alpha.4").without_prerelease().to_string(), "0.0.1");
        assert_eq!(v("1.0.0+b").without_prerelease().to_string(), "1.0.0+b");
    }

    #[test]
    fn test_from_str() {
        let parsed: Version = "v2.0.0".parse().unwrap();
        assert_eq!(parsed, v("v2.0.0"));
    }

    #[test]
    fn test_drift_level_ordering() {
        assert!(DriftLevel::None < DriftLevel::Prerelease);
        assert!(DriftLevel::Prerelease < DriftLevel::Patch);
        assert!(DriftLevel::Patch < DriftLevel::Minor);
        assert!(DriftLevel::Minor < DriftLevel::Major);
    }

    #[test]
    fn test_version_display() {
        assert_eq!(Version::new(1, 2, 3).to_string(), "1.2.3");
    }
}
