//! Pre-release identifiers for semantic versions
//!
//! A pre-release is the dot-separated identifier list following `-` in a
//! version string. Precedence follows semver.org item 11: numeric
//! identifiers compare numerically and sort before alphanumeric ones,
//! alphanumeric identifiers compare lexically, and a shorter list that is a
//! prefix of a longer one sorts first.

use std::cmp::Ordering;
use std::fmt;

/// Label of a fresh pre-release (`pre.1`)
const DEFAULT_PRERELEASE_LABEL: &str = "pre";

/// A single pre-release identifier
///
/// Numeric identifiers keep their digits as written, so there is no upper
/// bound on their size. Every numeric identifier sorts before every
/// alphanumeric one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identifier {
    Numeric(String),
    AlphaNumeric(String),
}

impl Identifier {
    /// Classify an identifier that has already passed semver grammar checks
    fn parse(s: &str) -> Self {
        if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
            Identifier::Numeric(s.to_string())
        } else {
            Identifier::AlphaNumeric(s.to_string())
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Identifier::Numeric(_))
    }
}

impl Ord for Identifier {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            // No leading zeros, so a longer digit string is the larger number
            (Identifier::Numeric(a), Identifier::Numeric(b)) => {
                a.len().cmp(&b.len()).then_with(|| a.cmp(b))
            }
            (Identifier::Numeric(_), Identifier::AlphaNumeric(_)) => Ordering::Less,
            (Identifier::AlphaNumeric(_), Identifier::Numeric(_)) => Ordering::Greater,
            (Identifier::AlphaNumeric(a), Identifier::AlphaNumeric(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for Identifier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Numeric(s) | Identifier::AlphaNumeric(s) => f.write_str(s),
        }
    }
}

/// Add one to a decimal digit string
fn increment_digits(digits: &str) -> String {
    let mut bytes = digits.as_bytes().to_vec();
    for b in bytes.iter_mut().rev() {
        if *b == b'9' {
            *b = b'0';
        } else {
            *b += 1;
            return String::from_utf8_lossy(&bytes).into_owned();
        }
    }
    format!("1{}", String::from_utf8_lossy(&bytes))
}

/// Ordered list of pre-release identifiers; empty means a stable release.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Prerelease {
    identifiers: Vec<Identifier>,
}

impl Prerelease {
    /// The empty pre-release
    pub const EMPTY: Prerelease = Prerelease {
        identifiers: Vec::new(),
    };

    /// Build a pre-release from the validated `semver` representation.
    pub(crate) fn from_semver(pre: &semver::Prerelease) -> Self {
        if pre.is_empty() {
            return Prerelease::EMPTY;
        }
        let identifiers = pre.as_str().split('.').map(Identifier::parse).collect();
        Prerelease { identifiers }
    }

    pub fn is_empty(&self) -> bool {
        self.identifiers.is_empty()
    }

    pub fn identifiers(&self) -> &[Identifier] {
        &self.identifiers
    }

    /// Advance the pre-release.
    ///
    /// - empty: becomes `pre.1`
    /// - otherwise the rightmost numeric identifier is incremented
    /// - with no numeric identifier, a trailing `1` is appended
    ///
    /// # Examples
    /// ```text
    /// "alpha.1"     -> "alpha.2"
    /// "rc.1.beta"   -> "rc.2.beta"
    /// "alpha"       -> "alpha.1"
    /// ""            -> "pre.1"
    /// ```
    pub fn increment(&mut self) {
        if self.identifiers.is_empty() {
            self.identifiers = vec![
                Identifier::AlphaNumeric(DEFAULT_PRERELEASE_LABEL.to_string()),
                Identifier::Numeric("1".to_string()),
            ];
            return;
        }

        let rightmost_numeric = self
            .identifiers
            .iter_mut()
            .rev()
            .find_map(|id| match id {
                Identifier::Numeric(n) => Some(n),
                Identifier::AlphaNumeric(_) => None,
            });

        match rightmost_numeric {
            Some(n) => *n = increment_digits(n.as_str()),
            None => self.identifiers.push(Identifier::Numeric("1".to_string())),
        }
    }

    /// Precedence comparison. A stable (empty) pre-release is greater than
    /// any non-empty one.
    pub fn cmp_precedence(&self, other: &Prerelease) -> Ordering {
        match (self.is_empty(), other.is_empty()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => self.identifiers.cmp(&other.identifiers),
        }
    }
}

impl fmt::Display for Prerelease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, id) in self.identifiers.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", id)?;
        }
        Ok(())
    }
}
