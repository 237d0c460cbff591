//! Named release policies.
//!
//! Strategy names are matched case-insensitively. Unknown names fail with
//! an "unsupported strategy" error naming the input.

use crate::error::{ReleaseError, Result};
use std::fmt;
use std::str::FromStr;

/// How the chart version is bumped for a new application version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UpdateStrategy {
    Major,
    Minor,
    Patch,
    #[default]
    Default,
}

impl UpdateStrategy {
    /// All supported update strategies
    pub const ALL: [UpdateStrategy; 4] = [
        UpdateStrategy::Major,
        UpdateStrategy::Minor,
        UpdateStrategy::Patch,
        UpdateStrategy::Default,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            UpdateStrategy::Major => "major",
            UpdateStrategy::Minor => "minor",
            UpdateStrategy::Patch => "patch",
            UpdateStrategy::Default => "default",
        }
    }
}

impl FromStr for UpdateStrategy {
    type Err = ReleaseError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "major" => Ok(UpdateStrategy::Major),
            "minor" => Ok(UpdateStrategy::Minor),
            "patch" => Ok(UpdateStrategy::Patch),
            "default" => Ok(UpdateStrategy::Default),
            _ => Err(ReleaseError::unsupported_strategy("update", s)),
        }
    }
}

impl fmt::Display for UpdateStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How changes are published to the chart repository
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PublishStrategy {
    Commit,
    #[default]
    PullRequest,
}

impl PublishStrategy {
    /// All supported publish strategies
    pub const ALL: [PublishStrategy; 2] = [PublishStrategy::Commit, PublishStrategy::PullRequest];

    pub fn name(&self) -> &'static str {
        match self {
            PublishStrategy::Commit => "commit",
            PublishStrategy::PullRequest => "pull request",
        }
    }
}

impl FromStr for PublishStrategy {
    type Err = ReleaseError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "commit" => Ok(PublishStrategy::Commit),
            "pull request" => Ok(PublishStrategy::PullRequest),
            _ => Err(ReleaseError::unsupported_strategy("publish", s)),
        }
    }
}

impl fmt::Display for PublishStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
