use crate::analyzer::drift::find_drift;
use crate::domain::{DriftLevel, UpdateStrategy, Version};
use crate::error::{ReleaseError, Result};
use tracing::error;

/// Inputs needed to compute a new chart version.
///
/// The chart bump can depend on how far the application version moved, so
/// both the previous and new application versions are needed along with the
/// previous chart version that seeds the result.
#[derive(Debug, Clone, Copy, Default)]
pub struct UpdateContext<'a> {
    pub old_app_version: Option<&'a Version>,
    pub new_app_version: Option<&'a Version>,
    pub old_chart_version: Option<&'a Version>,
    pub strategy: UpdateStrategy,
}

/// Fully populated versions handed to a strategy
struct Versions<'a> {
    old_app: &'a Version,
    new_app: &'a Version,
    old_chart: &'a Version,
}

type StrategyFn = fn(&Versions<'_>) -> Result<Version>;

impl<'a> UpdateContext<'a> {
    pub fn new(
        old_app_version: &'a Version,
        new_app_version: &'a Version,
        old_chart_version: &'a Version,
        strategy: UpdateStrategy,
    ) -> Self {
        UpdateContext {
            old_app_version: Some(old_app_version),
            new_app_version: Some(new_app_version),
            old_chart_version: Some(old_chart_version),
            strategy,
        }
    }

    /// Whether every version needed for an update is present
    pub fn is_complete(&self) -> bool {
        self.old_app_version.is_some()
            && self.new_app_version.is_some()
            && self.old_chart_version.is_some()
    }

    /// Apply the configured strategy and return the new chart version.
    pub fn resolve(&self) -> Result<Version> {
        let (Some(old_app), Some(new_app), Some(old_chart)) = (
            self.old_app_version,
            self.new_app_version,
            self.old_chart_version,
        ) else {
            return Err(ReleaseError::IncompleteUpdateContext);
        };

        let versions = Versions {
            old_app,
            new_app,
            old_chart,
        };
        strategy_fn(self.strategy)(&versions).inspect_err(|e| {
            error!(strategy = %self.strategy, error = %e, "failed to find application version drift");
        })
    }
}

/// Dispatch table from strategy to its implementation
fn strategy_fn(strategy: UpdateStrategy) -> StrategyFn {
    match strategy {
        UpdateStrategy::Major => update_major,
        UpdateStrategy::Minor => update_minor,
        UpdateStrategy::Patch => update_patch,
        UpdateStrategy::Default => update_default,
    }
}

/// Bump the chart at a fixed level for any forward app drift
fn bump_fixed(versions: &Versions<'_>, level: DriftLevel) -> Result<Version> {
    find_drift(versions.new_app, versions.old_app)?;
    versions.old_chart.incremented(level)
}

fn update_major(versions: &Versions<'_>) -> Result<Version> {
    bump_fixed(versions, DriftLevel::Major)
}

fn update_minor(versions: &Versions<'_>) -> Result<Version> {
    bump_fixed(versions, DriftLevel::Minor)
}

fn update_patch(versions: &Versions<'_>) -> Result<Version> {
    bump_fixed(versions, DriftLevel::Patch)
}

/// Patch bump for stable app releases, pre-release tracking otherwise.
///
/// | app drift        | chart has pre-release | result                         |
/// |------------------|-----------------------|--------------------------------|
/// | stable           | yes                   | strip pre-release              |
/// | stable           | no                    | patch bump                     |
/// | pre-release      | no                    | patch bump, then `pre.1`       |
/// | pre-release      | yes                   | bump existing chart pre-release |
fn update_default(versions: &Versions<'_>) -> Result<Version> {
    let drift = find_drift(versions.new_app, versions.old_app)?;
    let chart = versions.old_chart;

    match (drift.has_prerelease, chart.is_prerelease()) {
        (false, true) => Ok(chart.without_prerelease()),
        (false, false) => chart.incremented(DriftLevel::Patch),
        (true, false) => {
            let mut next = chart.incremented(DriftLevel::Patch)?;
            next.increment(DriftLevel::Prerelease)?;
            Ok(next)
        }
        (true, true) => chart.incremented(DriftLevel::Prerelease),
    }
}
