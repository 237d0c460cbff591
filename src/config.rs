use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::collector::ErrorCollector;
use crate::context::Repository;
use crate::domain::UpdateStrategy;
use crate::error::{ReleaseError, Result};

/// Only supported configuration scheme
pub const CONFIG_VERSION: &str = "v1";

/// File name looked up in a project directory
pub const CONFIG_FILE_NAME: &str = ".chartreleaser.toml";

/// Comment block written above formatted configs
pub const CONFIG_HEADER: &str = "\
# chart-releaser configuration
#
# Updates the chart's version and appVersion whenever a new application
# release is tagged. Run `chart-releaser check` after editing.
";

fn is_default<T: Default + PartialEq>(value: &T) -> bool {
    *value == T::default()
}

/// Represents the complete configuration for chart-releaser.
///
/// Describes where the chart lives, how the bump is published, who commits
/// it, which tags trigger a release and which other files are rewritten.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub version: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart: Option<ChartConfig>,

    #[serde(default, skip_serializing_if = "is_default")]
    pub publish: PublishConfig,

    #[serde(default, skip_serializing_if = "is_default")]
    pub commit: CommitConfig,

    #[serde(default, skip_serializing_if = "is_default")]
    pub release: ReleaseConfig,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extras: Vec<ExtrasConfig>,
}

/// Where chart-releaser can find the chart
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct ChartConfig {
    #[serde(default)]
    pub name: String,

    /// `[host/]owner/name`, e.g. `github.com/acme/charts`
    #[serde(default)]
    pub repo: String,

    /// Chart directory (or the Chart.yaml itself) within the repository
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub path: String,
}

/// How changes are published. At most one of the blocks may be set; with
/// neither, a pull request is opened using default templates.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct PublishConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit: Option<PublishCommitConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pr: Option<PublishPrConfig>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct PublishCommitConfig {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub branch: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub base: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct PublishPrConfig {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub branch_template: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub base: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title_template: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub body_template: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct CommitConfig {
    #[serde(default, skip_serializing_if = "is_default")]
    pub author: AuthorConfig,

    #[serde(default, skip_serializing_if = "is_default")]
    pub templates: CommitTemplateConfig,
}

/// Commit author. When unset, the local git config is used.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct AuthorConfig {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub email: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct CommitTemplateConfig {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub update: String,
}

/// Which tags trigger an update and how the chart version is bumped
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct ReleaseConfig {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub strategy: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub matches: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignores: Vec<String>,
}

/// An additional file rewritten with regex search/replace
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct ExtrasConfig {
    #[serde(default)]
    pub path: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub updates: Vec<SearchReplace>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct SearchReplace {
    #[serde(default)]
    pub search: String,

    /// Replacement text, rendered as a template (`{{ app.new_version }}`)
    /// and then inserted literally
    #[serde(default)]
    pub replace: String,

    /// Number of matches to replace, counted from the start of the file.
    /// `limit = 2` rewrites exactly the first two matches; 0 or a negative
    /// value rewrites all of them.
    #[serde(default, skip_serializing_if = "is_default")]
    pub limit: i64,
}

impl Config {
    /// Parse a config from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Serialize to canonical TOML, optionally preceded by [CONFIG_HEADER]
    pub fn to_toml_string(&self, header: bool) -> Result<String> {
        let body = toml::to_string(self)?;
        Ok(if header {
            format!("{}\n{}", CONFIG_HEADER, body)
        } else {
            body
        })
    }

    /// Check the config for every problem at once.
    ///
    /// Returns `ReleaseError::Aggregate` listing all problems found.
    pub fn validate(&self) -> Result<()> {
        let mut collector = ErrorCollector::new();

        if self.version != CONFIG_VERSION {
            collector.add(ReleaseError::config(format!(
                "unsupported config version '{}', expected '{}'",
                self.version, CONFIG_VERSION
            )));
        }

        match &self.chart {
            None => collector.add(ReleaseError::config(
                "required option 'chart' missing from config",
            )),
            Some(chart) => chart.validate(&mut collector),
        }

        if self.publish.commit.is_some() && self.publish.pr.is_some() {
            collector.add(ReleaseError::config(
                "invalid publish config: cannot define both 'commit' and 'pr' blocks",
            ));
        }

        let author = &self.commit.author;
        if !author.name.is_empty() && author.email.is_empty() {
            collector.add(ReleaseError::config(
                "commit author specifies name, but no email",
            ));
        }
        if author.name.is_empty() && !author.email.is_empty() {
            collector.add(ReleaseError::config(
                "commit author specified email, but no name",
            ));
        }

        if !self.release.strategy.is_empty()
            && self.release.strategy.parse::<UpdateStrategy>().is_err()
        {
            let supported: Vec<&str> = UpdateStrategy::ALL.iter().map(|s| s.name()).collect();
            collector.add(ReleaseError::config(format!(
                "invalid release strategy '{}', should be one of: {}",
                self.release.strategy,
                supported.join(", ")
            )));
        }

        for extra in &self.extras {
            extra.validate(&mut collector);
        }

        collector.into_result()
    }
}

impl ChartConfig {
    fn validate(&self, collector: &mut ErrorCollector) {
        if self.name.is_empty() {
            collector.add(ReleaseError::config(
                "required option 'chart.name' missing from config",
            ));
        }
        if self.repo.is_empty() {
            collector.add(ReleaseError::config(
                "required option 'chart.repo' missing from config",
            ));
        } else if let Err(e) = Repository::parse(&self.repo) {
            collector.add(e);
        }
    }
}

impl ExtrasConfig {
    fn validate(&self, collector: &mut ErrorCollector) {
        if !self.path.is_empty() && self.updates.is_empty() {
            collector.add(ReleaseError::config(
                "extras config specifies path but no options for search/replace updates",
            ));
        } else if self.path.is_empty() && !self.updates.is_empty() {
            collector.add(ReleaseError::config(
                "extras config specifies search/replace options, but no file path",
            ));
        }

        for update in &self.updates {
            if update.search.is_empty() {
                collector.add(ReleaseError::config(format!(
                    "search and replace config for '{}' has no search string set",
                    self.path
                )));
            }
            if update.replace.is_empty() {
                collector.add(ReleaseError::config(format!(
                    "search and replace config for '{}' has no replace string set",
                    self.path
                )));
            }
            if update.limit < 0 {
                collector.add(ReleaseError::config(format!(
                    "search and replace config for '{}' must have a non-negative limit",
                    self.path
                )));
            }
        }
    }
}

/// Values for a freshly initialised config
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InitOptions {
    pub chart: String,
    pub path: String,
    pub github_owner: String,
    pub github_repo: String,
    pub author: String,
    pub email: String,
}

/// Build the starter config written by `init`
pub fn init_template(opts: &InitOptions) -> Config {
    let chart = if opts.chart.is_empty() {
        opts.github_repo.clone()
    } else {
        opts.chart.clone()
    };

    Config {
        version: CONFIG_VERSION.to_string(),
        chart: Some(ChartConfig {
            name: chart,
            repo: format!("github.com/{}/{}", opts.github_owner, opts.github_repo),
            path: opts.path.clone(),
        }),
        commit: CommitConfig {
            author: AuthorConfig {
                name: opts.author.clone(),
                email: opts.email.clone(),
            },
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Resolve which config file to use.
///
/// Resolution order:
/// 1. Explicit path (a directory means `<dir>/.chartreleaser.toml`)
/// 2. `./.chartreleaser.toml`
/// 3. `<user config dir>/chart-releaser/config.toml`
///
/// # Returns
/// * `Ok(PathBuf)` - Existing config file
/// * `Err(NoConfig)` - Nothing found
pub fn resolve_config_path(config_path: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = config_path {
        let path = if path.is_dir() {
            path.join(CONFIG_FILE_NAME)
        } else {
            path.to_path_buf()
        };
        return if path.is_file() {
            Ok(path)
        } else {
            Err(ReleaseError::NoConfig(path.display().to_string()))
        };
    }

    let mut searched = Vec::new();
    let local = PathBuf::from(".").join(CONFIG_FILE_NAME);
    if local.is_file() {
        return Ok(local);
    }
    searched.push(local.display().to_string());

    if let Some(config_dir) = dirs::config_dir() {
        let user = config_dir.join("chart-releaser").join("config.toml");
        if user.is_file() {
            return Ok(user);
        }
        searched.push(user.display().to_string());
    }

    Err(ReleaseError::NoConfig(searched.join(", ")))
}

/// Loads configuration from the resolved path.
///
/// # Returns
/// * `Ok((PathBuf, Config))` - Where the config came from and its contents
/// * `Err` - If no file is found, or it cannot be read or parsed
pub fn load_config(config_path: Option<&Path>) -> Result<(PathBuf, Config)> {
    let path = resolve_config_path(config_path)?;
    debug!(path = %path.display(), "loading config");
    let contents = fs::read_to_string(&path)?;
    let config = Config::from_toml_str(&contents)?;
    Ok((path, config))
}
