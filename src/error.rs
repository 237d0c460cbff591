use std::time::Duration;

use thiserror::Error;

use crate::collector::ErrorCollector;

/// Unified error type for chart-releaser operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("invalid version '{input}': {reason}")]
    Parse { input: String, reason: String },

    #[error("version is less than the starting base version")]
    VersionLessThanBase,

    #[error("no version drift detected, versions are equal")]
    NoDrift,

    #[error("cannot increment {level} component of version '{version}': value overflows")]
    VersionOverflow { version: String, level: String },

    #[error("incomplete update context")]
    IncompleteUpdateContext,

    #[error("unsupported {kind} strategy: {name}")]
    UnsupportedStrategy { kind: &'static str, name: String },

    #[error("{0}")]
    Aggregate(ErrorCollector),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("no configuration file found (looked for {0})")]
    NoConfig(String),

    #[error("configuration file already exists: {0}")]
    ConfigExists(String),

    #[error("current directory is not a git repository")]
    NotInRepository,

    #[error("git is in a dirty state")]
    DirtyRepository,

    #[error("GITHUB_TOKEN environment variable not set")]
    TokenNotSet,

    #[error("repository type not set prior to running '{0}' stage")]
    RepositoryTypeNotSet(&'static str),

    #[error("unsupported repository type: {0}")]
    UnsupportedRepository(String),

    #[error("repository client not set prior to running '{0}' stage")]
    ClientNotSet(&'static str),

    #[error("file not found in remote repo: {0}")]
    FileNotFound(String),

    #[error("Remote operation failed: {0}")]
    Client(String),

    #[error("chart does not specify a version")]
    NoChartVersion,

    #[error("chart does not specify an appVersion")]
    NoAppVersion,

    #[error("chart file has no changes")]
    NoChartChanges,

    #[error("template error: {0}")]
    Template(String),

    #[error("run exceeded its deadline of {0:?}")]
    Timeout(Duration),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid regular expression: {0}")]
    Regex(#[from] regex::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

/// Convenience type alias for Results in chart-releaser
pub type Result<T> = std::result::Result<T, ReleaseError>;

impl ReleaseError {
    /// Create a version parse error naming the offending input
    pub fn parse(input: impl Into<String>, reason: impl Into<String>) -> Self {
        ReleaseError::Parse {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ReleaseError::Config(msg.into())
    }

    /// Create a remote client error with context
    pub fn client(msg: impl Into<String>) -> Self {
        ReleaseError::Client(msg.into())
    }

    /// Create a template rendering error with context
    pub fn template(msg: impl Into<String>) -> Self {
        ReleaseError::Template(msg.into())
    }

    /// Create an unsupported strategy error for the given strategy kind
    pub fn unsupported_strategy(kind: &'static str, name: impl Into<String>) -> Self {
        ReleaseError::UnsupportedStrategy {
            kind,
            name: name.into(),
        }
    }
}
