//! Per-run state shared by every pipeline stage.
//!
//! A [RunContext] is created for one `update` run and threaded by mutable
//! reference through the stages. It owns the error collector used by the
//! dry-run gate ([RunContext::check_dry_run]), the single funnel through
//! which a stage may tolerate its own failure.

use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

use regex::Regex;
use tracing::warn;

use crate::client::{ClientOptions, RepositoryClient};
use crate::collector::ErrorCollector;
use crate::config::Config;
use crate::domain::{PublishStrategy, UpdateStrategy, Version};
use crate::error::{ReleaseError, Result};
use crate::git::LocalRepository;

/// Hosting service for the chart repository
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoType {
    GitHub,
}

impl FromStr for RepoType {
    type Err = ReleaseError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "github" | "github.com" => Ok(RepoType::GitHub),
            _ => Err(ReleaseError::UnsupportedRepository(s.to_string())),
        }
    }
}

impl fmt::Display for RepoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepoType::GitHub => f.write_str("github"),
        }
    }
}

/// Chart repository coordinates
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Repository {
    /// Unset until the config stage has parsed `chart.repo`
    pub kind: Option<RepoType>,
    pub owner: String,
    pub name: String,
}

impl Repository {
    /// Parse `owner/name` or `host/owner/name`.
    ///
    /// Without a host the repository is assumed to live on GitHub.
    pub fn parse(repo: &str) -> Result<Self> {
        let parts: Vec<&str> = repo.split('/').collect();
        let (kind, owner, name) = match parts.as_slice() {
            [owner, name] => (RepoType::GitHub, owner, name),
            [host, owner, name] => (host.parse()?, owner, name),
            _ => {
                return Err(ReleaseError::config(format!(
                    "unexpected repository string format '{}' - should be in the form of [HOST/]OWNER/NAME",
                    repo
                )))
            }
        };

        if owner.is_empty() || name.is_empty() {
            return Err(ReleaseError::config(format!(
                "repository '{}' is missing an owner or name",
                repo
            )));
        }

        Ok(Repository {
            kind: Some(kind),
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }
}

/// A file in the chart repository and its before/after contents
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct File {
    pub path: String,
    pub previous_contents: Vec<u8>,
    pub new_contents: Vec<u8>,
}

impl File {
    pub fn new(path: impl Into<String>) -> Self {
        File {
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn has_changes(&self) -> bool {
        self.previous_contents != self.new_contents
    }
}

/// Application release being tracked
#[derive(Debug, Clone, Default)]
pub struct App {
    /// Parsed from the latest git tag
    pub new_version: Option<Version>,
    /// The chart's `appVersion` before the update
    pub previous_version: Option<Version>,
}

#[derive(Debug, Clone, Default)]
pub struct Author {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Default)]
pub struct Chart {
    pub name: String,
    /// Path to the chart directory or Chart.yaml within the repository
    pub sub_path: String,
    pub file: File,
    pub new_version: Option<Version>,
    pub previous_version: Option<Version>,
}

#[derive(Debug, Clone, Default)]
pub struct Git {
    /// Raw latest tag
    pub tag: String,
    /// Branch receiving the changes (a template until rendered)
    pub reference: String,
    /// Branch the changes are based on (a template until rendered)
    pub base: String,
}

#[derive(Debug, Clone, Default)]
pub struct Release {
    pub pr_title: String,
    pub pr_body: String,
    pub update_commit_msg: String,
    pub matches: Vec<Regex>,
    pub ignores: Vec<Regex>,
}

/// Overall run deadline
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    at: Instant,
    timeout: Duration,
}

impl Deadline {
    pub fn after(timeout: Duration) -> Self {
        Deadline {
            at: Instant::now() + timeout,
            timeout,
        }
    }

    pub fn is_elapsed(&self) -> bool {
        Instant::now() >= self.at
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// Mutable state for one update run
pub struct RunContext {
    pub config: Config,
    pub dry_run: bool,
    pub allow_dirty: bool,
    pub show_diff: bool,
    pub deadline: Option<Deadline>,
    pub token: String,

    pub update_strategy: UpdateStrategy,
    pub publish_strategy: PublishStrategy,

    pub app: App,
    pub author: Author,
    pub chart: Chart,
    pub files: Vec<File>,
    pub git: Git,
    pub repository: Repository,
    pub release: Release,

    /// Set by the client stage unless supplied up front
    pub client: Option<Box<dyn RepositoryClient>>,
    pub local: Box<dyn LocalRepository>,

    errors: ErrorCollector,
}

impl RunContext {
    pub fn new(config: Config, local: Box<dyn LocalRepository>) -> Self {
        RunContext {
            config,
            dry_run: false,
            allow_dirty: false,
            show_diff: false,
            deadline: None,
            token: String::new(),
            update_strategy: UpdateStrategy::default(),
            publish_strategy: PublishStrategy::default(),
            app: App::default(),
            author: Author::default(),
            chart: Chart::default(),
            files: Vec::new(),
            git: Git::default(),
            repository: Repository::default(),
            release: Release::default(),
            client: None,
            local,
            errors: ErrorCollector::new(),
        }
    }

    /// The dry-run gate.
    ///
    /// In a normal run the error is handed back for the caller to
    /// propagate. In a dry run it is recorded and `Ok(())` is returned, and
    /// the caller continues with a placeholder value.
    pub fn check_dry_run(&mut self, err: ReleaseError) -> Result<()> {
        if !self.dry_run {
            return Err(err);
        }
        warn!(error = %err, "dry-run: ignoring error");
        self.errors.add(err);
        Ok(())
    }

    /// Fail with `Timeout` once the run deadline has passed.
    ///
    /// A dry run records the timeout once and then stops checking.
    pub fn check_deadline(&mut self) -> Result<()> {
        match self.deadline {
            Some(deadline) if deadline.is_elapsed() => {
                self.check_dry_run(ReleaseError::Timeout(deadline.timeout()))?;
                self.deadline = None;
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Errors swallowed so far by the dry-run gate
    pub fn errors(&self) -> &ErrorCollector {
        &self.errors
    }

    pub fn take_errors(&mut self) -> ErrorCollector {
        std::mem::take(&mut self.errors)
    }

    /// Client handle for a stage, failing if the client stage has not run
    pub fn client(&self, stage: &'static str) -> Result<&dyn RepositoryClient> {
        self.client
            .as_deref()
            .ok_or(ReleaseError::ClientNotSet(stage))
    }

    /// Options for reading from the chart repository's default branch
    pub fn read_options(&self) -> ClientOptions {
        ClientOptions::for_repository(&self.repository.owner, &self.repository.name)
    }

    /// Options for writing to the rendered publish branch
    pub fn publish_options(&self) -> ClientOptions {
        ClientOptions {
            git_ref: self.git.reference.clone(),
            base: self.git.base.clone(),
            repo_owner: self.repository.owner.clone(),
            repo_name: self.repository.name.clone(),
            author_name: self.author.name.clone(),
            author_email: self.author.email.clone(),
        }
    }
}
