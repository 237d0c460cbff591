//! Command workflows
//!
//! Each `run_*` function implements one subcommand without depending on
//! clap, so the workflows can be driven directly from tests.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, info};

use crate::client::RepositoryClient;
use crate::config::{self, init_template, load_config, InitOptions, CONFIG_FILE_NAME};
use crate::context::{Deadline, Repository, RunContext};
use crate::error::{ReleaseError, Result};
use crate::git::{Git2Repository, LocalRepository};
use crate::pipeline::stages::EnvStage;
use crate::pipeline::{Pipeline, Stage};
use crate::ui;

/// Default run deadline for `update`
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// Arguments for the update workflow
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateArgs {
    /// Config file or directory containing one
    pub config_path: Option<PathBuf>,

    /// Run every stage but never publish; errors are collected instead of
    /// aborting the run
    pub dry_run: bool,

    /// Allow uncommitted changes in the working copy
    pub allow_dirty: bool,

    /// Print a diff of the changed files
    pub show_diff: bool,

    /// Overall run deadline
    pub timeout: Duration,
}

impl Default for UpdateArgs {
    fn default() -> Self {
        UpdateArgs {
            config_path: None,
            dry_run: false,
            allow_dirty: false,
            show_diff: false,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Update the chart for the latest application tag in the current directory.
pub fn run_update(args: &UpdateArgs) -> Result<()> {
    let local = Git2Repository::discover(".");
    run_update_with(args, Box::new(local), None)
}

/// Update workflow against a given working copy.
///
/// A supplied `client` is used instead of building one from the
/// environment.
///
/// # Returns
/// * `Ok(())` - The pipeline completed, and a dry run collected no errors
/// * `Err(Aggregate)` - A dry run completed but collected errors
/// * `Err` - The first error of a normal run
pub fn run_update_with(
    args: &UpdateArgs,
    local: Box<dyn LocalRepository>,
    client: Option<Box<dyn RepositoryClient>>,
) -> Result<()> {
    let (path, config) = load_config(args.config_path.as_deref())?;
    info!(path = %path.display(), "loaded config");

    let mut ctx = RunContext::new(config, local);
    ctx.dry_run = args.dry_run;
    ctx.allow_dirty = args.allow_dirty;
    ctx.show_diff = args.show_diff;
    ctx.deadline = Some(Deadline::after(args.timeout));
    ctx.client = client;

    if ctx.dry_run {
        ui::display_status("dry run: no changes will be published");
    }
    if ctx.allow_dirty {
        ui::display_warning("allowing a dirty working tree");
    }

    if let Err(e) = ctx.config.validate() {
        ctx.check_dry_run(e)?;
    }

    Pipeline::update().run(&mut ctx)?;

    if let (Some(previous), Some(next), Some(app)) = (
        ctx.chart.previous_version.as_ref(),
        ctx.chart.new_version.as_ref(),
        ctx.app.new_version.as_ref(),
    ) {
        ui::display_version_change(&ctx.chart.name, previous, next, app);
    }

    if ctx.dry_run {
        let errors = ctx.take_errors();
        ui::display_dry_run_summary(&errors);
        return errors.into_result();
    }

    ui::display_success("chart update complete");
    Ok(())
}

/// Check that a config loads and validates.
///
/// Unless `skip_env` is set, the environment the config needs (such as
/// `GITHUB_TOKEN`) must also be present.
pub fn run_check(config_path: Option<&Path>, skip_env: bool) -> Result<PathBuf> {
    let (path, config) = load_config(config_path)?;
    config.validate()?;

    if !skip_env {
        debug!("checking environment");
        let repo = config
            .chart
            .as_ref()
            .map(|chart| chart.repo.clone())
            .unwrap_or_default();
        let repository = Repository::parse(&repo)?;

        let mut ctx = RunContext::new(config, Box::new(Git2Repository::discover(".")));
        ctx.repository = repository;
        EnvStage.run(&mut ctx)?;
    }

    ui::display_success(&format!(
        "successfully loaded {} config file ({})",
        config::CONFIG_VERSION,
        path.display()
    ));
    Ok(path)
}

/// Write a starter config into `dir`.
///
/// The chart name defaults to the directory name, and the commit author to
/// the git identity configured for `dir`.
pub fn run_init(dir: &Path, opts: &InitOptions) -> Result<PathBuf> {
    let path = dir.join(CONFIG_FILE_NAME);
    if path.exists() {
        return Err(ReleaseError::ConfigExists(path.display().to_string()));
    }

    if opts.github_owner.is_empty() {
        return Err(ReleaseError::config("no github owner specified"));
    }
    if opts.github_repo.is_empty() {
        return Err(ReleaseError::config("no github repo specified"));
    }

    let mut opts = opts.clone();
    if opts.chart.is_empty() {
        opts.chart = fs::canonicalize(dir)?
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();
    }

    if opts.author.is_empty() || opts.email.is_empty() {
        let local = Git2Repository::discover(dir);
        if opts.author.is_empty() {
            debug!("no author specified, checking git config");
            opts.author = local.config_value("user.name")?.unwrap_or_default();
        }
        if opts.email.is_empty() {
            debug!("no email specified, checking git config");
            opts.email = local.config_value("user.email")?.unwrap_or_default();
        }
    }

    let contents = init_template(&opts).to_toml_string(true)?;
    fs::write(&path, contents)?;
    ui::display_success(&format!("created {}", path.display()));
    Ok(path)
}

/// Rewrite a config file in canonical form
pub fn run_fmt(config_path: Option<&Path>, no_header: bool) -> Result<PathBuf> {
    let (path, config) = load_config(config_path)?;
    let contents = config.to_toml_string(!no_header)?;
    fs::write(&path, contents)?;
    debug!(path = %path.display(), "formatted config");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use tempfile::TempDir;

    fn init_options() -> InitOptions {
        InitOptions {
            chart: "app".to_string(),
            path: "charts/app".to_string(),
            github_owner: "acme".to_string(),
            github_repo: "charts".to_string(),
            author: "Chart Bot".to_string(),
            email: "bot@example.com".to_string(),
        }
    }

    #[test]
    fn test_update_args_default_timeout() {
        assert_eq!(UpdateArgs::default().timeout, Duration::from_secs(300));
    }

    #[test]
    fn test_init_writes_valid_config() {
        let dir = TempDir::new().unwrap();
        let path = run_init(dir.path(), &init_options()).unwrap();

        assert_eq!(path, dir.path().join(CONFIG_FILE_NAME));
        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with(config::CONFIG_HEADER));
        let config = Config::from_toml_str(&contents).unwrap();
        config.validate().unwrap();
        assert_eq!(config.chart.unwrap().repo, "github.com/acme/charts");
    }

    #[test]
    fn test_init_refuses_overwrite() {
        let dir = TempDir::new().unwrap();
        run_init(dir.path(), &init_options()).unwrap();
        assert!(matches!(
            run_init(dir.path(), &init_options()),
            Err(ReleaseError::ConfigExists(_))
        ));
    }

    #[test]
    fn test_init_requires_github_coordinates() {
        let dir = TempDir::new().unwrap();
        let opts = InitOptions {
            github_owner: String::new(),
            ..init_options()
        };
        assert!(run_init(dir.path(), &opts).is_err());
        assert!(!dir.path().join(CONFIG_FILE_NAME).exists());
    }

    #[test]
    fn test_init_chart_defaults_to_directory_name() {
        let dir = TempDir::new().unwrap();
        let chart_dir = dir.path().join("my-chart");
        fs::create_dir(&chart_dir).unwrap();
        let opts = InitOptions {
            chart: String::new(),
            ..init_options()
        };
        let path = run_init(&chart_dir, &opts).unwrap();
        let config = Config::from_toml_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(config.chart.unwrap().name, "my-chart");
    }

    #[test]
    fn test_fmt_without_header() {
        let dir = TempDir::new().unwrap();
        let path = run_init(dir.path(), &init_options()).unwrap();

        run_fmt(Some(&path), true).unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        assert!(!contents.starts_with(config::CONFIG_HEADER));
        assert!(Config::from_toml_str(&contents).is_ok());
    }

    #[test]
    fn test_check_skip_env() {
        let dir = TempDir::new().unwrap();
        run_init(dir.path(), &init_options()).unwrap();
        let path = run_check(Some(dir.path()), true).unwrap();
        assert_eq!(path, dir.path().join(CONFIG_FILE_NAME));
    }

    #[test]
    fn test_check_invalid_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "version = \"v2\"\n").unwrap();
        assert!(matches!(
            run_check(Some(&path), true),
            Err(ReleaseError::Aggregate(_))
        ));
    }
}
