use regex::Regex;
use tracing::{debug, error, info, warn};

use crate::context::{Repository, RunContext};
use crate::domain::{PublishStrategy, UpdateStrategy};
use crate::error::{ReleaseError, Result};
use crate::pipeline::Stage;
use crate::templates;

const DRY_RUN_USER: &str = "dry-run-user";
const DRY_RUN_EMAIL: &str = "dry-run@committer.dev";
const DRY_RUN_REGEX: &str = "dry-run";

/// Loads run settings from the configuration
pub struct ConfigStage;

impl Stage for ConfigStage {
    fn name(&self) -> &'static str {
        "config"
    }

    fn description(&self) -> &'static str {
        "loading context configuration"
    }

    fn run(&self, ctx: &mut RunContext) -> Result<()> {
        load_update_strategy(ctx)?;
        load_publish_strategy(ctx);
        load_templates(ctx);
        load_author(ctx)?;

        debug!("loading chart context");
        let chart = ctx.config.chart.clone().unwrap_or_default();
        ctx.chart.name = chart.name;
        ctx.chart.sub_path = chart.path;

        debug!("loading repository context");
        ctx.repository = Repository::parse(&chart.repo)?;

        debug!("loading release constraints");
        let matches = ctx.config.release.matches.clone();
        ctx.release.matches = compile_constraints(ctx, &matches, "match")?;
        let ignores = ctx.config.release.ignores.clone();
        ctx.release.ignores = compile_constraints(ctx, &ignores, "ignore")?;
        Ok(())
    }
}

fn load_update_strategy(ctx: &mut RunContext) -> Result<()> {
    let name = &ctx.config.release.strategy;
    ctx.update_strategy = if name.is_empty() {
        info!(strategy = "default", "no release strategy configured, using default");
        UpdateStrategy::Default
    } else {
        name.parse()?
    };
    Ok(())
}

fn load_publish_strategy(ctx: &mut RunContext) {
    let publish = &ctx.config.publish;
    ctx.publish_strategy = if publish.commit.is_some() {
        PublishStrategy::Commit
    } else {
        if publish.pr.is_none() {
            debug!(default = %PublishStrategy::PullRequest, "no publish config defined, using default publish strategy");
        }
        PublishStrategy::PullRequest
    };
}

/// Pick a configured value, falling back to a default when empty
fn or_default(value: &str, default: &str, what: &str) -> String {
    if value.is_empty() {
        debug!(default, "no {} defined, using default", what);
        default.to_string()
    } else {
        value.to_string()
    }
}

fn load_templates(ctx: &mut RunContext) {
    ctx.release.update_commit_msg = or_default(
        &ctx.config.commit.templates.update,
        templates::DEFAULT_UPDATE_COMMIT_MESSAGE,
        "update commit message",
    );

    match ctx.publish_strategy {
        PublishStrategy::Commit => {
            let commit = ctx.config.publish.commit.clone().unwrap_or_default();
            ctx.git.reference = or_default(
                &commit.branch,
                templates::DEFAULT_BASE_BRANCH,
                "publish commit branch",
            );
            ctx.git.base = or_default(
                &commit.base,
                templates::DEFAULT_BASE_BRANCH,
                "publish commit base branch",
            );
        }
        PublishStrategy::PullRequest => {
            let pr = ctx.config.publish.pr.clone().unwrap_or_default();
            ctx.git.reference = or_default(
                &pr.branch_template,
                templates::DEFAULT_BRANCH_NAME,
                "PR branch template",
            );
            ctx.git.base = or_default(
                &pr.base,
                templates::DEFAULT_BASE_BRANCH,
                "publish PR base branch",
            );
            ctx.release.pr_title = or_default(
                &pr.title_template,
                templates::DEFAULT_PULL_REQUEST_TITLE,
                "pull request title",
            );
            ctx.release.pr_body = or_default(
                &pr.body_template,
                templates::DEFAULT_PULL_REQUEST_BODY,
                "pull request body",
            );
        }
    }
}

/// Resolve one half of the commit identity: config, then git config, then a
/// dry-run stand-in.
fn discover_identity(
    ctx: &mut RunContext,
    configured: String,
    git_key: &str,
    stand_in: &str,
) -> Result<String> {
    if !configured.is_empty() {
        return Ok(configured);
    }

    debug!(key = git_key, "no commit author set, discovering from git config");
    let found = ctx.local.config_value(git_key).and_then(|value| {
        value
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ReleaseError::config(format!("git config '{}' is not set", git_key)))
    });

    match found {
        Ok(value) => Ok(value),
        Err(e) => {
            if let Err(e) = ctx.check_dry_run(e) {
                error!(key = git_key, "unable to determine committer - must be set explicitly");
                return Err(e);
            }
            info!(key = git_key, value = stand_in, "dry-run: using stand-in for committer");
            Ok(stand_in.to_string())
        }
    }
}

fn load_author(ctx: &mut RunContext) -> Result<()> {
    debug!("loading author context");
    let author = ctx.config.commit.author.clone();
    ctx.author.name = discover_identity(ctx, author.name, "user.name", DRY_RUN_USER)?;
    ctx.author.email = discover_identity(ctx, author.email, "user.email", DRY_RUN_EMAIL)?;
    Ok(())
}

fn compile_constraints(ctx: &mut RunContext, patterns: &[String], kind: &str) -> Result<Vec<Regex>> {
    let mut compiled = Vec::with_capacity(patterns.len());
    for pattern in patterns {
        let re = match Regex::new(pattern) {
            Ok(re) => re,
            Err(e) => {
                ctx.check_dry_run(e.into())?;
                warn!(pattern = %pattern, "dry-run: failed to compile release {} regex, using stand-in", kind);
                Regex::new(DRY_RUN_REGEX)?
            }
        };
        compiled.push(re);
    }
    Ok(compiled)
}
