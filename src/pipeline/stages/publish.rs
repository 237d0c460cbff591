use tracing::{debug, error, info, warn};

use crate::context::RunContext;
use crate::domain::PublishStrategy;
use crate::error::{ReleaseError, Result};
use crate::pipeline::Stage;

/// Pushes the updated files to the chart repository
pub struct PublishStage;

impl Stage for PublishStage {
    fn name(&self) -> &'static str {
        "publish"
    }

    fn description(&self) -> &'static str {
        "publishing changes"
    }

    fn run(&self, ctx: &mut RunContext) -> Result<()> {
        ctx.check_deadline()?;

        if !tag_is_releasable(ctx) {
            return Ok(());
        }

        if ctx.dry_run {
            info!("dry-run: skipping publish");
            return Ok(());
        }

        match ctx.publish_strategy {
            PublishStrategy::Commit => publish_commit(ctx),
            PublishStrategy::PullRequest => publish_pull_request(ctx),
        }
    }
}

/// Check the tag against the release constraints.
///
/// A dry run only warns about a failed constraint.
fn tag_is_releasable(ctx: &RunContext) -> bool {
    let tag = &ctx.git.tag;

    let unmatched = ctx.release.matches.iter().filter(|re| !re.is_match(tag));
    for re in unmatched {
        if ctx.dry_run {
            warn!(tag = %tag, constraint = %re, "dry-run: tag release does not match release constraint");
        } else {
            info!(tag = %tag, constraint = %re, "tag release does not match release constraint: will not update");
            return false;
        }
    }

    let ignored = ctx.release.ignores.iter().filter(|re| re.is_match(tag));
    for re in ignored {
        if ctx.dry_run {
            warn!(tag = %tag, constraint = %re, "dry-run: tag release matches release ignore constraint");
        } else {
            info!(tag = %tag, constraint = %re, "tag release matches release ignore constraint: will not update");
            return false;
        }
    }
    true
}

fn publish_commit(ctx: &RunContext) -> Result<()> {
    let client = ctx.client("publish")?;
    let opts = ctx.publish_options();
    let message = &ctx.release.update_commit_msg;

    if ctx.git.reference != ctx.git.base {
        debug!(git_ref = %opts.git_ref, base = %opts.base, "creating branch");
        client.create_ref(&opts)?;
    }

    let chart = &ctx.chart.file;
    if !chart.has_changes() {
        error!("chart has no changes - will not update");
        return Err(ReleaseError::NoChartChanges);
    }
    debug!(path = %chart.path, "updating chart");
    client.update_file(&opts, &chart.path, message, &chart.new_contents)?;

    for file in &ctx.files {
        if file.has_changes() {
            debug!(path = %file.path, "updating file");
            client.update_file(&opts, &file.path, message, &file.new_contents)?;
        } else {
            warn!(path = %file.path, "file has no changes - will not update");
        }
    }
    Ok(())
}

fn publish_pull_request(ctx: &RunContext) -> Result<()> {
    publish_commit(ctx)?;

    let opts = ctx.publish_options();
    debug!(title = %ctx.release.pr_title, "opening pull request");
    ctx.client("publish")?
        .create_pull_request(&opts, &ctx.release.pr_title, &ctx.release.pr_body)
}
