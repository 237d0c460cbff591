use tracing::{debug, warn};

use crate::context::RunContext;
use crate::error::Result;
use crate::pipeline::Stage;
use crate::templates;

const STAND_IN: &str = "dry-run";

/// Expands the branch, commit message and pull request templates
pub struct RenderStage;

impl Stage for RenderStage {
    fn name(&self) -> &'static str {
        "render"
    }

    fn description(&self) -> &'static str {
        "rendering templates"
    }

    fn run(&self, ctx: &mut RunContext) -> Result<()> {
        let template = ctx.git.reference.clone();
        ctx.git.reference = render_field(ctx, "git-ref", &template)?;

        let template = ctx.git.base.clone();
        ctx.git.base = render_field(ctx, "git-base", &template)?;

        let template = ctx.release.update_commit_msg.clone();
        ctx.release.update_commit_msg = render_field(ctx, "update-commit", &template)?;

        let template = ctx.release.pr_title.clone();
        ctx.release.pr_title = render_field(ctx, "pr-title", &template)?;

        let template = ctx.release.pr_body.clone();
        ctx.release.pr_body = render_field(ctx, "pr-body", &template)?;
        Ok(())
    }
}

fn render_field(ctx: &mut RunContext, name: &str, template: &str) -> Result<String> {
    match templates::render(ctx, name, template) {
        Ok(rendered) => {
            debug!(template = name, value = %rendered, "rendered template");
            Ok(rendered)
        }
        Err(e) => {
            ctx.check_dry_run(e)?;
            warn!(template = name, "dry-run: using stand-in for template");
            Ok(STAND_IN.to_string())
        }
    }
}
