use regex::{NoExpand, Regex};
use tracing::{debug, warn};

use crate::config::SearchReplace;
use crate::context::{File, RunContext};
use crate::error::Result;
use crate::pipeline::Stage;
use crate::templates;

/// Applies search/replace updates to additional chart files
pub struct ExtrasStage;

impl Stage for ExtrasStage {
    fn name(&self) -> &'static str {
        "extras"
    }

    fn description(&self) -> &'static str {
        "updating additional chart files"
    }

    fn run(&self, ctx: &mut RunContext) -> Result<()> {
        ctx.check_deadline()?;

        for extra in ctx.config.extras.clone() {
            debug!(
                path = %extra.path,
                repo_owner = %ctx.repository.owner,
                repo_name = %ctx.repository.name,
                "getting file contents"
            );
            let fetched = ctx
                .client("extras")?
                .get_file(&ctx.read_options(), &extra.path);
            let contents = match fetched {
                Ok(contents) => contents,
                Err(e) => {
                    ctx.check_dry_run(e)?;
                    warn!(path = %extra.path, "failed to get contents for file -- skipping");
                    continue;
                }
            };

            let mut file = File::new(extra.path.as_str());
            file.previous_contents = contents.clone().into_bytes();

            let mut updated = contents;
            for update in &extra.updates {
                if let Some(next) = apply_update(ctx, &updated, update)? {
                    updated = next;
                }
            }
            file.new_contents = updated.into_bytes();

            if !file.has_changes() {
                warn!(path = %extra.path, "no change detected to extras file");
            }
            ctx.files.push(file);
        }
        Ok(())
    }
}

/// Run one search/replace over `contents`.
///
/// Returns `None` when a dry run skipped the update.
fn apply_update(
    ctx: &mut RunContext,
    contents: &str,
    update: &SearchReplace,
) -> Result<Option<String>> {
    let re = match Regex::new(&update.search) {
        Ok(re) => re,
        Err(e) => {
            ctx.check_dry_run(e.into())?;
            warn!(search = %update.search, "failed to compile search regex");
            return Ok(None);
        }
    };

    let replacement = match templates::render(ctx, "extras replace", &update.replace) {
        Ok(text) => text,
        Err(e) => {
            ctx.check_dry_run(e)?;
            warn!(template = %update.replace, "failed to render replace template");
            return Ok(None);
        }
    };

    // 0 replaces every match
    let limit = usize::try_from(update.limit).unwrap_or(0);
    Ok(Some(
        re.replacen(contents, limit, NoExpand(&replacement))
            .into_owned(),
    ))
}
