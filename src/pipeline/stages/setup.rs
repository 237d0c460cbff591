use tracing::{debug, error, info};

use crate::context::RunContext;
use crate::error::{ReleaseError, Result};
use crate::pipeline::Stage;

/// Pre-flight checks on the local working copy
pub struct SetupStage;

impl Stage for SetupStage {
    fn name(&self) -> &'static str {
        "setup"
    }

    fn description(&self) -> &'static str {
        "performing pre-flight setup and checks"
    }

    fn run(&self, ctx: &mut RunContext) -> Result<()> {
        debug!("checking if directory is a git repo");
        if !ctx.local.is_repository() {
            ctx.check_dry_run(ReleaseError::NotInRepository)?;
            // Nothing more can be checked without a repository
            return Ok(());
        }

        debug!("checking if git is in a clean state");
        let dirty = match ctx.local.dirty_paths() {
            Ok(paths) => paths,
            Err(e) => {
                ctx.check_dry_run(e)?;
                Vec::new()
            }
        };

        if !dirty.is_empty() {
            if ctx.allow_dirty {
                info!("allowing git to be in a dirty state");
            } else {
                error!(paths = %dirty.join(", "), "dirty git state detected");
                ctx.check_dry_run(ReleaseError::DirtyRepository)?;
            }
        }
        Ok(())
    }
}
