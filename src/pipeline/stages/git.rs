use tracing::{debug, info};

use crate::context::RunContext;
use crate::domain::Version;
use crate::error::Result;
use crate::pipeline::Stage;

const PLACEHOLDER_TAG: &str = "0.0.0";

/// Reads the application's latest release tag from the working copy
pub struct GitStage;

impl Stage for GitStage {
    fn name(&self) -> &'static str {
        "git"
    }

    fn description(&self) -> &'static str {
        "parsing git information"
    }

    fn run(&self, ctx: &mut RunContext) -> Result<()> {
        ctx.check_deadline()?;

        debug!("getting latest tag");
        let tag = match ctx.local.latest_tag() {
            Ok(tag) => tag,
            Err(e) => {
                ctx.check_dry_run(e)?;
                info!(tag = PLACEHOLDER_TAG, "dry-run: using placeholder tag");
                PLACEHOLDER_TAG.to_string()
            }
        };

        // Parse failures are fatal even in a dry run
        let version = Version::parse(&tag)?;
        debug!(tag = %tag, version = %version, "found application version");

        ctx.git.tag = tag;
        ctx.app.new_version = Some(version);
        Ok(())
    }
}
