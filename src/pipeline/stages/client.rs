use tracing::{debug, warn};

use crate::client::GitHubClient;
use crate::context::{RepoType, RunContext};
use crate::error::{ReleaseError, Result};
use crate::pipeline::Stage;

/// Builds the client for the chart repository
pub struct ClientStage;

impl Stage for ClientStage {
    fn name(&self) -> &'static str {
        "client"
    }

    fn description(&self) -> &'static str {
        "creating repository client"
    }

    fn run(&self, ctx: &mut RunContext) -> Result<()> {
        let kind = ctx
            .repository
            .kind
            .ok_or(ReleaseError::RepositoryTypeNotSet("client"))?;

        if ctx.client.is_some() {
            debug!("repository client already set, skipping");
            return Ok(());
        }

        match kind {
            RepoType::GitHub => {
                if ctx.token.is_empty() {
                    ctx.check_dry_run(ReleaseError::TokenNotSet)?;
                    warn!("dry-run: using unauthenticated GitHub client");
                }
                debug!("creating GitHub client");
                ctx.client = Some(Box::new(GitHubClient::new(&ctx.token)));
            }
        }
        Ok(())
    }
}
