use std::env;

use tracing::debug;

use crate::context::{RepoType, RunContext};
use crate::error::{ReleaseError, Result};
use crate::pipeline::Stage;

/// Environment variable holding the GitHub API token
pub const GITHUB_TOKEN_VAR: &str = "GITHUB_TOKEN";

/// Reads credentials for the configured repository type
pub struct EnvStage;

impl Stage for EnvStage {
    fn name(&self) -> &'static str {
        "env"
    }

    fn description(&self) -> &'static str {
        "loading environment variables"
    }

    fn run(&self, ctx: &mut RunContext) -> Result<()> {
        let kind = ctx
            .repository
            .kind
            .ok_or(ReleaseError::RepositoryTypeNotSet("env"))?;

        match kind {
            RepoType::GitHub => {
                debug!(var = GITHUB_TOKEN_VAR, "loading repository token");
                match env::var(GITHUB_TOKEN_VAR) {
                    Ok(token) if !token.is_empty() => ctx.token = token,
                    _ => {
                        ctx.check_dry_run(ReleaseError::TokenNotSet)?;
                        ctx.token = String::new();
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Repository;
    use crate::pipeline::stages::testing::context;
    use serial_test::serial;

    fn github_context() -> RunContext {
        let mut ctx = context();
        ctx.repository = Repository::parse("acme/charts").unwrap();
        ctx
    }

    #[test]
    fn test_stage_name() {
        assert_eq!(EnvStage.name(), "env");
        assert_eq!(EnvStage.description(), "loading environment variables");
    }

    #[test]
    fn test_repository_type_not_set() {
        let mut ctx = context();
        assert!(matches!(
            EnvStage.run(&mut ctx),
            Err(ReleaseError::RepositoryTypeNotSet("env"))
        ));
    }

    #[test]
    #[serial]
    fn test_token_loaded() {
        env::set_var(GITHUB_TOKEN_VAR, "secret");
        let mut ctx = github_context();
        let result = EnvStage.run(&mut ctx);
        env::remove_var(GITHUB_TOKEN_VAR);

        result.unwrap();
        assert_eq!(ctx.token, "secret");
    }

    #[test]
    #[serial]
    fn test_token_missing() {
        env::remove_var(GITHUB_TOKEN_VAR);
        let mut ctx = github_context();
        assert!(matches!(
            EnvStage.run(&mut ctx),
            Err(ReleaseError::TokenNotSet)
        ));
    }

    #[test]
    #[serial]
    fn test_token_missing_dry_run() {
        env::remove_var(GITHUB_TOKEN_VAR);
        let mut ctx = github_context();
        ctx.dry_run = true;
        EnvStage.run(&mut ctx).unwrap();
        assert!(ctx.token.is_empty());
        assert_eq!(ctx.errors().count(), 1);
    }
}
