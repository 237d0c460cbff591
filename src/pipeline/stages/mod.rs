//! The stages of the update pipeline, in execution order.

pub mod chart;
pub mod client;
pub mod config;
pub mod diff;
pub mod env;
pub mod extras;
pub mod git;
pub mod publish;
pub mod render;
pub mod setup;

pub use chart::ChartStage;
pub use client::ClientStage;
pub use config::ConfigStage;
pub use diff::DiffStage;
pub use env::EnvStage;
pub use extras::ExtrasStage;
pub use git::GitStage;
pub use publish::PublishStage;
pub use render::RenderStage;
pub use setup::SetupStage;

#[cfg(test)]
pub(crate) mod testing {
    use crate::client::MockClient;
    use crate::config::{ChartConfig, Config, CONFIG_VERSION};
    use crate::context::{RepoType, Repository, RunContext};
    use crate::git::MockRepository;

    pub fn config() -> Config {
        Config {
            version: CONFIG_VERSION.to_string(),
            chart: Some(ChartConfig {
                name: "app".to_string(),
                repo: "github.com/acme/charts".to_string(),
                path: "charts/app".to_string(),
            }),
            ..Default::default()
        }
    }

    pub fn context_with(local: MockRepository) -> RunContext {
        RunContext::new(config(), Box::new(local))
    }

    pub fn context() -> RunContext {
        context_with(MockRepository::new())
    }

    /// Context with repository coordinates and a mock client installed
    pub fn context_with_client(client: &MockClient) -> RunContext {
        let mut ctx = context();
        ctx.repository = Repository {
            kind: Some(RepoType::GitHub),
            owner: "acme".to_string(),
            name: "charts".to_string(),
        };
        ctx.client = Some(Box::new(client.clone()));
        ctx
    }
}
