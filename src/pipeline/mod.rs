//! Ordered stage execution for the update command.
//!
//! A [Pipeline] runs its stages one after another against a single
//! [RunContext] and stops at the first stage that returns an error. Stages
//! that can tolerate a failure in a dry run do so themselves through
//! [RunContext::check_dry_run], so an error reaching the executor always
//! aborts the run.

pub mod stages;

use tracing::{error, info};

use crate::context::RunContext;
use crate::error::Result;

/// One named step of the pipeline
pub trait Stage {
    /// Short identifier used in logs and errors
    fn name(&self) -> &'static str;

    /// What the stage does, for progress output
    fn description(&self) -> &'static str;

    fn run(&self, ctx: &mut RunContext) -> Result<()>;
}

/// A fixed sequence of stages
pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
}

impl Pipeline {
    pub fn new(stages: Vec<Box<dyn Stage>>) -> Self {
        Pipeline { stages }
    }

    /// The stages of an `update` run, in order
    pub fn update() -> Self {
        Pipeline::new(vec![
            Box::new(stages::SetupStage),
            Box::new(stages::ConfigStage),
            Box::new(stages::EnvStage),
            Box::new(stages::GitStage),
            Box::new(stages::ClientStage),
            Box::new(stages::ChartStage),
            Box::new(stages::ExtrasStage),
            Box::new(stages::RenderStage),
            Box::new(stages::PublishStage),
            Box::new(stages::DiffStage),
        ])
    }

    /// Stage names in execution order
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Run every stage in order, stopping at the first error
    pub fn run(&self, ctx: &mut RunContext) -> Result<()> {
        for stage in &self.stages {
            info!(stage = stage.name(), "{}", stage.description());
            if let Err(e) = stage.run(ctx) {
                error!(stage = stage.name(), error = %e, "stage failed");
                return Err(e);
            }
        }
        Ok(())
    }
}
