use serde_yaml::{Mapping, Value};
use tracing::{debug, warn};

use crate::analyzer::UpdateContext;
use crate::context::{File, RunContext};
use crate::domain::Version;
use crate::error::{ReleaseError, Result};
use crate::pipeline::Stage;

const CHART_FILE: &str = "Chart.yaml";
const VERSION_KEY: &str = "version";
const APP_VERSION_KEY: &str = "appVersion";
const PLACEHOLDER_VERSION: &str = "0.0.0";
const PLACEHOLDER_NEW_VERSION: &str = "0.1.0";

/// Bumps `version` and `appVersion` in the chart's Chart.yaml
pub struct ChartStage;

impl Stage for ChartStage {
    fn name(&self) -> &'static str {
        "chart"
    }

    fn description(&self) -> &'static str {
        "updating helm chart"
    }

    fn run(&self, ctx: &mut RunContext) -> Result<()> {
        ctx.check_deadline()?;

        let path = chart_file_path(&ctx.chart.sub_path);
        debug!(path = %path, "fetching chart");
        let raw = ctx.client("chart")?.get_file(&ctx.read_options(), &path)?;

        let mut chart: Mapping = serde_yaml::from_str(&raw)?;
        let mut file = File::new(path);
        // Normalised so the diff only shows real changes
        file.previous_contents = serde_yaml::to_string(&chart)?.into_bytes();

        let chart_version = read_version(ctx, &chart, VERSION_KEY, ReleaseError::NoChartVersion)?;
        let app_version = read_version(ctx, &chart, APP_VERSION_KEY, ReleaseError::NoAppVersion)?;

        let previous_chart = Version::parse(&chart_version)?;
        let previous_app = Version::parse(&app_version)?;
        let new_app = ctx
            .app
            .new_version
            .clone()
            .ok_or(ReleaseError::IncompleteUpdateContext)?;

        let resolved =
            UpdateContext::new(&previous_app, &new_app, &previous_chart, ctx.update_strategy)
                .resolve();
        let new_chart = match resolved {
            Ok(version) => version,
            Err(e) => {
                ctx.check_dry_run(e)?;
                warn!(
                    version = PLACEHOLDER_NEW_VERSION,
                    "dry-run: using placeholder for new chart version"
                );
                Version::parse(PLACEHOLDER_NEW_VERSION)?
            }
        };
        debug!(
            previous = %previous_chart,
            new = %new_chart,
            app = %new_app,
            "resolved chart version"
        );

        chart.insert(
            Value::String(VERSION_KEY.to_string()),
            Value::String(new_chart.to_string()),
        );
        chart.insert(
            Value::String(APP_VERSION_KEY.to_string()),
            Value::String(new_app.to_string()),
        );
        file.new_contents = serde_yaml::to_string(&chart)?.into_bytes();

        ctx.chart.file = file;
        ctx.chart.previous_version = Some(previous_chart);
        ctx.chart.new_version = Some(new_chart);
        ctx.app.previous_version = Some(previous_app);
        Ok(())
    }
}

/// Path of the chart file, treating anything not naming one as a directory
fn chart_file_path(sub_path: &str) -> String {
    if sub_path.ends_with("Chart.yaml") || sub_path.ends_with("Chart.yml") {
        return sub_path.to_string();
    }
    let dir = sub_path.trim_end_matches('/');
    if dir.is_empty() {
        CHART_FILE.to_string()
    } else {
        format!("{}/{}", dir, CHART_FILE)
    }
}

/// Read a version field, substituting a placeholder in a dry run
fn read_version(
    ctx: &mut RunContext,
    chart: &Mapping,
    key: &str,
    missing: ReleaseError,
) -> Result<String> {
    let value = match chart.get(key) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    };
    match value {
        Some(v) => Ok(v),
        None => {
            ctx.check_dry_run(missing)?;
            warn!(key, value = PLACEHOLDER_VERSION, "dry-run: using placeholder");
            Ok(PLACEHOLDER_VERSION.to_string())
        }
    }
}
