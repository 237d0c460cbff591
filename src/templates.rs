//! Text templates for branch names, commit messages and pull requests.
//!
//! Templates use minijinja syntax and see the run context as nested
//! objects, e.g. `bump {{ chart.name }} to {{ chart.new_version }}`.
//! Undefined values are errors rather than empty output.

use minijinja::{context, Environment, UndefinedBehavior};
use serde::Serialize;

use crate::context::RunContext;
use crate::domain::Version;
use crate::error::{ReleaseError, Result};

pub const DEFAULT_UPDATE_COMMIT_MESSAGE: &str =
    "[{{ chart.name }}] bump chart to {{ chart.new_version }} for new app version {{ app.new_version }}";

pub const DEFAULT_BRANCH_NAME: &str = "chartreleaser/{{ chart.name }}/{{ chart.new_version }}";

pub const DEFAULT_BASE_BRANCH: &str = "master";

pub const DEFAULT_PULL_REQUEST_TITLE: &str =
    "[{{ chart.name }}] bump chart to {{ chart.new_version }} for new app version {{ app.new_version }}";

pub const DEFAULT_PULL_REQUEST_BODY: &str = "\
Bumps chart `{{ chart.name }}` from {{ chart.previous_version }} to {{ chart.new_version }}.

The application version changed from {{ app.previous_version }} to {{ app.new_version }}\
{% if git.tag %} (tag `{{ git.tag }}`){% endif %}.

---
This pull request was opened by chart-releaser.
";

#[derive(Debug, Serialize)]
struct ChartView<'a> {
    name: &'a str,
    path: &'a str,
    file: &'a str,
    new_version: String,
    previous_version: String,
}

#[derive(Debug, Serialize)]
struct AppView {
    new_version: String,
    previous_version: String,
}

#[derive(Debug, Serialize)]
struct GitView<'a> {
    tag: &'a str,
    #[serde(rename = "ref")]
    reference: &'a str,
    base: &'a str,
}

#[derive(Debug, Serialize)]
struct RepositoryView<'a> {
    #[serde(rename = "type")]
    kind: String,
    owner: &'a str,
    name: &'a str,
}

#[derive(Debug, Serialize)]
struct AuthorView<'a> {
    name: &'a str,
    email: &'a str,
}

fn version_string(version: Option<&Version>) -> String {
    version.map(ToString::to_string).unwrap_or_default()
}

fn environment() -> Environment<'static> {
    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env.set_keep_trailing_newline(true);
    env
}

/// Render template `name` against the run context
pub fn render(ctx: &RunContext, name: &str, template: &str) -> Result<String> {
    let values = context! {
        chart => ChartView {
            name: &ctx.chart.name,
            path: &ctx.chart.sub_path,
            file: &ctx.chart.file.path,
            new_version: version_string(ctx.chart.new_version.as_ref()),
            previous_version: version_string(ctx.chart.previous_version.as_ref()),
        },
        app => AppView {
            new_version: version_string(ctx.app.new_version.as_ref()),
            previous_version: version_string(ctx.app.previous_version.as_ref()),
        },
        git => GitView {
            tag: &ctx.git.tag,
            reference: &ctx.git.reference,
            base: &ctx.git.base,
        },
        repository => RepositoryView {
            kind: ctx.repository.kind.map(|k| k.to_string()).unwrap_or_default(),
            owner: &ctx.repository.owner,
            name: &ctx.repository.name,
        },
        author => AuthorView {
            name: &ctx.author.name,
            email: &ctx.author.email,
        },
        dry_run => ctx.dry_run,
    };

    environment()
        .render_str(template, values)
        .map_err(|e| ReleaseError::template(format!("{}: {}", name, e)))
}
