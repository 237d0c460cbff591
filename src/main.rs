use std::path::PathBuf;
use std::process;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use chart_releaser::cli::{self, UpdateArgs};
use chart_releaser::config::InitOptions;
use chart_releaser::{ui, ReleaseError};

#[derive(Parser)]
#[command(
    name = "chart-releaser",
    version,
    about = "Update Helm chart versions when a new application version is released"
)]
struct Cli {
    #[arg(short, long, global = true, help = "Enable debug logging")]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Update the chart for the latest application tag
    Update {
        #[arg(help = "Config file, or directory containing .chartreleaser.toml")]
        path: Option<PathBuf>,

        #[arg(long, help = "Run without publishing; report every error at the end")]
        dry_run: bool,

        #[arg(long, help = "Allow uncommitted changes in the working copy")]
        allow_dirty: bool,

        #[arg(long = "diff", help = "Show a diff of the changed chart files")]
        show_diff: bool,

        #[arg(long, default_value_t = 300, help = "Run deadline in seconds")]
        timeout: u64,
    },

    /// Check that a config file is valid
    Check {
        path: Option<PathBuf>,

        #[arg(long, help = "Skip checks for expected environment variables")]
        skip_env: bool,
    },

    /// Generate a new .chartreleaser.toml
    Init {
        #[arg(default_value = ".")]
        dir: PathBuf,

        #[arg(long, default_value = "", help = "Chart name (defaults to the directory name)")]
        chart: String,

        #[arg(long, default_value = "", help = "Subdirectory of the repository holding the chart")]
        path: String,

        #[arg(long, help = "Owner of the GitHub repository containing the chart")]
        github_owner: String,

        #[arg(long, help = "Name of the GitHub repository containing the chart")]
        github_repo: String,

        #[arg(long, default_value = "", help = "Commit author name")]
        author: String,

        #[arg(long, default_value = "", help = "Commit author email")]
        email: String,
    },

    /// Rewrite a config file in canonical form
    Fmt {
        path: Option<PathBuf>,

        #[arg(long, help = "Omit the header comment")]
        no_header: bool,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Update {
            path,
            dry_run,
            allow_dirty,
            show_diff,
            timeout,
        } => cli::run_update(&UpdateArgs {
            config_path: path,
            dry_run,
            allow_dirty,
            show_diff,
            timeout: Duration::from_secs(timeout),
        })?,
        Command::Check { path, skip_env } => {
            cli::run_check(path.as_deref(), skip_env)?;
        }
        Command::Init {
            dir,
            chart,
            path,
            github_owner,
            github_repo,
            author,
            email,
        } => {
            let opts = InitOptions {
                chart,
                path,
                github_owner,
                github_repo,
                author,
                email,
            };
            cli::run_init(&dir, &opts)?;
        }
        Command::Fmt { path, no_header } => {
            cli::run_fmt(path.as_deref(), no_header)?;
        }
    }
    Ok(())
}

/// A dry run that collected errors has already printed them in its summary
fn summarised_by_dry_run(err: &anyhow::Error, dry_run: bool) -> bool {
    dry_run && matches!(err.downcast_ref::<ReleaseError>(), Some(ReleaseError::Aggregate(_)))
}

fn main() {
    let args = Cli::parse();
    init_logging(args.verbose);
    let dry_run = matches!(args.command, Command::Update { dry_run: true, .. });

    if let Err(e) = run(args.command) {
        if !summarised_by_dry_run(&e, dry_run) {
            ui::display_error(&e.to_string());
        }
        process::exit(1);
    }
}
