// tests/integration_test.rs
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn chart_releaser(args: &[&str], dir: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_chart-releaser"))
        .args(args)
        .current_dir(dir)
        .env_remove("GITHUB_TOKEN")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute chart-releaser")
}

#[test]
fn test_help() {
    let dir = TempDir::new().unwrap();
    let output = chart_releaser(&["--help"], dir.path());

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("chart-releaser"));
    for command in ["update", "check", "init", "fmt"] {
        assert!(stdout.contains(command), "help is missing '{}'", command);
    }
}

#[test]
fn test_version() {
    let dir = TempDir::new().unwrap();
    let output = chart_releaser(&["--version"], dir.path());

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_init_then_check() {
    let dir = TempDir::new().unwrap();
    let init = chart_releaser(
        &[
            "init",
            "--github-owner",
            "acme",
            "--github-repo",
            "charts",
            "--chart",
            "app",
            "--author",
            "Chart Bot",
            "--email",
            "bot@example.com",
        ],
        dir.path(),
    );
    assert!(init.status.success(), "{:?}", init);
    assert!(dir.path().join(".chartreleaser.toml").is_file());

    let check = chart_releaser(&["check", "--skip-env"], dir.path());
    assert!(check.status.success(), "{:?}", check);

    // The token is required unless env checks are skipped
    let check_env = chart_releaser(&["check"], dir.path());
    assert!(!check_env.status.success());
    let stderr = String::from_utf8(check_env.stderr).unwrap();
    assert!(stderr.contains("GITHUB_TOKEN"));

    let again = chart_releaser(
        &["init", "--github-owner", "acme", "--github-repo", "charts"],
        dir.path(),
    );
    assert!(!again.status.success());
}

#[test]
fn test_fmt_rewrites_config() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(".chartreleaser.toml");
    fs::write(
        &path,
        "# my comment\nversion = \"v1\"\n[chart]\nrepo = \"acme/charts\"\nname = \"app\"\n",
    )
    .unwrap();

    let output = chart_releaser(&["fmt", "--no-header"], dir.path());
    assert!(output.status.success(), "{:?}", output);

    let formatted = fs::read_to_string(&path).unwrap();
    assert!(!formatted.contains("my comment"));
    assert!(formatted.starts_with("version = \"v1\""));
}

#[test]
fn test_update_without_config_fails() {
    let dir = TempDir::new().unwrap();
    let output = chart_releaser(&["update", "--dry-run", "missing.toml"], dir.path());
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("no configuration file found"));
}
