//! End-to-end integration tests for murmur-cli
//!
//! These build and run the binary, so they are gated behind the
//! `integration` feature flag. Run with:
//!
//! ```sh
//! cargo test -p murmur-cli --features integration
//! ```

#![cfg(feature = "integration")]

use std::process::Command;

use tempfile::TempDir;

fn murmur(project_dir: &TempDir, args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_murmur"))
        .args(args)
        .env("MURMUR_PROJECT_CONFIG_DIR", project_dir.path())
        .env("XDG_CONFIG_HOME", project_dir.path().join("xdg"))
        .output()
        .expect("Failed to run murmur")
}

/// Test that murmur --help lists the subcommands
#[test]
fn murmur_help_works() {
    let dir = TempDir::new().unwrap();
    let output = murmur(&dir, &["--help"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("plugin"));
    assert!(stdout.contains("config"));
}

/// Test that config show works without any config file
#[test]
fn murmur_config_show_works_without_config() {
    let dir = TempDir::new().unwrap();
    let output = murmur(&dir, &["config", "show"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("[host]"));
    assert!(stdout.contains("voice_distance = 48.0"));
    assert!(stdout.contains("[plugins]"));
}

/// Test that the project config layer is picked up
#[test]
fn murmur_config_show_reads_project_config() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("config.toml"), "[host]\nname = \"paper\"\n").unwrap();

    let output = murmur(&dir, &["config", "show"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("name = \"paper\""));
}

/// Test that an empty plugin directory yields an empty event table
#[test]
fn murmur_plugin_events_json_without_plugins() {
    let dir = TempDir::new().unwrap();
    let plugins = dir.path().join("plugins");
    std::fs::write(
        dir.path().join("config.toml"),
        format!(
            "[plugins]\nuser_dir = {:?}\nproject_dir = {:?}\n",
            plugins.join("user"),
            plugins.join("project")
        ),
    )
    .unwrap();

    let output = murmur(&dir, &["plugin", "events", "--json"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim(), "[]");
}
