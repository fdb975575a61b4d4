//! CLI integration tests

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

const INVENTORY_CSV: &str = "\
vm_name,cluster_name,guest_os,vm_host,On/Off,mem_size_GB,num_of_cpus,storage_size-GB,used_size-GB,creation_date
web01,CLU01,RHEL 8.6,host01,On,8,4,100,40,2023-01-05
web02,CLU01,RHEL 9.2,host01,On,16,4,200,50,2023-02-11
legacy01,CLU02,RHEL 7.9,host02,Off,4,2,50,45,2023-02-20
sql01,CLU02,Windows Server 2019,host02,On,128,32,1000,600,2023-03-09
";

fn command(args: &[&str]) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_vmdash"));
    cmd.args(args)
        .env_remove("VMDASH_CONFIG")
        .env("NO_COLOR", "1");
    cmd
}

fn vmdash(args: &[&str]) -> Output {
    command(args).output().expect("Failed to execute command")
}

/// Run with `dir` as the working directory
fn vmdash_in(dir: &Path, args: &[&str]) -> Output {
    command(args)
        .current_dir(dir)
        .output()
        .expect("Failed to execute command")
}

fn write_inventory(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

/// Test that the CLI shows help
#[test]
fn test_cli_help() {
    let output = vmdash(&["--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI help should succeed");
    assert!(stdout.contains("migration planning dashboard"), "Should describe the tool");
    assert!(stdout.contains("--growth"), "Should show growth option");
    assert!(stdout.contains("--node-size"), "Should show node size option");
    assert!(stdout.contains("--config"), "Should show config option");
}

/// Test that the CLI shows version
#[test]
fn test_cli_version() {
    let output = vmdash(&["--version"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI version should succeed");
    assert!(stdout.contains("vmdash"), "Should show binary name");
}

#[test]
fn test_generates_dashboard_from_csv() {
    let dir = TempDir::new().unwrap();
    let exports = dir.path().join("exports");
    fs::create_dir(&exports).unwrap();
    let input = exports.join("fleet.csv");
    fs::write(&input, INVENTORY_CSV).unwrap();

    let output = vmdash_in(dir.path(), &[arg(&input)]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout.contains("Dashboard written to"));
    assert!(stdout.contains("Migration waves"));
    assert!(!exports.join("fleet_dashboard.html").exists());

    let report = dir.path().join("fleet_dashboard.html");
    let html = fs::read_to_string(report).unwrap();
    assert!(html.contains("sql01"));
    assert!(html.contains("dashboard-data"));
}

#[test]
fn test_explicit_output_and_options() {
    let dir = TempDir::new().unwrap();
    let input = write_inventory(&dir, "fleet.csv", INVENTORY_CSV);
    let report = dir.path().join("plan.html");

    let output = vmdash(&[
        arg(&input),
        arg(&report),
        "--growth",
        "aggressive",
        "--node-size",
        "large",
        "--title",
        "East Region Plan",
    ]);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let html = fs::read_to_string(report).unwrap();
    assert!(html.contains("<title>East Region Plan</title>"));
    assert!(html.contains(r#"<option value="aggressive" selected>"#));
    assert!(html.contains(r#"<option value="large" selected>"#));
}

#[test]
fn test_json_summary() {
    let dir = TempDir::new().unwrap();
    let input = write_inventory(&dir, "fleet.csv", INVENTORY_CSV);

    let output = vmdash_in(dir.path(), &[arg(&input), "--format", "json"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["stats"]["total_vms"], 4);
    assert_eq!(summary["stats"]["running_vms"], 3);
    assert_eq!(summary["forecast"]["years"].as_array().map(Vec::len), Some(4));
}

#[test]
fn test_config_file_sets_defaults() {
    let dir = TempDir::new().unwrap();
    let input = write_inventory(&dir, "fleet.csv", INVENTORY_CSV);
    let config = write_inventory(&dir, "vmdash.toml", "title = \"From Config\"\nnode_size = \"small\"\n");
    let report = dir.path().join("out.html");

    let output = vmdash(&[arg(&input), arg(&report), "--config", arg(&config)]);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let html = fs::read_to_string(report).unwrap();
    assert!(html.contains("<title>From Config</title>"));
    assert!(html.contains(r#"<option value="small" selected>"#));
}

#[test]
fn test_missing_input_fails() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("absent.xlsx");

    let output = vmdash_in(dir.path(), &[arg(&input)]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr.contains("input file not found"), "stderr: {stderr}");
    assert!(!dir.path().join("absent_dashboard.html").exists());
}

#[test]
fn test_missing_name_column_fails_without_output() {
    let dir = TempDir::new().unwrap();
    let input = write_inventory(&dir, "fleet.csv", "cluster,os,memory\nCLU01,RHEL 8,8\n");

    let output = vmdash_in(dir.path(), &[arg(&input)]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr.contains("vm_name"), "stderr: {stderr}");
    assert!(!dir.path().join("fleet_dashboard.html").exists());
}

#[test]
fn test_invalid_growth_is_rejected() {
    let dir = TempDir::new().unwrap();
    let input = write_inventory(&dir, "fleet.csv", INVENTORY_CSV);

    let output = vmdash_in(dir.path(), &[arg(&input), "--growth", "rapid"]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr.contains("Invalid growth scenario"), "stderr: {stderr}");
}
