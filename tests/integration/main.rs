//! Integration tests for Strata
//!
//! These tests drive the CLI end to end: manifest in, JSON out.

use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

const MANIFEST: &str = r#"{
    "units": [
        {
            "path": "lib/main.dart",
            "isEntryPoint": true,
            "declarations": [
                { "uri": "dart:io" },
                { "uri": "package:shop/app/app.dart" }
            ]
        },
        {
            "path": "lib/app/app.dart",
            "declarations": [
                { "uri": "../screens/home.dart" },
                { "uri": "package:flutter/material.dart" }
            ]
        },
        {
            "path": "lib/screens/home.dart",
            "declarations": [
                { "uri": "../models/user.dart" },
                { "uri": "../assets/logo.png" }
            ]
        },
        { "path": "lib/models/user.dart" }
    ]
}"#;

const CYCLIC_MANIFEST: &str = r#"{
    "analyzedFilePaths": ["lib/a.dart", "lib/b.dart"],
    "units": [
        { "path": "lib/a.dart", "declarations": [{ "uri": "b.dart" }, { "uri": "c.dart" }] },
        { "path": "lib/b.dart", "declarations": [{ "uri": "a.dart" }] },
        { "path": "lib/c.dart" }
    ]
}"#;

fn project(manifest: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("strata.toml"), "[project]\nname = \"shop\"\n").unwrap();
    std::fs::write(dir.path().join("manifest.json"), manifest).unwrap();
    dir
}

fn strata(root: &Path, args: &[&str]) -> Output {
    strata_in(root, root, args)
}

fn strata_in(cwd: &Path, root: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_strata"))
        .current_dir(cwd)
        .arg("--root")
        .arg(root)
        .args(args)
        .output()
        .expect("Failed to execute strata")
}

fn json(output: &Output) -> serde_json::Value {
    assert!(
        output.status.success(),
        "strata failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout is not JSON")
}

/// Test that the CLI can be invoked
#[test]
fn test_cli_invocation() {
    let output = Command::new(env!("CARGO_BIN_EXE_strata"))
        .arg("--help")
        .output()
        .expect("Failed to execute strata");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Dependency layering and folder layout analysis"));
    assert!(stdout.contains("analyze"));
    assert!(stdout.contains("layout"));
}

#[test]
fn test_analyze_layers_resolved_chain() {
    let dir = project(MANIFEST);
    let report = json(&strata(dir.path(), &["analyze", "--input", "manifest.json"]));

    assert_eq!(report["edgeCount"], 3);
    assert_eq!(report["layerCount"], 4);
    assert_eq!(report["layers"]["lib/main.dart"], 1);
    assert_eq!(report["layers"]["lib/models/user.dart"], 4);
    assert_eq!(report["dependencyGraph"]["lib/app/app.dart"][0], "lib/screens/home.dart");
    assert_eq!(report["issues"].as_array().unwrap().len(), 0);
}

#[test]
fn test_analyze_reports_cycles_and_filters() {
    let dir = project(CYCLIC_MANIFEST);
    let report = json(&strata(dir.path(), &["analyze", "--input", "manifest.json"]));

    assert_eq!(report["edgeCount"], 2);
    assert_eq!(report["layerCount"], 0);
    assert!(report["layers"].as_object().unwrap().is_empty());
    assert_eq!(report["dependencyGraph"]["lib/a.dart"].as_array().unwrap().len(), 1);

    let issues = report["issues"].as_array().unwrap();
    assert_eq!(issues.len(), 2);
    assert_eq!(issues[0]["type"], "cyclicDependency");
    assert_eq!(issues[0]["filePath"], "lib/a.dart");
}

#[test]
fn test_layout_writes_output_file() {
    let dir = project(MANIFEST);
    let output = strata(
        dir.path(),
        &["layout", "--input", "manifest.json", "--output", "layout.json"],
    );
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let contents = std::fs::read_to_string(dir.path().join("layout.json")).unwrap();
    let layout: serde_json::Value = serde_json::from_str(&contents).unwrap();

    let folders = layout["folders"].as_array().unwrap();
    let order = layout["folderOrder"].as_array().unwrap();
    assert_eq!(folders.len(), order.len());
    assert_eq!(layout["fileEdges"].as_array().unwrap().len(), 3);
    for edge in layout["folderEdges"].as_array().unwrap() {
        assert_eq!(edge["kind"], "normal");
    }
}

#[test]
fn test_upward_issues_from_config() {
    let dir = project(
        r#"{
            "units": [
                { "path": "lib/main.dart" },
                { "path": "lib/app/app.dart", "declarations": [{ "uri": "../main.dart" }] }
            ]
        }"#,
    );
    std::fs::write(
        dir.path().join("custom.toml"),
        "[project]\nname = \"shop\"\n\n[layout]\nupward_issues = true\n",
    )
    .unwrap();
    let config = dir.path().join("custom.toml");

    let report = json(&strata(
        dir.path(),
        &["--config", config.to_str().unwrap(), "analyze", "--input", "manifest.json"],
    ));

    let kinds: Vec<&str> = report["issues"]
        .as_array()
        .unwrap()
        .iter()
        .map(|issue| issue["type"].as_str().unwrap())
        .collect();
    assert_eq!(kinds, vec!["wrongFolderLayer", "wrongLayer"]);
}

#[test]
fn test_missing_manifest_fails() {
    let dir = TempDir::new().unwrap();
    let output = strata(dir.path(), &["analyze", "--input", "nope.json"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("failed to read manifest"));
}

#[test]
fn test_input_and_output_resolve_from_working_directory() {
    let root = project("{ \"units\": [] }");
    let cwd = TempDir::new().unwrap();
    std::fs::write(cwd.path().join("manifest.json"), MANIFEST).unwrap();

    let output = strata_in(
        cwd.path(),
        root.path(),
        &["analyze", "--input", "manifest.json", "--output", "report.json"],
    );
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    // the project's own manifest is empty; the cwd one has three edges
    let contents = std::fs::read_to_string(cwd.path().join("report.json")).unwrap();
    let report: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(report["edgeCount"], 3);
    assert!(!root.path().join("report.json").exists());
}
