//! End-to-end CLI tests: exit codes, directory mirroring, flags.

#![allow(clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;

fn dtsdown() -> Command {
    Command::cargo_bin("dtsdown").unwrap()
}

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

#[test]
fn test_missing_arguments_is_a_usage_error() {
    dtsdown().assert().failure().code(2);
}

#[test]
fn test_missing_source_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    dtsdown()
        .arg(dir.path().join("does-not-exist"))
        .arg(dir.path().join("out"))
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("source directory"));
}

#[test]
fn test_malformed_target_version_is_a_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    write_file(&dir.path().join("src/a.d.ts"), "export {};\n");
    dtsdown()
        .arg(dir.path().join("src"))
        .arg(dir.path().join("out"))
        .args(["--target", "banana"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("invalid target version"));
}

#[test]
fn test_mirrors_directory_structure() {
    let dir = tempfile::tempdir().unwrap();
    write_file(
        &dir.path().join("src/test.d.ts"),
        "export class C {\n    get p(): number;\n}\n",
    );
    write_file(
        &dir.path().join("src/sub/inner.d.ts"),
        "export * as rex from \"./m\";\n",
    );
    write_file(&dir.path().join("src/node_modules/dep.d.ts"), "export {};\n");

    dtsdown()
        .arg(dir.path().join("src"))
        .arg(dir.path().join("out"))
        .assert()
        .success();

    let top = fs::read_to_string(dir.path().join("out/test.d.ts")).unwrap();
    assert_eq!(top, "export class C {\n    readonly p: number;\n}\n");
    let inner = fs::read_to_string(dir.path().join("out/sub/inner.d.ts")).unwrap();
    assert_eq!(
        inner,
        "import * as rex_1 from \"./m\";\nexport { rex_1 as rex };\n"
    );
    assert!(!dir.path().join("out/node_modules").exists());
}

#[test]
fn test_existing_output_is_overwritten() {
    let dir = tempfile::tempdir().unwrap();
    write_file(&dir.path().join("src/a.d.ts"), "export declare const x: number;\n");
    write_file(&dir.path().join("out/a.d.ts"), "stale content\n");

    dtsdown()
        .arg(dir.path().join("src"))
        .arg(dir.path().join("out"))
        .assert()
        .success();

    let out = fs::read_to_string(dir.path().join("out/a.d.ts")).unwrap();
    assert_eq!(out, "export declare const x: number;\n");
}

#[test]
fn test_target_flag_keeps_newer_syntax() {
    let dir = tempfile::tempdir().unwrap();
    write_file(
        &dir.path().join("src/a.d.ts"),
        "export class C {\n    get p(): number;\n}\n",
    );

    dtsdown()
        .arg(dir.path().join("src"))
        .arg(dir.path().join("out"))
        .args(["--target", "3.6"])
        .assert()
        .success();

    let out = fs::read_to_string(dir.path().join("out/a.d.ts")).unwrap();
    assert_eq!(out, "export class C {\n    get p(): number;\n}\n");
}

#[test]
fn test_config_file_supplies_default_target() {
    let dir = tempfile::tempdir().unwrap();
    write_file(&dir.path().join("src/.dtsdown.toml"), "[dtsdown]\ntarget = \"3.6\"\n");
    write_file(
        &dir.path().join("src/a.d.ts"),
        "export class C {\n    get p(): number;\n}\n",
    );

    dtsdown()
        .arg(dir.path().join("src"))
        .arg(dir.path().join("out"))
        .assert()
        .success();

    let out = fs::read_to_string(dir.path().join("out/a.d.ts")).unwrap();
    assert_eq!(out, "export class C {\n    get p(): number;\n}\n");
}

#[test]
fn test_parse_errors_are_reported_but_do_not_stop_the_run() {
    let dir = tempfile::tempdir().unwrap();
    write_file(&dir.path().join("src/good.d.ts"), "export declare const x: number;\n");
    write_file(&dir.path().join("src/bad.d.ts"), "export = Foo;\n");

    dtsdown()
        .arg(dir.path().join("src"))
        .arg(dir.path().join("out"))
        .assert()
        .success()
        .stdout(predicate::str::contains("skipped"));

    assert!(dir.path().join("out/good.d.ts").exists());
    assert!(!dir.path().join("out/bad.d.ts").exists());
}

#[test]
fn test_run_with_nothing_but_errors_exits_nonzero() {
    let dir = tempfile::tempdir().unwrap();
    write_file(&dir.path().join("src/bad.d.ts"), "export = Foo;\n");

    dtsdown()
        .arg(dir.path().join("src"))
        .arg(dir.path().join("out"))
        .assert()
        .failure()
        .code(1);
}

#[test]
fn test_json_summary() {
    let dir = tempfile::tempdir().unwrap();
    write_file(
        &dir.path().join("src/a.d.ts"),
        "export class C {\n    get p(): number;\n}\n",
    );

    dtsdown()
        .arg(dir.path().join("src"))
        .arg(dir.path().join("out"))
        .arg("--json")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"files_written\": 1"))
        .stdout(predicate::str::contains("\"target\": \"3.4.0\""))
        .stdout(predicate::str::contains("accessor-get"));
}

#[test]
fn test_stats_table_lists_fired_rules() {
    let dir = tempfile::tempdir().unwrap();
    write_file(
        &dir.path().join("src/a.d.ts"),
        "export class C {\n    get p(): number;\n}\n",
    );

    dtsdown()
        .arg(dir.path().join("src"))
        .arg(dir.path().join("out"))
        .arg("--stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("accessor-get"));
}

#[test]
fn test_exclude_flag_skips_folders() {
    let dir = tempfile::tempdir().unwrap();
    write_file(&dir.path().join("src/keep.d.ts"), "export {};\n");
    write_file(&dir.path().join("src/vendor/skip.d.ts"), "export {};\n");

    dtsdown()
        .arg(dir.path().join("src"))
        .arg(dir.path().join("out"))
        .args(["--exclude", "vendor"])
        .assert()
        .success();

    assert!(dir.path().join("out/keep.d.ts").exists());
    assert!(!dir.path().join("out/vendor").exists());
}

#[test]
fn test_duplicate_directives_collapse_in_output() {
    let dir = tempfile::tempdir().unwrap();
    write_file(
        &dir.path().join("src/a.d.ts"),
        "/// <reference types=\"node\" />\n/// <reference types=\"node\" />\nexport declare const x: number;\n",
    );

    dtsdown()
        .arg(dir.path().join("src"))
        .arg(dir.path().join("out"))
        .assert()
        .success();

    let out = fs::read_to_string(dir.path().join("out/a.d.ts")).unwrap();
    assert_eq!(
        out,
        "/// <reference types=\"node\" />\nexport declare const x: number;\n"
    );
}
