use assert_cmd::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

fn repo_root() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .and_then(|p| p.parent())
        .expect("expected crates/<name> layout")
        .to_path_buf()
}

fn fixture(name: &str) -> PathBuf {
    let path = repo_root().join("fixtures").join(name);
    assert!(path.exists(), "fixture missing: {}", path.display());
    path
}

fn cli() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo_bin!("mirrormap-cli"));
    cmd.current_dir(repo_root()).env_remove("MIRRORMAP_LOG");
    cmd
}

fn stdout_json(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&output).expect("stdout is JSON")
}

#[test]
fn import_prints_the_tree_literal() {
    let v = stdout_json(cli().args(["import", fixture("plans.mm").to_string_lossy().as_ref()]));
    assert_eq!(v["name"], "Plans");
    let children = v["children"].as_array().expect("root children");
    let names: Vec<_> = children.iter().map(|c| c["name"].as_str().unwrap()).collect();
    assert_eq!(names, ["Work", "Home", "Travel", "Reading list"]);
    assert_eq!(children[0]["children"][1]["url"], "https://example.com/docs");
}

#[test]
fn layout_places_children_on_alternating_sides() {
    let v = stdout_json(cli().args(["layout", "--pretty", fixture("abc.json").to_string_lossy().as_ref()]));
    assert_eq!(v["width"], 960.0);
    let nodes = v["nodes"].as_array().expect("nodes");
    assert_eq!(nodes.len(), 4);
    assert_eq!(v["edges"].as_array().expect("edges").len(), 3);

    let by_label = |label: &str| nodes.iter().find(|n| n["label"] == label).expect("node present");
    assert_eq!(by_label("Root")["y"], 0.0);
    assert_eq!(by_label("A")["x"], 115.0);
    assert_eq!(by_label("A")["y"], 360.0);
    assert_eq!(by_label("B")["y"], -340.0);
    assert_eq!(by_label("C")["y"], 360.0);
}

#[test]
fn layout_reads_json_from_stdin() {
    let json = fs::read_to_string(fixture("abc.json")).expect("read fixture");
    let mut cmd = cli();
    cmd.args(["layout", "-"]);
    let output = assert_cmd::Command::from_std(cmd)
        .write_stdin(json)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let v: serde_json::Value = serde_json::from_slice(&output).expect("stdout is JSON");
    assert_eq!(v["nodes"].as_array().expect("nodes").len(), 4);
}

#[test]
fn width_flag_overrides_config_file() {
    let v = stdout_json(cli().args([
        "layout",
        "--config",
        fixture("render.json").to_string_lossy().as_ref(),
        "--width",
        "560",
        fixture("abc.json").to_string_lossy().as_ref(),
    ]));
    assert_eq!(v["width"], 560.0);
    assert_eq!(v["height"], 400.0);
    // Inner width is 560 - 80 - 80, so the right half spans 200.
    let a = v["nodes"]
        .as_array()
        .expect("nodes")
        .iter()
        .find(|n| n["label"] == "A")
        .expect("A");
    assert_eq!(a["y"], 200.0);
}

#[test]
fn render_writes_svg_to_out_file() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let out = tmp.path().join("plans.svg");

    cli()
        .args([
            "render",
            "--config",
            fixture("render.json").to_string_lossy().as_ref(),
            "--out",
            out.to_string_lossy().as_ref(),
            fixture("plans.mm").to_string_lossy().as_ref(),
        ])
        .assert()
        .success();

    let svg = fs::read_to_string(&out).expect("read svg");
    assert!(svg.starts_with("<svg "), "unexpected prefix: {}", &svg[..svg.len().min(40)]);
    assert!(svg.contains(r#"width="640" height="400""#));
    assert_eq!(svg.matches(r#"class="node""#).count(), 10);
    assert_eq!(svg.matches(r#"class="link""#).count(), 9);
    assert!(svg.contains("https://example.com/docs"));
    assert!(svg.ends_with("</svg>"));
}

#[test]
fn broken_xml_fails_with_exit_code_one() {
    let output = cli()
        .args(["import", fixture("broken.mm").to_string_lossy().as_ref()])
        .assert()
        .failure()
        .get_output()
        .clone();
    assert_eq!(output.status.code(), Some(1));
    assert!(!output.stderr.is_empty());
}

#[test]
fn unknown_flag_prints_usage_with_exit_code_two() {
    let output = cli().arg("--frobnicate").assert().failure().get_output().clone();
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("USAGE:"), "{stderr}");
}
