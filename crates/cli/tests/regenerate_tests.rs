//! End-to-end tests for the regenerate and add-dependency commands.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const INTENT: &str = "\
project: Demo
targets:
    Base:
    Feature:
        inherit: Base
        steals:
            - Base/Assets/*.png
";

const PROJECT: &str = "\
name: Demo
packages:
    Networking:
        url: https://example.com/networking
        from: 1.0.0
targets:
    DemoBase:
        type: application
        platform: iOS
        settings:
            base:
                X: '1'
        sources:
            - Demo/COMMON
            - Demo/Base
schemes:
    DemoBase:
        build: {}
";

fn targen_cmd(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("targen").unwrap();
    cmd.current_dir(dir);
    cmd
}

fn fixture() -> TempDir {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("targets.yml"), INTENT).unwrap();
    fs::write(temp.path().join("project.yml"), PROJECT).unwrap();

    let assets = temp.path().join("Demo/Base/Assets");
    fs::create_dir_all(&assets).unwrap();
    for name in ["a.png", "b.png", "c.png"] {
        fs::write(assets.join(name), b"png").unwrap();
    }

    temp
}

fn project_value(dir: &Path) -> serde_yaml::Value {
    let text = fs::read_to_string(dir.join("project.yml")).unwrap();
    serde_yaml::from_str(&text).unwrap()
}

#[test]
fn regenerate_materializes_and_migrates() {
    let temp = fixture();

    targen_cmd(temp.path())
        .arg("regenerate")
        .assert()
        .success()
        .stderr(predicate::str::contains("DemoFeature"));

    let value = project_value(temp.path());
    let feature = &value["targets"]["DemoFeature"];
    assert_eq!(feature["type"], "application");
    assert_eq!(feature["sources"][1], "Demo/Feature");
    assert_eq!(
        feature["settings"]["base"]["INFOPLIST_FILE"],
        "Demo/Feature/Resources/Info.plist"
    );

    for name in ["a.png", "b.png", "c.png"] {
        assert!(temp.path().join("Demo/Feature/Assets").join(name).is_file());
    }

    // The intent file was stripped down to bare keys.
    let intent = fs::read_to_string(temp.path().join("targets.yml")).unwrap();
    assert_eq!(intent, "project: Demo\ntargets:\n    Base:\n    Feature:\n");
}

#[test]
fn verbose_regenerate_surfaces_tracing_diagnostics() {
    let temp = fixture();

    targen_cmd(temp.path())
        .args(["--verbose", "regenerate"])
        .assert()
        .success()
        .stderr(predicate::str::contains("regenerating project targets"));
}

#[test]
fn second_regenerate_is_a_fixed_point() {
    let temp = fixture();

    targen_cmd(temp.path()).arg("regenerate").assert().success();
    let project = fs::read_to_string(temp.path().join("project.yml")).unwrap();
    let intent = fs::read_to_string(temp.path().join("targets.yml")).unwrap();

    targen_cmd(temp.path())
        .arg("regenerate")
        .assert()
        .success()
        .stderr(predicate::str::contains("already materialized"));

    assert_eq!(
        fs::read_to_string(temp.path().join("project.yml")).unwrap(),
        project
    );
    assert_eq!(
        fs::read_to_string(temp.path().join("targets.yml")).unwrap(),
        intent
    );
}

#[test]
fn add_dependency_classifies_package_and_target() {
    let temp = fixture();

    targen_cmd(temp.path())
        .args(["add-dependency", "Networking"])
        .assert()
        .success();
    let value = project_value(temp.path());
    assert_eq!(
        value["targets"]["DemoBase"]["dependencies"][0]["package"],
        "Networking"
    );

    targen_cmd(temp.path())
        .args(["add-dependency", "Base"])
        .assert()
        .success();
    let value = project_value(temp.path());
    assert_eq!(
        value["targets"]["DemoBase"]["dependencies"][1]["target"],
        "Base"
    );
}

#[test]
fn add_dependency_with_unknown_name_fails_cleanly() {
    let temp = fixture();

    targen_cmd(temp.path())
        .args(["add-dependency", "Ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Ghost"));

    // Nothing was written.
    assert_eq!(
        fs::read_to_string(temp.path().join("project.yml")).unwrap(),
        PROJECT
    );
}

#[test]
fn regenerate_aborts_on_broken_project_document() {
    let temp = fixture();
    fs::write(temp.path().join("project.yml"), "name: Demo\n").unwrap();

    targen_cmd(temp.path())
        .arg("regenerate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("targets"));

    assert_eq!(
        fs::read_to_string(temp.path().join("targets.yml")).unwrap(),
        INTENT
    );
}
