use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

/// `ecli` with an isolated home and working directory. The API URL points at
/// a closed port so nothing here can reach a real service.
fn ecli_cmd(home: &Path, cwd: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("ecli"));
    cmd.env("HOME", home)
        .env("USERPROFILE", home)
        .env("ECLI_API_URL", "http://127.0.0.1:9")
        .env_remove("RUST_LOG")
        .current_dir(cwd);
    cmd
}

fn initialized() -> (TempDir, TempDir) {
    let home = TempDir::new().expect("home");
    let cwd = TempDir::new().expect("cwd");
    ecli_cmd(home.path(), cwd.path()).arg("init").assert().success();
    (home, cwd)
}

#[test]
fn init_writes_default_config_once() {
    let home = TempDir::new().expect("home");
    let cwd = TempDir::new().expect("cwd");

    ecli_cmd(home.path(), cwd.path())
        .arg("init")
        .assert()
        .success()
        .stdout(contains("Wrote default config"));

    let path = home.path().join(".ecli").join("config.json");
    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).expect("config written")).expect("json");
    assert!(written["apiUrl"].as_str().is_some_and(|u| u.starts_with("https://")));

    fs::write(&path, r#"{ "apiUrl": "http://custom.test" }"#).expect("edit config");
    ecli_cmd(home.path(), cwd.path())
        .arg("init")
        .assert()
        .success()
        .stdout(contains("already present").and(contains("http://custom.test")));
}

#[test]
fn commands_fail_without_config() {
    let home = TempDir::new().expect("home");
    let cwd = TempDir::new().expect("cwd");

    ecli_cmd(home.path(), cwd.path())
        .arg("sync")
        .assert()
        .code(1)
        .stderr(contains("ecli init"));
}

#[test]
fn sync_fails_when_components_dir_is_missing() {
    let (home, cwd) = initialized();

    ecli_cmd(home.path(), cwd.path())
        .arg("sync")
        .assert()
        .code(1)
        .stderr(contains("components directory not found"));
}

#[test]
fn sync_with_no_components_has_nothing_to_do() {
    let (home, cwd) = initialized();
    fs::create_dir(cwd.path().join("Components")).expect("components dir");

    ecli_cmd(home.path(), cwd.path())
        .args(["sync", "--dry-run"])
        .assert()
        .code(3)
        .stdout(contains("nothing to do"));
    assert!(!cwd.path().join("Components").join(".ecli-state.json").exists());
}

#[test]
fn status_on_empty_root_lists_nothing() {
    let (home, cwd) = initialized();
    let root = cwd.path().join("elsewhere");
    fs::create_dir(&root).expect("root");

    ecli_cmd(home.path(), cwd.path())
        .args(["status", "--components-dir"])
        .arg(&root)
        .assert()
        .success()
        .stdout(contains("No components found"));
}

#[test]
fn component_add_scaffolds_a_valid_component() {
    let (home, cwd) = initialized();

    ecli_cmd(home.path(), cwd.path())
        .args(["component", "add", "flux-dev", "--type", "comfy_workflow"])
        .assert()
        .success()
        .stdout(contains("Created comfy_workflow component 'flux-dev'"));

    let dir = cwd.path().join("Components").join("flux-dev");
    assert!(dir.join("ref").is_dir());
    assert!(dir.join("workflow.json").is_file());
    assert!(dir.join("credits.js").is_file());

    ecli_cmd(home.path(), cwd.path())
        .args(["validate", "flux-dev", "--type", "comfy_workflow"])
        .assert()
        .success()
        .stdout(contains("is a valid comfy_workflow component"));
}

#[test]
fn component_add_refuses_existing_directory() {
    let (home, cwd) = initialized();
    ecli_cmd(home.path(), cwd.path())
        .args(["component", "add", "upscaler"])
        .assert()
        .success();

    ecli_cmd(home.path(), cwd.path())
        .args(["component", "add", "upscaler"])
        .assert()
        .code(1)
        .stderr(contains("already exists"));
}

#[test]
fn component_remove_deletes_existing_directory() {
    let (home, cwd) = initialized();
    ecli_cmd(home.path(), cwd.path())
        .args(["component", "add", "retired", "--type", "fetch_api"])
        .assert()
        .success();
    let dir = cwd.path().join("Components").join("retired");
    assert!(dir.is_dir());

    ecli_cmd(home.path(), cwd.path())
        .args(["component", "remove", "retired"])
        .assert()
        .success()
        .stdout(contains("Removed component 'retired'"));
    assert!(!dir.exists());
}

#[test]
fn component_remove_of_missing_component_fails() {
    let (home, cwd) = initialized();
    fs::create_dir(cwd.path().join("Components")).expect("components dir");

    ecli_cmd(home.path(), cwd.path())
        .args(["component", "remove", "ghost"])
        .assert()
        .code(1)
        .stderr(contains("component 'ghost' not found"));
}

#[test]
fn apply_rejects_invalid_names_before_contacting_the_service() {
    let (home, cwd) = initialized();
    fs::create_dir(cwd.path().join("Components")).expect("components dir");

    ecli_cmd(home.path(), cwd.path())
        .args(["apply", "../other"])
        .assert()
        .code(1)
        .stderr(contains("invalid component name").and(contains("request failed").not()));
}

#[test]
fn component_add_rejects_bad_names() {
    let (home, cwd) = initialized();

    ecli_cmd(home.path(), cwd.path())
        .args(["component", "add", "Not_Valid"])
        .assert()
        .code(1)
        .stderr(contains("[a-z0-9-]+"));
    assert!(!cwd.path().join("Components").join("Not_Valid").exists());
}

#[test]
fn validate_reports_every_problem() {
    let (home, cwd) = initialized();
    let dir = cwd.path().join("Components").join("image-api");
    fs::create_dir_all(&dir).expect("component dir");
    fs::write(dir.join("form.json"), r#"{ "main": [] }"#).expect("form");
    fs::write(dir.join("credits.js"), "return 1").expect("credits");

    ecli_cmd(home.path(), cwd.path())
        .args(["validate", "image-api", "--type", "fetch-api"])
        .assert()
        .code(2)
        .stdout(contains("form.json").and(contains("api.json is required")));
}

#[test]
fn validate_unknown_component_is_an_error() {
    let (home, cwd) = initialized();
    fs::create_dir(cwd.path().join("Components")).expect("components dir");

    ecli_cmd(home.path(), cwd.path())
        .args(["validate", "ghost", "--type", "basic"])
        .assert()
        .code(1)
        .stderr(contains("no component directory 'ghost'"));
}

#[test]
fn unknown_type_is_rejected_by_argument_parsing() {
    let (home, cwd) = initialized();

    ecli_cmd(home.path(), cwd.path())
        .args(["component", "add", "x", "--type", "lambda"])
        .assert()
        .failure()
        .stderr(contains("unknown component type 'lambda'"));
}
