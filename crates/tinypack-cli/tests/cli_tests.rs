use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn tinypack_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("tinypack"))
}

fn write(dir: &TempDir, path: &str, content: &str) {
    let path = dir.path().join(path);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

// ============================================================================
// PROJECT INITIALIZATION TESTS
// ============================================================================

/// Test --init creates project structure
#[test]
fn test_init_creates_project() {
    let temp_dir = TempDir::new().unwrap();

    tinypack_cmd()
        .current_dir(&temp_dir)
        .arg("--init")
        .assert()
        .success()
        .stdout(predicate::str::contains("tinypack.config.json"));

    assert!(temp_dir.path().join("tinypack.config.json").exists());
    assert!(temp_dir.path().join("src/index.js").exists());
    assert!(temp_dir.path().join("src/greet.js").exists());
}

/// Test --init refuses to overwrite an existing config
#[test]
fn test_init_keeps_existing_config() {
    let temp_dir = TempDir::new().unwrap();
    write(&temp_dir, "tinypack.config.json", "{}");

    tinypack_cmd()
        .current_dir(&temp_dir)
        .arg("--init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    let config = fs::read_to_string(temp_dir.path().join("tinypack.config.json")).unwrap();
    assert_eq!(config, "{}");
}

/// Test the initialized project bundles with no further arguments
#[test]
fn test_init_then_bundle() {
    let temp_dir = TempDir::new().unwrap();

    tinypack_cmd().current_dir(&temp_dir).arg("--init").assert().success();
    tinypack_cmd()
        .current_dir(&temp_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Bundle written to"));

    let bundle = fs::read_to_string(temp_dir.path().join("dist/bundle.js")).unwrap();
    assert!(bundle.contains("\"./src/index.js\": function"));
    assert!(bundle.contains("\"./src/greet.js\": function"));
}

// ============================================================================
// CONFIGURATION TESTS
// ============================================================================

/// Test bundling driven by a config file
#[test]
fn test_bundle_with_config_file() {
    let temp_dir = TempDir::new().unwrap();
    write(
        &temp_dir,
        "tinypack.config.json",
        r#"{ "entry": "./index.js", "output": { "path": "out", "filename": "main.js" } }"#,
    );
    write(&temp_dir, "index.js", "const a = require('./a');\nconsole.log(a);\n");
    write(&temp_dir, "a.js", "module.exports = 1;\n");

    tinypack_cmd().current_dir(&temp_dir).assert().success();

    let bundle = fs::read_to_string(temp_dir.path().join("out/main.js")).unwrap();
    assert!(bundle.contains("\"./a.js\": function"));
    assert!(bundle.contains("__tinypack_require__(\"./index.js\")"));
}

/// Test YAML config passed explicitly
#[test]
fn test_bundle_with_yaml_config() {
    let temp_dir = TempDir::new().unwrap();
    write(
        &temp_dir,
        "build.yaml",
        "entry: ./app/main.js\noutput:\n  path: public\n  filename: app.js\n",
    );
    write(&temp_dir, "app/main.js", "console.log('yaml');\n");

    tinypack_cmd()
        .current_dir(&temp_dir)
        .args(["--config", "build.yaml"])
        .assert()
        .success();

    assert!(temp_dir.path().join("public/app.js").exists());
}

/// Test CLI arguments override the config file
#[test]
fn test_cli_overrides_config() {
    let temp_dir = TempDir::new().unwrap();
    write(
        &temp_dir,
        "tinypack.config.json",
        r#"{ "entry": "./missing.js" }"#,
    );
    write(&temp_dir, "main.js", "console.log('override');\n");

    tinypack_cmd()
        .current_dir(&temp_dir)
        .args(["./main.js", "--out-dir", "build", "--out-file", "b.js"])
        .assert()
        .success();

    assert!(temp_dir.path().join("build/b.js").exists());
}

/// Test --root changes where ids and outputs are resolved
#[test]
fn test_root_flag() {
    let temp_dir = TempDir::new().unwrap();
    write(&temp_dir, "project/index.js", "require('./dep');\n");
    write(&temp_dir, "project/dep.js", "module.exports = 0;\n");

    tinypack_cmd()
        .current_dir(&temp_dir)
        .args(["index.js", "--root", "project"])
        .assert()
        .success();

    let bundle = fs::read_to_string(temp_dir.path().join("project/dist/bundle.js")).unwrap();
    assert!(bundle.contains("\"./dep.js\": function"));
}

/// Test invalid config values are rejected
#[test]
fn test_invalid_config_rejected() {
    let temp_dir = TempDir::new().unwrap();
    write(
        &temp_dir,
        "tinypack.config.json",
        r#"{ "resolve": { "defaultExtension": "js" } }"#,
    );

    tinypack_cmd()
        .current_dir(&temp_dir)
        .assert()
        .failure()
        .stderr(predicate::str::contains("defaultExtension"));
}

// ============================================================================
// ERROR TESTS
// ============================================================================

/// Test a missing entry fails with a non-zero exit
#[test]
fn test_missing_entry_fails() {
    let temp_dir = TempDir::new().unwrap();

    tinypack_cmd()
        .current_dir(&temp_dir)
        .arg("nope.js")
        .assert()
        .failure()
        .stderr(predicate::str::contains("nope.js"));

    assert!(!temp_dir.path().join("dist").exists());
}

/// Test a syntax error fails the build
#[test]
fn test_syntax_error_fails() {
    let temp_dir = TempDir::new().unwrap();
    write(&temp_dir, "index.js", "require('./bad');\n");
    write(&temp_dir, "bad.js", "const = 1;\n");

    tinypack_cmd()
        .current_dir(&temp_dir)
        .arg("index.js")
        .assert()
        .failure()
        .stderr(predicate::str::contains("./bad.js"));

    assert!(!temp_dir.path().join("dist/bundle.js").exists());
}

/// Test circular dependencies fail when configured as errors
#[test]
fn test_circular_dependency_error() {
    let temp_dir = TempDir::new().unwrap();
    write(
        &temp_dir,
        "tinypack.config.json",
        r#"{ "entry": "a.js", "circularDependencies": "error" }"#,
    );
    write(&temp_dir, "a.js", "require('./b');\n");
    write(&temp_dir, "b.js", "require('./a');\n");

    tinypack_cmd()
        .current_dir(&temp_dir)
        .assert()
        .failure()
        .stderr(predicate::str::contains("./a.js -> ./b.js -> ./a.js"));
}
