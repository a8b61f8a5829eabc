//! Configuration system tests
//!
//! Tests configuration loading, validation, and environment overrides

mod common;

use std::fs;
use std::path::PathBuf;

use common::sim_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

/// Test fixture for configuration testing
struct ConfigFixture {
    _temp_dir: TempDir,
    config_path: PathBuf,
}

impl ConfigFixture {
    fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        Self {
            _temp_dir: temp_dir,
            config_path,
        }
    }

    fn write_config(&self, content: &str) {
        fs::write(&self.config_path, content).unwrap();
    }

    fn path(&self) -> &str {
        self.config_path.to_str().unwrap()
    }

    fn cmd(&self) -> assert_cmd::Command {
        let mut cmd = sim_cmd();
        cmd.arg("--config").arg(self.path());
        cmd
    }
}

// ─────────────────────────────────────────────────────────────────
// Valid Configuration Tests
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_empty_config_uses_defaults() {
    let fixture = ConfigFixture::new();
    fixture.write_config("");

    fixture
        .cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("provider = \"openai\""))
        .stdout(predicate::str::contains("http://localhost:11434/v1"))
        .stdout(predicate::str::contains("context_sharing = \"none\""))
        .stdout(predicate::str::contains("level = \"warn\""));
}

#[test]
fn test_full_config() {
    let fixture = ConfigFixture::new();
    fixture.write_config(
        r#"
[model]
provider = "openai"
base_url = "https://api.example.com/v1"
api_key = "sk-test"
model = "gpt-4o-mini"
timeout_secs = 30
max_retries = 2
temperature = 0.2
max_tokens = 400

[simulation]
context_sharing = "all"

[logging]
level = "debug"
json_format = true
"#,
    );

    fixture
        .cmd()
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"));
}

#[test]
fn test_config_show_masks_api_key() {
    let fixture = ConfigFixture::new();
    fixture.write_config(
        r#"
[model]
api_key = "sk-very-secret"
"#,
    );

    fixture
        .cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("********"))
        .stdout(predicate::str::contains("sk-very-secret").not());
}

// ─────────────────────────────────────────────────────────────────
// Invalid Configuration Tests
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_malformed_toml() {
    let fixture = ConfigFixture::new();
    fixture.write_config("[model\nprovider = ");

    fixture
        .cmd()
        .args(["config", "validate"])
        .assert()
        .failure()
        .code(10)
        .stderr(predicate::str::contains("E101"));
}

#[test]
fn test_unknown_provider() {
    let fixture = ConfigFixture::new();
    fixture.write_config(
        r#"
[model]
provider = "carrier-pigeon"
"#,
    );

    fixture
        .cmd()
        .args(["config", "validate"])
        .assert()
        .failure()
        .code(10);
}

#[test]
fn test_base_url_without_scheme() {
    let fixture = ConfigFixture::new();
    fixture.write_config(
        r#"
[model]
base_url = "localhost:11434/v1"
"#,
    );

    fixture
        .cmd()
        .args(["config", "validate"])
        .assert()
        .failure()
        .code(10)
        .stderr(predicate::str::contains("http://"));
}

#[test]
fn test_temperature_out_of_range() {
    let fixture = ConfigFixture::new();
    fixture.write_config(
        r#"
[model]
temperature = 3.5
"#,
    );

    fixture.cmd().args(["config", "validate"]).assert().failure().code(10);
}

#[test]
fn test_invalid_log_level() {
    let fixture = ConfigFixture::new();
    fixture.write_config(
        r#"
[logging]
level = "chatty"
"#,
    );

    fixture
        .cmd()
        .args(["config", "validate"])
        .assert()
        .failure()
        .code(10)
        .stderr(predicate::str::contains("chatty"));
}

#[test]
fn test_broken_scenario_catalog() {
    let temp_dir = TempDir::new().unwrap();
    let catalog = temp_dir.path().join("days.toml");
    fs::write(
        &catalog,
        r#"
[[scenario]]
day = 1
title = "Day 1"
budget = -5.0
request = [{ item = "pen_box", quantity = 1 }]

[[scenario.supplier]]
name = "Harare OfficeSupplies"
delivery = "2 days"
reliability_note = "On time"
prices = [{ item = "pen_box", unit_price = 8.0 }]
"#,
    )
    .unwrap();

    let fixture = ConfigFixture::new();
    fixture.write_config(&format!(
        "[simulation]\nscenario_file = {:?}\n",
        catalog.to_str().unwrap()
    ));

    fixture
        .cmd()
        .args(["config", "validate"])
        .assert()
        .failure()
        .code(10)
        .stderr(predicate::str::contains("budget"));
}

// ─────────────────────────────────────────────────────────────────
// Environment and CLI Override Tests
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_env_overrides_file() {
    let fixture = ConfigFixture::new();
    fixture.write_config(
        r#"
[model]
model = "llama3.2:latest"
"#,
    );

    fixture
        .cmd()
        .env("PROCSIM_MODEL", "qwen2.5:7b")
        .env("PROCSIM_CONTEXT_SHARING", "mentor")
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("model = \"qwen2.5:7b\""))
        .stdout(predicate::str::contains("context_sharing = \"mentor\""));
}

#[test]
fn test_unparseable_numeric_env_is_fatal() {
    let fixture = ConfigFixture::new();
    fixture.write_config("[model]\nprovider = \"mock\"\n");

    for (var, value) in [
        ("PROCSIM_TIMEOUT_SECS", "abc"),
        ("PROCSIM_MAX_RETRIES", "-3"),
        ("PROCSIM_TEMPERATURE", "warm"),
    ] {
        fixture
            .cmd()
            .env(var, value)
            .args(["config", "show"])
            .assert()
            .failure()
            .code(10)
            .stderr(predicate::str::contains(var))
            .stdout(predicate::str::is_empty());
    }
}

#[test]
fn test_cli_overrides_env() {
    let fixture = ConfigFixture::new();
    fixture.write_config("");

    fixture
        .cmd()
        .env("PROCSIM_PROVIDER", "openai")
        .args(["--provider", "mock", "config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("provider = \"mock\""));
}

#[test]
fn test_config_path_from_env() {
    let fixture = ConfigFixture::new();
    fixture.write_config("[model]\nprovider = \"mock\"\n");

    sim_cmd()
        .env("PROCSIM_CONFIG", fixture.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("provider = \"mock\""));
}

// ─────────────────────────────────────────────────────────────────
// Config Init Tests
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_config_init_writes_loadable_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nested").join("config.toml");

    sim_cmd()
        .args(["config", "init", "--path", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration file created"));

    assert!(path.exists());

    sim_cmd()
        .args(["--config", path.to_str().unwrap(), "config", "validate"])
        .assert()
        .success();
}

#[test]
fn test_config_init_refuses_overwrite() {
    let fixture = ConfigFixture::new();
    fixture.write_config("# keep me\n");

    sim_cmd()
        .args(["config", "init", "--path", fixture.path()])
        .assert()
        .failure()
        .code(10)
        .stderr(predicate::str::contains("--force"));

    assert_eq!(fs::read_to_string(fixture.path()).unwrap(), "# keep me\n");

    sim_cmd()
        .args(["config", "init", "--path", fixture.path(), "--force"])
        .assert()
        .success();

    assert!(fs::read_to_string(fixture.path())
        .unwrap()
        .contains("[model]"));
}

#[test]
fn test_config_init_ignores_broken_config() {
    // A broken active config must not block writing a fresh one
    let fixture = ConfigFixture::new();
    fixture.write_config("not = [valid");

    let temp_dir = TempDir::new().unwrap();
    let target = temp_dir.path().join("fresh.toml");

    fixture
        .cmd()
        .args(["config", "init", "--path", target.to_str().unwrap()])
        .assert()
        .success();
}
