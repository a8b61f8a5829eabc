//! Common test utilities and fixtures
//!
//! This module provides shared test infrastructure

#![allow(dead_code)]

use std::path::PathBuf;

use assert_cmd::Command;

/// Get the path to the test fixtures directory
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

/// Get a path to a specific fixture file
pub fn fixture_path(name: &str) -> PathBuf {
    fixtures_dir().join(name)
}

/// Get the valid config fixture path
pub fn valid_config_fixture() -> PathBuf {
    fixture_path("valid_config.toml")
}

/// Get the invalid config fixture path
pub fn invalid_config_fixture() -> PathBuf {
    fixture_path("invalid_config.toml")
}

/// Get the replacement scenario catalog fixture path
pub fn scenarios_fixture() -> PathBuf {
    fixture_path("scenarios.toml")
}

/// A procurement-sim command isolated from the caller's environment
pub fn sim_cmd() -> Command {
    let mut cmd = Command::cargo_bin("procurement-sim").unwrap();
    for var in [
        "PROCSIM_CONFIG",
        "PROCSIM_PROVIDER",
        "PROCSIM_BASE_URL",
        "PROCSIM_API_KEY",
        "PROCSIM_MODEL",
        "PROCSIM_CONTEXT_SHARING",
        "PROCSIM_SCENARIO_FILE",
        "PROCSIM_LOG_LEVEL",
        "PROCSIM_LOG_FILE",
        "PROCSIM_LOG_JSON",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd.env("NO_COLOR", "1");
    cmd
}

/// A command running against the offline mock model
pub fn mock_cmd() -> Command {
    let mut cmd = sim_cmd();
    cmd.arg("--config").arg(valid_config_fixture());
    cmd
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixtures_dir_exists() {
        assert!(fixtures_dir().exists(), "Fixtures directory should exist");
    }

    #[test]
    fn test_valid_config_exists() {
        assert!(
            valid_config_fixture().exists(),
            "Valid config fixture should exist"
        );
    }

    #[test]
    fn test_invalid_config_exists() {
        assert!(
            invalid_config_fixture().exists(),
            "Invalid config fixture should exist"
        );
    }
}
