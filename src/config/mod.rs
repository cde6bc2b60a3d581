//! Agent configuration: `config.yaml` plus environment helpers.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::agent::options::PermissionMode;
use crate::error::{Result, SkiffError};

/// Static per-agent configuration, read from `config.yaml` in the agent's
/// directory. Every field is optional; a missing file yields the default
/// (empty) configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub name: Option<String>,
    pub version: Option<String>,
    pub description: Option<String>,
    pub system_prompt: Option<String>,
    pub allowed_tools: Vec<String>,
    pub max_turns: Option<u32>,
    pub model: Option<String>,
    pub permission_mode: Option<PermissionMode>,
}

impl AgentConfig {
    /// Load `config.yaml` from an agent directory.
    ///
    /// A missing file is not an error; a malformed one is.
    pub fn load(config_dir: &Path) -> Result<Self> {
        let config_file = config_dir.join("config.yaml");
        if !config_file.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(&config_file)?;
        Ok(serde_yaml::from_str(&raw)?)
    }

    /// Advisory validation of the loaded configuration.
    ///
    /// Returns human-readable problems; an empty list means the config is
    /// clean. Loading never calls this; agents opt in.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if let Some(ref name) = self.name {
            let ok = !name.is_empty()
                && name
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
            if !ok {
                problems.push(format!(
                    "agent name '{name}' must contain only alphanumeric characters, hyphens, and underscores"
                ));
            }
        }

        if let Some(max_turns) = self.max_turns {
            if max_turns == 0 {
                problems.push("max_turns must be at least 1".to_string());
            }
        }

        problems
    }
}

/// Load `<config_dir>/.env` into the process environment if present.
///
/// A missing file is skipped silently, matching the optional nature of
/// per-agent env files.
pub fn load_dotenv(config_dir: &Path) {
    let env_file = config_dir.join(".env");
    if env_file.exists() {
        let _ = dotenvy::from_path(&env_file);
    }
}

/// Read a required environment variable.
///
/// Absence is a fatal [`SkiffError::Configuration`], never a silent default.
pub fn require_env(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        SkiffError::Configuration(format!("environment variable {key} is required but not set"))
    })
}

/// Read an environment variable with a fallback.
pub fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_config_file_yields_empty_config() {
        let dir = TempDir::new().unwrap();
        let config = AgentConfig::load(dir.path()).unwrap();
        assert_eq!(config, AgentConfig::default());
        assert!(config.name.is_none());
        assert!(config.allowed_tools.is_empty());
    }

    #[test]
    fn full_config_parses() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("config.yaml"),
            r#"
name: compliance-checker
version: "2.1.0"
description: Checks resources against a compliance baseline
system_prompt: You check things.
allowed_tools:
  - Read
  - Bash
max_turns: 12
model: sonnet
permission_mode: accept_edits
"#,
        )
        .unwrap();

        let config = AgentConfig::load(dir.path()).unwrap();
        assert_eq!(config.name.as_deref(), Some("compliance-checker"));
        assert_eq!(config.version.as_deref(), Some("2.1.0"));
        assert_eq!(config.allowed_tools, vec!["Read", "Bash"]);
        assert_eq!(config.max_turns, Some(12));
        assert_eq!(config.model.as_deref(), Some("sonnet"));
        assert_eq!(config.permission_mode, Some(PermissionMode::AcceptEdits));
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("config.yaml"),
            "name: a\nsomething_else: true\n",
        )
        .unwrap();

        let config = AgentConfig::load(dir.path()).unwrap();
        assert_eq!(config.name.as_deref(), Some("a"));
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("config.yaml"), "name: [unclosed").unwrap();

        let err = AgentConfig::load(dir.path()).unwrap_err();
        assert!(matches!(err, SkiffError::Yaml(_)));
    }

    #[test]
    fn require_env_missing_is_configuration_error() {
        let err = require_env("SKIFF_TEST_DOES_NOT_EXIST").unwrap_err();
        assert!(matches!(err, SkiffError::Configuration(_)));
        assert!(err.to_string().contains("SKIFF_TEST_DOES_NOT_EXIST"));
    }

    #[test]
    fn env_or_falls_back() {
        assert_eq!(env_or("SKIFF_TEST_DOES_NOT_EXIST", "fallback"), "fallback");
    }

    #[test]
    fn validate_accepts_clean_config() {
        let config = AgentConfig {
            name: Some("my-agent_01".into()),
            max_turns: Some(5),
            ..Default::default()
        };
        assert!(config.validate().is_empty());
    }

    #[test]
    fn validate_flags_bad_name_and_zero_turns() {
        let config = AgentConfig {
            name: Some("bad name!".into()),
            max_turns: Some(0),
            ..Default::default()
        };
        let problems = config.validate();
        assert_eq!(problems.len(), 2);
    }
}
