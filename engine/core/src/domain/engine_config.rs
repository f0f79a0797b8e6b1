// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Engine Configuration
//
// Where the manifest lives, where rule content is resolved from, and how
// strictly validation gates service start-up.
//
// ```yaml
// manifestPath: rules/manifest.json
// rulesRoot: rules
// gating: strict
// validateOnInit: true
// ```

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

pub const CONFIG_PATH_ENV: &str = "RULEGRAPH_CONFIG_PATH";
pub const MANIFEST_PATH_ENV: &str = "RULEGRAPH_MANIFEST_PATH";
pub const RULES_ROOT_ENV: &str = "RULEGRAPH_RULES_ROOT";
pub const GATING_ENV: &str = "RULEGRAPH_GATING";

/// Whether validation findings block `RuleService::initialize()`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GatingPolicy {
    /// Integrity errors or uncovered rules fail initialization.
    #[default]
    Strict,
    /// Findings are logged; initialization proceeds.
    Lenient,
}

impl GatingPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "strict" => Some(Self::Strict),
            "lenient" => Some(Self::Lenient),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Lenient => "lenient",
        }
    }
}

impl fmt::Display for GatingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    #[serde(default = "default_manifest_path")]
    pub manifest_path: PathBuf,

    /// Root that rule `path` locators resolve against. Defaults to the
    /// manifest's directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules_root: Option<PathBuf>,

    #[serde(default)]
    pub gating: GatingPolicy,

    #[serde(default = "default_true")]
    pub validate_on_init: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            manifest_path: default_manifest_path(),
            rules_root: None,
            gating: GatingPolicy::default(),
            validate_on_init: true,
        }
    }
}

impl EngineConfig {
    pub fn for_manifest(path: impl Into<PathBuf>) -> Self {
        Self {
            manifest_path: path.into(),
            ..Self::default()
        }
    }

    pub fn with_gating(mut self, gating: GatingPolicy) -> Self {
        self.gating = gating;
        self
    }

    pub fn with_rules_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.rules_root = Some(root.into());
        self
    }

    pub fn with_validate_on_init(mut self, validate: bool) -> Self {
        self.validate_on_init = validate;
        self
    }

    /// Explicit `rulesRoot`, else the directory holding the manifest.
    pub fn resolved_rules_root(&self) -> PathBuf {
        if let Some(root) = &self.rules_root {
            return root.clone();
        }
        match self.manifest_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    /// Load configuration from YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        Self::from_yaml_str(&content).with_context(|| format!("Failed to parse config file {:?}", path))
    }

    pub fn to_yaml_file(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        let config = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Discover configuration file using precedence order
    /// 1. RULEGRAPH_CONFIG_PATH environment variable
    /// 2. ./rulegraph.yaml (working directory)
    /// 3. ~/.rulegraph/config.yaml (user home)
    /// 4. /etc/rulegraph/config.yaml (system, Unix) or C:\ProgramData\Rulegraph\config.yaml (Windows)
    pub fn discover_config() -> Option<PathBuf> {
        Self::candidate_paths().into_iter().find(|p| p.exists())
    }

    /// Every location `discover_config` looks at, in precedence order.
    pub fn candidate_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            paths.push(PathBuf::from(path));
        }

        paths.push(PathBuf::from("./rulegraph.yaml"));

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".rulegraph").join("config.yaml"));
        }

        #[cfg(unix)]
        paths.push(PathBuf::from("/etc/rulegraph/config.yaml"));
        #[cfg(windows)]
        paths.push(PathBuf::from("C:\\ProgramData\\Rulegraph\\config.yaml"));

        paths
    }

    /// Load configuration with discovery, fallback to default
    pub fn load_or_default(cli_path: Option<PathBuf>) -> anyhow::Result<Self> {
        // Explicit path must exist and parse
        if let Some(path) = cli_path {
            tracing::info!("Loading configuration from explicit path: {:?}", path);
            let mut config = Self::from_yaml_file(&path)?;
            config.apply_env_overrides();
            return Ok(config);
        }

        let mut config = match Self::discover_config() {
            Some(config_path) => {
                tracing::info!("Loading configuration from discovered path: {:?}", config_path);
                Self::from_yaml_file(config_path)?
            }
            None => {
                tracing::debug!("No configuration file found in standard locations. Using defaults.");
                Self::default()
            }
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply `RULEGRAPH_*` environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary key lookup.
    pub fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(val) = lookup(MANIFEST_PATH_ENV) {
            tracing::info!("Environment override: {}={}", MANIFEST_PATH_ENV, val);
            self.manifest_path = PathBuf::from(val);
        }

        if let Some(val) = lookup(RULES_ROOT_ENV) {
            tracing::info!("Environment override: {}={}", RULES_ROOT_ENV, val);
            self.rules_root = Some(PathBuf::from(val));
        }

        if let Some(val) = lookup(GATING_ENV) {
            match GatingPolicy::parse(&val) {
                Some(policy) => {
                    tracing::info!("Environment override: {}={}", GATING_ENV, policy);
                    self.gating = policy;
                }
                None => {
                    tracing::warn!(
                        "Invalid value for {}: '{}'. Expected strict/lenient. Ignoring.",
                        GATING_ENV,
                        val
                    );
                }
            }
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.manifest_path.as_os_str().is_empty() {
            anyhow::bail!("manifestPath cannot be empty");
        }
        if let Some(root) = &self.rules_root {
            if root.as_os_str().is_empty() {
                anyhow::bail!("rulesRoot cannot be empty when set");
            }
        }
        Ok(())
    }
}

fn default_manifest_path() -> PathBuf {
    PathBuf::from("rules/manifest.json")
}

fn default_true() -> bool {
    true
}
