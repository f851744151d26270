use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SkmError};

pub const DEFAULT_REGISTRY_URL: &str =
    "https://raw.githubusercontent.com/jarero321/claude-skills/main/registry.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub registry: RegistryConfig,
    #[serde(default)]
    pub paths: PathsConfig,
}

impl Config {
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let mut config = Self::default();

        let explicit = explicit_path
            .map(PathBuf::from)
            .or_else(|| std::env::var("SKM_CONFIG").ok().map(PathBuf::from));

        if let Some(path) = explicit {
            if let Some(patch) = Self::load_patch(&path)? {
                config.merge_patch(patch);
            }
        } else if let Some(global) = Self::load_global()? {
            config.merge_patch(global);
        }

        config.apply_env_overrides()?;

        Ok(config)
    }

    fn load_global() -> Result<Option<ConfigPatch>> {
        let Some(dir) = dirs::config_dir() else {
            return Ok(None);
        };
        Self::load_patch(&dir.join("skm/config.toml"))
    }

    fn load_patch(path: &Path) -> Result<Option<ConfigPatch>> {
        if !path.exists() {
            return Ok(None);
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|err| SkmError::Config(format!("read config {}: {err}", path.display())))?;
        let patch = toml::from_str(&raw)
            .map_err(|err| SkmError::Config(format!("parse config {}: {err}", path.display())))?;
        Ok(Some(patch))
    }

    fn merge_patch(&mut self, patch: ConfigPatch) {
        if let Some(patch) = patch.registry {
            self.registry.merge(patch);
        }
        if let Some(patch) = patch.paths {
            self.paths.merge(patch);
        }
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Some(value) = env_string("SKM_REGISTRY_URL") {
            self.registry.url = value;
        }
        if let Some(value) = env_u64("SKM_REGISTRY_TIMEOUT_SECS")? {
            self.registry.timeout_secs = value;
        }
        if let Some(value) = env_string("SKM_CLAUDE_DIR") {
            self.paths.claude_dir = Some(PathBuf::from(value));
        }
        if let Some(value) = env_string("SKM_SKILLS_DIR") {
            self.paths.skills_dir = Some(PathBuf::from(value));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    #[serde(default = "default_registry_url")]
    pub url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            url: default_registry_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl RegistryConfig {
    fn merge(&mut self, patch: RegistryPatch) {
        if let Some(value) = patch.url {
            self.url = value;
        }
        if let Some(value) = patch.timeout_secs {
            self.timeout_secs = value;
        }
    }
}

/// Filesystem locations. Unset entries derive from `claude_dir`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default)]
    pub claude_dir: Option<PathBuf>,
    #[serde(default)]
    pub skills_dir: Option<PathBuf>,
    #[serde(default)]
    pub mcp_dir: Option<PathBuf>,
    #[serde(default)]
    pub plugin_dir: Option<PathBuf>,
    #[serde(default)]
    pub settings_file: Option<PathBuf>,
}

impl PathsConfig {
    fn merge(&mut self, patch: PathsPatch) {
        if let Some(value) = patch.claude_dir {
            self.claude_dir = Some(value);
        }
        if let Some(value) = patch.skills_dir {
            self.skills_dir = Some(value);
        }
        if let Some(value) = patch.mcp_dir {
            self.mcp_dir = Some(value);
        }
        if let Some(value) = patch.plugin_dir {
            self.plugin_dir = Some(value);
        }
        if let Some(value) = patch.settings_file {
            self.settings_file = Some(value);
        }
    }

    /// Resolve every location, falling back to `~/.claude` for the base.
    /// Relative overrides are anchored at the current directory.
    pub fn resolve(&self) -> Result<ResolvedPaths> {
        let claude_dir = match &self.claude_dir {
            Some(dir) => absolute_path(dir)?,
            None => dirs::home_dir()
                .ok_or_else(|| SkmError::Config("home directory not found".to_string()))?
                .join(".claude"),
        };
        let defaults = ResolvedPaths::under(&claude_dir);
        let pick = |custom: &Option<PathBuf>, default: PathBuf| -> Result<PathBuf> {
            custom.as_deref().map_or(Ok(default), absolute_path)
        };
        Ok(ResolvedPaths {
            skills_dir: pick(&self.skills_dir, defaults.skills_dir)?,
            mcp_dir: pick(&self.mcp_dir, defaults.mcp_dir)?,
            plugin_dir: pick(&self.plugin_dir, defaults.plugin_dir)?,
            settings_file: pick(&self.settings_file, defaults.settings_file)?,
            claude_dir,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    pub claude_dir: PathBuf,
    pub skills_dir: PathBuf,
    pub mcp_dir: PathBuf,
    pub plugin_dir: PathBuf,
    pub settings_file: PathBuf,
}

impl ResolvedPaths {
    /// Lay every location out under a single root.
    #[must_use]
    pub fn under(claude_dir: &Path) -> Self {
        Self {
            claude_dir: claude_dir.to_path_buf(),
            skills_dir: claude_dir.join("skills"),
            mcp_dir: claude_dir.join("mcp-servers"),
            plugin_dir: claude_dir.join("plugins"),
            settings_file: claude_dir.join("settings.json"),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigPatch {
    pub registry: Option<RegistryPatch>,
    pub paths: Option<PathsPatch>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RegistryPatch {
    pub url: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct PathsPatch {
    pub claude_dir: Option<PathBuf>,
    pub skills_dir: Option<PathBuf>,
    pub mcp_dir: Option<PathBuf>,
    pub plugin_dir: Option<PathBuf>,
    pub settings_file: Option<PathBuf>,
}

fn default_registry_url() -> String {
    DEFAULT_REGISTRY_URL.to_string()
}

const fn default_timeout_secs() -> u64 {
    30
}

fn expand_home(path: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    path.to_path_buf()
}

fn absolute_path(path: &Path) -> Result<PathBuf> {
    let expanded = expand_home(path);
    std::path::absolute(&expanded).map_err(|err| {
        SkmError::Config(format!("cannot resolve {}: {err}", expanded.display()))
    })
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn env_u64(key: &str) -> Result<Option<u64>> {
    match std::env::var(key) {
        Ok(value) => value
            .parse::<u64>()
            .map(Some)
            .map_err(|err| SkmError::Config(format!("invalid {key} value {value}: {err}"))),
        Err(_) => Ok(None),
    }
}
