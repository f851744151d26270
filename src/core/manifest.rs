//! Manifest schemas.
//!
//! Three overlapping views of a skill are kept as separate types:
//! [`SkillManifest`] is the registry entry, [`InstalledSkill`] is the local
//! install record written next to the skill, and
//! [`SkillFrontmatter`](crate::core::frontmatter::SkillFrontmatter) is what
//! the skill declares about itself in `SKILL.md`.

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Version recorded for skills installed straight from a repository URL.
pub const CUSTOM_VERSION: &str = "custom";

/// Registry entry for a skill.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SkillManifest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub version: String,
    #[serde(default)]
    pub author: String,
    pub repository: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    /// Directory inside `repository` holding the skill (monorepo installs).
    #[serde(default, rename = "subPath", skip_serializing_if = "Option::is_none")]
    pub sub_path: Option<String>,
}

impl SkillManifest {
    /// Synthesize a manifest for a repository that is not in the registry.
    #[must_use]
    pub fn custom(name: &str, repository: &str) -> Self {
        Self {
            name: name.to_string(),
            description: "Installed from custom repository".to_string(),
            version: CUSTOM_VERSION.to_string(),
            author: "unknown".to_string(),
            repository: repository.to_string(),
            tags: Vec::new(),
            license: None,
            sub_path: None,
        }
    }

    /// Case-insensitive substring match on name, description or any tag.
    #[must_use]
    pub fn matches_query(&self, query: &str) -> bool {
        let needle = query.to_lowercase();
        self.name.to_lowercase().contains(&needle)
            || self.description.to_lowercase().contains(&needle)
            || self
                .tags
                .iter()
                .any(|tag| tag.to_lowercase().contains(&needle))
    }
}

/// Local install record, persisted as `.manifest.json` in the skill directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InstalledSkill {
    #[serde(flatten)]
    pub manifest: SkillManifest,
    pub installed_at: DateTime<Utc>,
    pub path: PathBuf,
}

impl InstalledSkill {
    #[must_use]
    pub fn new(manifest: SkillManifest, path: PathBuf) -> Self {
        Self {
            manifest,
            installed_at: Utc::now(),
            path,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.manifest.name
    }

    #[must_use]
    pub fn version(&self) -> &str {
        &self.manifest.version
    }
}

/// The remote catalog document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryData {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub skills: Vec<SkillManifest>,
    #[serde(default)]
    pub mcps: Vec<McpManifest>,
    #[serde(default)]
    pub plugins: Vec<PluginManifest>,
}

// =============================================================================
// MCP
// =============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum McpInstallKind {
    Binary,
    Npm,
    Script,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct McpInstallConfig {
    #[serde(rename = "type")]
    pub kind: McpInstallKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub install: Option<String>,
}

/// An environment variable an MCP server expects.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct McpEnvVar {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(default)]
    pub secret: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct McpConfig {
    pub command: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env_vars: Vec<McpEnvVar>,
}

/// Registry entry for an MCP server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct McpManifest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub repository: String,
    #[serde(default)]
    pub language: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub install: McpInstallConfig,
    pub config: McpConfig,
}

/// Launch entry stored under `mcpServers.<name>` in the settings document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct McpServerEntry {
    pub command: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<BTreeMap<String, String>>,
}

/// An MCP server registered in the settings document.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct InstalledMcp {
    pub name: String,
    pub path: PathBuf,
    pub config: McpServerEntry,
}

// =============================================================================
// PLUGINS
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PluginInstallConfig {
    #[serde(default)]
    pub scripts: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PluginSettingsConfig {
    pub settings_key: String,
    #[serde(default)]
    pub settings_value: serde_json::Map<String, serde_json::Value>,
}

/// Registry entry for a plugin.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PluginManifest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub repository: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default)]
    pub author: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub install: PluginInstallConfig,
    pub config: PluginSettingsConfig,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct InstalledPlugin {
    pub name: String,
    pub path: PathBuf,
    #[serde(rename = "type")]
    pub kind: String,
}
