//! MCP server installs.
//!
//! An MCP server is cloned into its own directory, built with the commands
//! its manifest declares, and registered under `mcpServers.<name>` in the
//! shared settings document. Whether a server counts as installed is decided
//! by that settings entry, not by the directory.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::core::manifest::{InstalledMcp, McpManifest, McpServerEntry};
use crate::error::{Result, SkmError};
use crate::extensions::process::run_shell;
use crate::extensions::resolve_relative_command;
use crate::registry::SkillRegistry;
use crate::storage::git::GitTransport;
use crate::storage::settings::{MCP_SERVERS_KEY, SettingsStore, edit_mcp_servers};
use crate::utils::fs::{ensure_dir, remove_dir_if_exists};

pub trait McpService {
    fn list_available(&self) -> Result<Vec<McpManifest>>;

    fn find_by_name(&self, name: &str) -> Result<Option<McpManifest>>;

    /// Clone, build and register `manifest`. `env` holds values collected
    /// from the user and wins over manifest defaults.
    fn install(&self, manifest: &McpManifest, env: &BTreeMap<String, String>) -> Result<()>;

    /// Pull (or re-clone) the checkout, rebuild, and refresh the settings
    /// entry. Env values already present in the entry are kept.
    fn update(&self, name: &str, manifest: &McpManifest) -> Result<()>;

    /// Remove the checkout and the `mcpServers.<name>` entry.
    fn uninstall(&self, name: &str) -> Result<()>;

    fn list_installed(&self) -> Result<Vec<InstalledMcp>>;

    fn is_installed(&self, name: &str) -> Result<bool>;
}

pub struct LocalMcpService {
    registry: Arc<dyn SkillRegistry>,
    git: Arc<dyn GitTransport>,
    settings: SettingsStore,
    install_dir: PathBuf,
}

impl LocalMcpService {
    pub fn new(
        registry: Arc<dyn SkillRegistry>,
        git: Arc<dyn GitTransport>,
        settings: SettingsStore,
        install_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            registry,
            git,
            settings,
            install_dir: install_dir.into(),
        }
    }

    fn install_path(&self, name: &str) -> PathBuf {
        self.install_dir.join(name)
    }

    fn register(&self, name: &str, entry: &McpServerEntry) -> Result<()> {
        let value = serde_json::to_value(entry)?;
        self.settings.update(|settings| {
            edit_mcp_servers(settings, |servers| servers.insert(name.to_string(), value));
            true
        })?;
        debug!(mcp = name, settings = %self.settings.path().display(), "registered MCP server");
        Ok(())
    }

    fn registered_entry(&self, name: &str) -> Result<Option<McpServerEntry>> {
        let settings = self.settings.read()?;
        Ok(settings
            .get(MCP_SERVERS_KEY)
            .and_then(|servers| servers.get(name))
            .and_then(|value| serde_json::from_value(value.clone()).ok()))
    }
}

impl McpService for LocalMcpService {
    fn list_available(&self) -> Result<Vec<McpManifest>> {
        self.registry.fetch_mcps()
    }

    fn find_by_name(&self, name: &str) -> Result<Option<McpManifest>> {
        self.registry.find_mcp_by_name(name)
    }

    fn install(&self, manifest: &McpManifest, env: &BTreeMap<String, String>) -> Result<()> {
        let env = merge_env(manifest, env)?;

        ensure_dir(&self.install_dir)?;
        let install_path = self.install_path(&manifest.name);
        remove_dir_if_exists(&install_path)?;
        self.git.clone_repo(&manifest.repository, &install_path)?;
        run_build_steps(manifest, &install_path)?;

        self.register(&manifest.name, &server_entry(manifest, &install_path, env))?;
        info!(mcp = %manifest.name, path = %install_path.display(), "installed MCP server");
        Ok(())
    }

    fn update(&self, name: &str, manifest: &McpManifest) -> Result<()> {
        let existing_env = self
            .registered_entry(name)?
            .and_then(|entry| entry.env)
            .unwrap_or_default();
        let env = merge_env(manifest, &existing_env)?;

        let install_path = self.install_path(name);
        if install_path.join(".git").is_dir() {
            self.git.pull(&install_path)?;
        } else {
            ensure_dir(&self.install_dir)?;
            remove_dir_if_exists(&install_path)?;
            self.git.clone_repo(&manifest.repository, &install_path)?;
        }
        run_build_steps(manifest, &install_path)?;

        self.register(name, &server_entry(manifest, &install_path, env))?;
        info!(mcp = name, "updated MCP server");
        Ok(())
    }

    fn uninstall(&self, name: &str) -> Result<()> {
        remove_dir_if_exists(self.install_path(name))?;
        let removed = self.settings.update(|settings| {
            settings
                .get_mut(MCP_SERVERS_KEY)
                .and_then(serde_json::Value::as_object_mut)
                .is_some_and(|servers| servers.shift_remove(name).is_some())
        })?;
        info!(mcp = name, settings_changed = removed, "uninstalled MCP server");
        Ok(())
    }

    fn list_installed(&self) -> Result<Vec<InstalledMcp>> {
        let settings = self.settings.read()?;
        let Some(servers) = settings
            .get(MCP_SERVERS_KEY)
            .and_then(serde_json::Value::as_object)
        else {
            return Ok(Vec::new());
        };

        let mut installed = Vec::with_capacity(servers.len());
        for (name, value) in servers {
            let config: McpServerEntry = match serde_json::from_value(value.clone()) {
                Ok(config) => config,
                Err(err) => {
                    warn!(mcp = %name, error = %err, "skipping malformed mcpServers entry");
                    continue;
                }
            };
            let install_path = self.install_path(name);
            let path = if install_path.exists() {
                install_path
            } else {
                PathBuf::from(&config.command)
            };
            installed.push(InstalledMcp {
                name: name.clone(),
                path,
                config,
            });
        }
        Ok(installed)
    }

    fn is_installed(&self, name: &str) -> Result<bool> {
        let settings = self.settings.read()?;
        Ok(settings
            .get(MCP_SERVERS_KEY)
            .and_then(|servers| servers.get(name))
            .is_some())
    }
}

/// Layer `config.env`, then declared defaults, then `supplied`. Every
/// required variable must end up with a value.
pub fn merge_env(
    manifest: &McpManifest,
    supplied: &BTreeMap<String, String>,
) -> Result<BTreeMap<String, String>> {
    let mut env = manifest.config.env.clone().unwrap_or_default();
    for var in &manifest.config.env_vars {
        if let Some(default) = &var.default {
            env.insert(var.name.clone(), default.clone());
        }
    }
    for (key, value) in supplied {
        if !value.is_empty() {
            env.insert(key.clone(), value.clone());
        }
    }

    let missing: Vec<&str> = manifest
        .config
        .env_vars
        .iter()
        .filter(|var| var.required && !env.contains_key(&var.name))
        .map(|var| var.name.as_str())
        .collect();
    if !missing.is_empty() {
        return Err(SkmError::InvalidInput(format!(
            "MCP \"{}\" requires environment variable(s): {}",
            manifest.name,
            missing.join(", ")
        )));
    }
    Ok(env)
}

fn server_entry(
    manifest: &McpManifest,
    install_path: &Path,
    env: BTreeMap<String, String>,
) -> McpServerEntry {
    McpServerEntry {
        command: resolve_relative_command(&manifest.config.command, install_path),
        args: manifest.config.args.clone(),
        env: (!env.is_empty()).then_some(env),
    }
}

fn run_build_steps(manifest: &McpManifest, install_path: &Path) -> Result<()> {
    for step in [&manifest.install.build, &manifest.install.install]
        .into_iter()
        .flatten()
    {
        run_shell(step, install_path)?;
    }
    Ok(())
}
