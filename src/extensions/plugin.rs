//! Plugin installs.
//!
//! A plugin lives in its own directory and writes one top-level key of the
//! settings document, named by its manifest. Installed state is the presence
//! of that directory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};

use crate::core::manifest::{InstalledPlugin, PluginManifest};
use crate::error::{Result, SkmError};
use crate::extensions::resolve_relative_command;
use crate::registry::SkillRegistry;
use crate::storage::git::GitTransport;
use crate::storage::settings::SettingsStore;
use crate::utils::fs::{ensure_dir, remove_dir_if_exists};

pub trait PluginService {
    fn list_available(&self) -> Result<Vec<PluginManifest>>;

    fn find_by_name(&self, name: &str) -> Result<Option<PluginManifest>>;

    /// Fresh clone (replacing any existing directory) plus settings entry.
    fn install(&self, manifest: &PluginManifest) -> Result<()>;

    /// Pull in place, then re-apply the settings entry.
    fn update(&self, name: &str, manifest: &PluginManifest) -> Result<()>;

    /// Remove the directory and the manifest's settings key.
    fn uninstall(&self, name: &str, manifest: &PluginManifest) -> Result<()>;

    /// Registry plugins whose install directory exists.
    fn list_installed(&self) -> Result<Vec<InstalledPlugin>>;

    fn is_installed(&self, name: &str) -> bool;
}

pub struct LocalPluginService {
    registry: Arc<dyn SkillRegistry>,
    git: Arc<dyn GitTransport>,
    settings: SettingsStore,
    install_dir: PathBuf,
}

impl LocalPluginService {
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

    fn apply(&self, manifest: &PluginManifest, install_path: &Path) -> Result<()> {
        for script in &manifest.install.scripts {
            let script_path = install_path.join(script);
            if script_path.is_file() {
                mark_executable(&script_path)?;
            }
        }

        let value = settings_value(manifest, install_path);
        let key = manifest.config.settings_key.clone();
        self.settings.update(|settings| {
            settings.insert(key, value);
            true
        })?;
        debug!(
            plugin = %manifest.name,
            key = %manifest.config.settings_key,
            "wrote plugin settings"
        );
        Ok(())
    }
}

impl PluginService for LocalPluginService {
    fn list_available(&self) -> Result<Vec<PluginManifest>> {
        self.registry.fetch_plugins()
    }

    fn find_by_name(&self, name: &str) -> Result<Option<PluginManifest>> {
        self.registry.find_plugin_by_name(name)
    }

    fn install(&self, manifest: &PluginManifest) -> Result<()> {
        ensure_dir(&self.install_dir)?;
        let install_path = self.install_path(&manifest.name);
        remove_dir_if_exists(&install_path)?;
        self.git.clone_repo(&manifest.repository, &install_path)?;
        self.apply(manifest, &install_path)?;
        info!(plugin = %manifest.name, path = %install_path.display(), "installed plugin");
        Ok(())
    }

    fn update(&self, name: &str, manifest: &PluginManifest) -> Result<()> {
        let install_path = self.install_path(name);
        if !install_path.exists() {
            return Err(SkmError::NotInstalled(format!(
                "Plugin \"{name}\" installation directory not found"
            )));
        }
        self.git.pull(&install_path)?;
        self.apply(manifest, &install_path)?;
        info!(plugin = name, "updated plugin");
        Ok(())
    }

    fn uninstall(&self, name: &str, manifest: &PluginManifest) -> Result<()> {
        remove_dir_if_exists(self.install_path(name))?;
        let key = manifest.config.settings_key.as_str();
        self.settings
            .update(|settings| settings.shift_remove(key).is_some())?;
        info!(plugin = name, key, "uninstalled plugin");
        Ok(())
    }

    fn list_installed(&self) -> Result<Vec<InstalledPlugin>> {
        Ok(self
            .list_available()?
            .into_iter()
            .filter_map(|manifest| {
                let path = self.install_path(&manifest.name);
                path.exists().then(|| InstalledPlugin {
                    name: manifest.name,
                    path,
                    kind: manifest.kind,
                })
            })
            .collect())
    }

    fn is_installed(&self, name: &str) -> bool {
        self.install_path(name).exists()
    }
}

/// The manifest's `settingsValue`, with a relative `command` resolved.
fn settings_value(manifest: &PluginManifest, install_path: &Path) -> Value {
    let mut value = manifest.config.settings_value.clone();
    if let Some(Value::String(command)) = value.get_mut("command") {
        *command = resolve_relative_command(command, install_path);
    }
    Value::Object(value)
}

#[cfg(unix)]
fn mark_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))?;
    Ok(())
}

#[cfg(not(unix))]
fn mark_executable(_path: &Path) -> Result<()> {
    Ok(())
}
