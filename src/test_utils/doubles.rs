//! In-memory stand-ins for every service seam.
//!
//! `RecordingGit` is the exception that touches disk: a "clone" writes its
//! configured files into the destination so the real stores can be exercised.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::core::manifest::{
    InstalledMcp, InstalledPlugin, InstalledSkill, McpManifest, McpServerEntry, PluginManifest,
    RegistryData, SkillManifest,
};
use crate::error::{Result, SkmError};
use crate::extensions::mcp::{McpService, merge_env};
use crate::extensions::plugin::PluginService;
use crate::ops::ProgressReporter;
use crate::registry::SkillRegistry;
use crate::storage::git::GitTransport;
use crate::storage::skills::SkillStore;

// =============================================================================
// Registry
// =============================================================================

#[derive(Debug, Default)]
pub struct MemoryRegistry {
    catalog: RegistryData,
    offline: bool,
}

impl MemoryRegistry {
    pub fn with_skills(skills: Vec<SkillManifest>) -> Self {
        Self::with_catalog(RegistryData {
            version: "1.0.0".to_string(),
            skills,
            ..RegistryData::default()
        })
    }

    pub fn with_catalog(catalog: RegistryData) -> Self {
        Self {
            catalog,
            offline: false,
        }
    }

    /// Every accessor fails like an unreachable registry.
    pub fn offline() -> Self {
        Self {
            catalog: RegistryData::default(),
            offline: true,
        }
    }

    pub fn with_mcps(mut self, mcps: Vec<McpManifest>) -> Self {
        self.catalog.mcps = mcps;
        self
    }

    pub fn with_plugins(mut self, plugins: Vec<PluginManifest>) -> Self {
        self.catalog.plugins = plugins;
        self
    }
}

impl SkillRegistry for MemoryRegistry {
    fn catalog(&self) -> Result<&RegistryData> {
        if self.offline {
            return Err(SkmError::Registry(
                "Failed to fetch skill registry: offline".to_string(),
            ));
        }
        Ok(&self.catalog)
    }
}

// =============================================================================
// Skill store
// =============================================================================

#[derive(Debug, Default)]
struct StoreState {
    installed: BTreeMap<String, InstalledSkill>,
    /// Directories that exist without a manifest.
    bare_dirs: BTreeSet<String>,
    removed: Vec<String>,
}

/// Skill store kept entirely in memory under a fake root.
#[derive(Debug)]
pub struct MemorySkillStore {
    root: PathBuf,
    state: Mutex<StoreState>,
    fail_remove: bool,
}

impl Default for MemorySkillStore {
    fn default() -> Self {
        Self {
            root: PathBuf::from("/memory/skills"),
            state: Mutex::new(StoreState::default()),
            fail_remove: false,
        }
    }
}

impl MemorySkillStore {
    pub fn with_installed(skills: Vec<InstalledSkill>) -> Self {
        let store = Self::default();
        {
            let mut state = store.state.lock().unwrap();
            for skill in skills {
                state.installed.insert(skill.manifest.name.clone(), skill);
            }
        }
        store
    }

    /// A directory with no manifest, as left by a manual copy.
    pub fn with_bare_dir(self, name: &str) -> Self {
        self.state.lock().unwrap().bare_dirs.insert(name.to_string());
        self
    }

    /// `remove_skill` fails with a permission error.
    pub fn failing_remove(mut self) -> Self {
        self.fail_remove = true;
        self
    }

    pub fn installed(&self, name: &str) -> InstalledSkill {
        self.state.lock().unwrap().installed[name].clone()
    }

    pub fn removed(&self) -> Vec<String> {
        self.state.lock().unwrap().removed.clone()
    }

    fn name_for(&self, path: &Path) -> Option<String> {
        path.strip_prefix(&self.root)
            .ok()
            .map(|rest| rest.to_string_lossy().into_owned())
    }
}

impl SkillStore for MemorySkillStore {
    fn skills_dir(&self) -> PathBuf {
        self.root.clone()
    }

    fn ensure_skills_dir(&self) -> Result<()> {
        Ok(())
    }

    fn list_installed(&self) -> Result<Vec<InstalledSkill>> {
        Ok(self.state.lock().unwrap().installed.values().cloned().collect())
    }

    fn read_manifest(&self, skill_path: &Path) -> Option<InstalledSkill> {
        let name = self.name_for(skill_path)?;
        self.state.lock().unwrap().installed.get(&name).cloned()
    }

    fn write_manifest(&self, skill_path: &Path, skill: &InstalledSkill) -> Result<()> {
        let name = self
            .name_for(skill_path)
            .ok_or_else(|| SkmError::Io(std::io::Error::other("outside store root")))?;
        let mut state = self.state.lock().unwrap();
        state.bare_dirs.remove(&name);
        state.installed.insert(name, skill.clone());
        Ok(())
    }

    fn remove_skill(&self, name: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.removed.push(name.to_string());
        if self.fail_remove {
            return Err(SkmError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "permission denied",
            )));
        }
        state.installed.remove(name);
        state.bare_dirs.remove(name);
        Ok(())
    }

    fn skill_exists(&self, name: &str) -> bool {
        let state = self.state.lock().unwrap();
        state.installed.contains_key(name) || state.bare_dirs.contains(name)
    }

    fn has_skill_file(&self, skill_path: &Path) -> bool {
        self.read_manifest(skill_path).is_some()
    }

    fn copy_tree(&self, _source: &Path, dest: &Path) -> Result<()> {
        if let Some(name) = self.name_for(dest) {
            self.state.lock().unwrap().bare_dirs.insert(name);
        }
        Ok(())
    }

    fn remove_tree(&self, _path: &Path) -> Result<()> {
        Ok(())
    }
}

// =============================================================================
// Git
// =============================================================================

/// Git transport that records calls. A clone writes `files` into the
/// destination; a failing clone leaves a partial, empty destination behind.
#[derive(Debug, Default)]
pub struct RecordingGit {
    files: Vec<(String, String)>,
    failure: Option<String>,
    tag: Option<String>,
    clones: Mutex<Vec<(String, PathBuf)>>,
    pulls: Mutex<Vec<PathBuf>>,
}

impl RecordingGit {
    pub fn with_files(files: &[(&str, &str)]) -> Self {
        Self {
            files: files
                .iter()
                .map(|(path, content)| ((*path).to_string(), (*content).to_string()))
                .collect(),
            ..Self::default()
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn with_tag(mut self, tag: &str) -> Self {
        self.tag = Some(tag.to_string());
        self
    }

    pub fn clones(&self) -> Vec<(String, PathBuf)> {
        self.clones.lock().unwrap().clone()
    }

    pub fn clone_count(&self) -> usize {
        self.clones.lock().unwrap().len()
    }

    pub fn pull_count(&self) -> usize {
        self.pulls.lock().unwrap().len()
    }
}

impl GitTransport for RecordingGit {
    fn clone_repo(&self, url: &str, dest: &Path) -> Result<()> {
        self.clones
            .lock()
            .unwrap()
            .push((url.to_string(), dest.to_path_buf()));
        std::fs::create_dir_all(dest)?;
        if let Some(message) = &self.failure {
            return Err(SkmError::Git(message.clone()));
        }
        for (relative, content) in &self.files {
            let target = dest.join(relative);
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(target, content)?;
        }
        Ok(())
    }

    fn latest_tag(&self, _url: &str) -> Option<String> {
        self.tag.clone()
    }

    fn pull(&self, repo_path: &Path) -> Result<()> {
        self.pulls.lock().unwrap().push(repo_path.to_path_buf());
        Ok(())
    }
}

// =============================================================================
// Extensions
// =============================================================================

#[derive(Debug, Default)]
pub struct MemoryMcpService {
    available: Vec<McpManifest>,
    installed: Mutex<BTreeMap<String, McpServerEntry>>,
    failure: Option<String>,
    calls: Mutex<Vec<String>>,
}

impl MemoryMcpService {
    pub fn with_available(available: Vec<McpManifest>) -> Self {
        Self {
            available,
            ..Self::default()
        }
    }

    pub fn with_installed(self, name: &str, command: &str) -> Self {
        self.installed.lock().unwrap().insert(
            name.to_string(),
            McpServerEntry {
                command: command.to_string(),
                args: None,
                env: None,
            },
        );
        self
    }

    /// Mutating calls fail as if a build step exited non-zero.
    pub fn failing(mut self, message: &str) -> Self {
        self.failure = Some(message.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn entry(&self, name: &str) -> Option<McpServerEntry> {
        self.installed.lock().unwrap().get(name).cloned()
    }

    fn record(&self, call: String) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        match &self.failure {
            Some(message) => Err(SkmError::Command(message.clone())),
            None => Ok(()),
        }
    }
}

impl McpService for MemoryMcpService {
    fn list_available(&self) -> Result<Vec<McpManifest>> {
        Ok(self.available.clone())
    }

    fn find_by_name(&self, name: &str) -> Result<Option<McpManifest>> {
        Ok(self.available.iter().find(|mcp| mcp.name == name).cloned())
    }

    fn install(&self, manifest: &McpManifest, env: &BTreeMap<String, String>) -> Result<()> {
        let env = merge_env(manifest, env)?;
        self.record(format!("install:{}", manifest.name))?;
        self.installed.lock().unwrap().insert(
            manifest.name.clone(),
            McpServerEntry {
                command: manifest.config.command.clone(),
                args: manifest.config.args.clone(),
                env: (!env.is_empty()).then_some(env),
            },
        );
        Ok(())
    }

    fn update(&self, name: &str, _manifest: &McpManifest) -> Result<()> {
        self.record(format!("update:{name}"))
    }

    fn uninstall(&self, name: &str) -> Result<()> {
        self.record(format!("uninstall:{name}"))?;
        self.installed.lock().unwrap().remove(name);
        Ok(())
    }

    fn list_installed(&self) -> Result<Vec<InstalledMcp>> {
        Ok(self
            .installed
            .lock()
            .unwrap()
            .iter()
            .map(|(name, config)| InstalledMcp {
                name: name.clone(),
                path: PathBuf::from(&config.command),
                config: config.clone(),
            })
            .collect())
    }

    fn is_installed(&self, name: &str) -> Result<bool> {
        Ok(self.installed.lock().unwrap().contains_key(name))
    }
}

#[derive(Debug, Default)]
pub struct MemoryPluginService {
    available: Vec<PluginManifest>,
    installed: Mutex<BTreeSet<String>>,
    failure: Option<String>,
    calls: Mutex<Vec<String>>,
}

impl MemoryPluginService {
    pub fn with_available(available: Vec<PluginManifest>) -> Self {
        Self {
            available,
            ..Self::default()
        }
    }

    pub fn with_installed(self, name: &str) -> Self {
        self.installed.lock().unwrap().insert(name.to_string());
        self
    }

    pub fn failing(mut self, message: &str) -> Self {
        self.failure = Some(message.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        match &self.failure {
            Some(message) => Err(SkmError::Git(message.clone())),
            None => Ok(()),
        }
    }
}

impl PluginService for MemoryPluginService {
    fn list_available(&self) -> Result<Vec<PluginManifest>> {
        Ok(self.available.clone())
    }

    fn find_by_name(&self, name: &str) -> Result<Option<PluginManifest>> {
        Ok(self
            .available
            .iter()
            .find(|plugin| plugin.name == name)
            .cloned())
    }

    fn install(&self, manifest: &PluginManifest) -> Result<()> {
        self.record(format!("install:{}", manifest.name))?;
        self.installed.lock().unwrap().insert(manifest.name.clone());
        Ok(())
    }

    fn update(&self, name: &str, _manifest: &PluginManifest) -> Result<()> {
        self.record(format!("update:{name}"))
    }

    fn uninstall(&self, name: &str, _manifest: &PluginManifest) -> Result<()> {
        self.record(format!("uninstall:{name}"))?;
        self.installed.lock().unwrap().remove(name);
        Ok(())
    }

    fn list_installed(&self) -> Result<Vec<InstalledPlugin>> {
        let installed = self.installed.lock().unwrap();
        Ok(self
            .available
            .iter()
            .filter(|plugin| installed.contains(&plugin.name))
            .map(|plugin| InstalledPlugin {
                name: plugin.name.clone(),
                path: PathBuf::from("/memory/plugins").join(&plugin.name),
                kind: plugin.kind.clone(),
            })
            .collect())
    }

    fn is_installed(&self, name: &str) -> bool {
        self.installed.lock().unwrap().contains(name)
    }
}

// =============================================================================
// Progress
// =============================================================================

/// Records `start:`/`stop:` events in order.
#[derive(Debug, Default)]
pub struct RecordingProgress {
    events: Mutex<Vec<String>>,
}

impl RecordingProgress {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

impl ProgressReporter for RecordingProgress {
    fn start(&self, message: &str) {
        self.events.lock().unwrap().push(format!("start:{message}"));
    }

    fn stop(&self, message: &str) {
        self.events.lock().unwrap().push(format!("stop:{message}"));
    }
}
