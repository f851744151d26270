//! Installed-skills directory and per-skill manifest files.

use std::path::{Component, Path, PathBuf};

use tracing::{debug, warn};

use crate::core::manifest::InstalledSkill;
use crate::core::validation::SKILL_FILE;
use crate::error::{Result, SkmError};
use crate::utils::fs::{copy_dir_recursive, ensure_dir, remove_dir_if_exists};

/// Install record written inside each skill directory.
pub const MANIFEST_FILE: &str = ".manifest.json";

/// A skill's directory is named after the skill, so the name must be exactly
/// one plain path segment under the skills directory.
pub fn check_skill_name(name: &str) -> Result<()> {
    let mut components = Path::new(name).components();
    let single_segment = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(segment)), None) if segment == name
    );
    if !single_segment || name.contains(['/', '\\']) {
        return Err(SkmError::InvalidInput(format!("Invalid skill name \"{name}\"")));
    }
    Ok(())
}

pub trait SkillStore {
    fn skills_dir(&self) -> PathBuf;

    fn skill_path(&self, name: &str) -> PathBuf {
        self.skills_dir().join(name)
    }

    fn ensure_skills_dir(&self) -> Result<()>;

    /// Every subdirectory with a readable manifest. Unreadable ones are skipped.
    fn list_installed(&self) -> Result<Vec<InstalledSkill>>;

    /// `None` when the manifest is missing or cannot be decoded.
    fn read_manifest(&self, skill_path: &Path) -> Option<InstalledSkill>;

    fn write_manifest(&self, skill_path: &Path, skill: &InstalledSkill) -> Result<()>;

    /// Recursively delete the skill directory; absent is not an error.
    fn remove_skill(&self, name: &str) -> Result<()>;

    fn skill_exists(&self, name: &str) -> bool;

    fn has_skill_file(&self, skill_path: &Path) -> bool;

    /// Copy a directory tree to `dest`, used for monorepo sub-path installs.
    fn copy_tree(&self, source: &Path, dest: &Path) -> Result<()>;

    fn remove_tree(&self, path: &Path) -> Result<()>;
}

/// Skill store rooted at a directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct LocalSkillStore {
    root: PathBuf,
}

impl LocalSkillStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl SkillStore for LocalSkillStore {
    fn skills_dir(&self) -> PathBuf {
        self.root.clone()
    }

    fn ensure_skills_dir(&self) -> Result<()> {
        ensure_dir(&self.root)
    }

    fn list_installed(&self) -> Result<Vec<InstalledSkill>> {
        self.ensure_skills_dir()?;

        let mut skills = Vec::new();
        for entry in std::fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            if let Some(skill) = self.read_manifest(&entry.path()) {
                skills.push(skill);
            }
        }
        skills.sort_by(|a, b| a.manifest.name.cmp(&b.manifest.name));
        debug!(count = skills.len(), dir = %self.root.display(), "listed installed skills");
        Ok(skills)
    }

    fn read_manifest(&self, skill_path: &Path) -> Option<InstalledSkill> {
        let manifest_path = skill_path.join(MANIFEST_FILE);
        if !manifest_path.exists() {
            return None;
        }
        let raw = match std::fs::read_to_string(&manifest_path) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(path = %manifest_path.display(), error = %err, "unreadable skill manifest");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(skill) => Some(skill),
            Err(err) => {
                warn!(path = %manifest_path.display(), error = %err, "corrupt skill manifest");
                None
            }
        }
    }

    fn write_manifest(&self, skill_path: &Path, skill: &InstalledSkill) -> Result<()> {
        let manifest_path = skill_path.join(MANIFEST_FILE);
        let payload = serde_json::to_string_pretty(skill)?;
        std::fs::write(&manifest_path, payload).map_err(|err| {
            SkmError::Io(std::io::Error::new(
                err.kind(),
                format!("write {}: {err}", manifest_path.display()),
            ))
        })
    }

    fn remove_skill(&self, name: &str) -> Result<()> {
        check_skill_name(name)?;
        remove_dir_if_exists(self.skill_path(name))
    }

    fn skill_exists(&self, name: &str) -> bool {
        self.skill_path(name).exists()
    }

    fn has_skill_file(&self, skill_path: &Path) -> bool {
        skill_path.join(SKILL_FILE).is_file()
    }

    fn copy_tree(&self, source: &Path, dest: &Path) -> Result<()> {
        copy_dir_recursive(source, dest)
    }

    fn remove_tree(&self, path: &Path) -> Result<()> {
        remove_dir_if_exists(path)
    }
}
