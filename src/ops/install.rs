//! Install a skill from the registry or straight from a repository URL.

use std::path::{Component, Path, PathBuf};

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::core::manifest::{InstalledSkill, SkillManifest};
use crate::core::validation::SKILL_FILE;
use crate::error::{Result, SkmError};
use crate::ops::{Outcome, ProgressReporter};
use crate::registry::SkillRegistry;
use crate::storage::git::GitTransport;
use crate::storage::skills::{SkillStore, check_skill_name};

/// Exactly one of the two fields must be set.
#[derive(Debug, Clone, Default)]
pub struct InstallRequest {
    pub skill_name: Option<String>,
    pub repo_url: Option<String>,
}

impl InstallRequest {
    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            skill_name: Some(name.into()),
            repo_url: None,
        }
    }

    pub fn from_repo(url: impl Into<String>) -> Self {
        Self {
            skill_name: None,
            repo_url: Some(url.into()),
        }
    }
}

pub struct InstallSkill<'a> {
    store: &'a dyn SkillStore,
    git: &'a dyn GitTransport,
    registry: &'a dyn SkillRegistry,
}

impl<'a> InstallSkill<'a> {
    pub fn new(
        store: &'a dyn SkillStore,
        git: &'a dyn GitTransport,
        registry: &'a dyn SkillRegistry,
    ) -> Self {
        Self {
            store,
            git,
            registry,
        }
    }

    pub fn execute(
        &self,
        request: &InstallRequest,
        progress: &dyn ProgressReporter,
    ) -> Outcome<InstalledSkill> {
        self.run(request, progress).into()
    }

    fn run(
        &self,
        request: &InstallRequest,
        progress: &dyn ProgressReporter,
    ) -> Result<InstalledSkill> {
        let manifest = self.resolve(request, progress)?;
        let name = manifest.name.clone();
        check_skill_name(&name)?;

        if self.store.skill_exists(&name) {
            return Err(SkmError::AlreadyInstalled(format!(
                "Skill \"{name}\" is already installed"
            )));
        }
        let sub_path = manifest.sub_path.as_deref().map(checked_sub_path).transpose()?;

        self.store.ensure_skills_dir()?;
        let dest = self.store.skill_path(&name);

        progress.start(&format!("Cloning {name}..."));
        let cloned = match &sub_path {
            Some(sub_path) => self.clone_sub_path(&manifest.repository, sub_path, &dest, &name),
            None => self.git.clone_repo(&manifest.repository, &dest),
        };
        if let Err(err) = cloned {
            progress.stop("Failed to clone repository");
            self.discard(&name);
            return Err(err.context("Failed to clone repository"));
        }
        progress.stop(&format!("Cloned {name}"));

        if !self.store.has_skill_file(&dest) {
            self.discard(&name);
            return Err(SkmError::Integrity(format!(
                "Repository does not contain a valid {SKILL_FILE} file"
            )));
        }

        let installed = InstalledSkill::new(manifest, dest.clone());
        if let Err(err) = self.store.write_manifest(&dest, &installed) {
            self.discard(&name);
            return Err(err.context("Failed to write skill manifest"));
        }
        info!(skill = %name, path = %dest.display(), version = %installed.version(), "installed skill");
        Ok(installed)
    }

    fn resolve(
        &self,
        request: &InstallRequest,
        progress: &dyn ProgressReporter,
    ) -> Result<SkillManifest> {
        let skill_name = non_blank(request.skill_name.as_deref());
        let repo_url = non_blank(request.repo_url.as_deref());

        match (skill_name, repo_url) {
            (Some(_), Some(_)) => Err(SkmError::InvalidInput(
                "Provide either skillName or repoUrl, not both".to_string(),
            )),
            (None, None) => Err(SkmError::InvalidInput(
                "Either skillName or repoUrl must be provided".to_string(),
            )),
            (None, Some(url)) => {
                let name = skill_name_from_url(url)?;
                debug!(skill = %name, url, "installing from custom repository");
                Ok(SkillManifest::custom(&name, url))
            }
            (Some(name), None) => {
                progress.start(&format!("Searching for skill \"{name}\"..."));
                match self.registry.find_by_name(name) {
                    Ok(Some(manifest)) => {
                        progress.stop(&format!("Found skill: {}", manifest.name));
                        Ok(manifest)
                    }
                    Ok(None) => {
                        let message = format!("Skill \"{name}\" not found in registry");
                        progress.stop(&message);
                        Err(SkmError::NotFound(message))
                    }
                    Err(err) => {
                        progress.stop("Failed to reach skill registry");
                        Err(err)
                    }
                }
            }
        }
    }

    /// Clone the whole repository beside the destination, copy only
    /// `sub_path` into place, then drop the temporary checkout.
    fn clone_sub_path(&self, url: &str, sub_path: &Path, dest: &Path, name: &str) -> Result<()> {
        let temp = self.store.skills_dir().join(format!(
            ".tmp-{name}-{}",
            Utc::now().timestamp_millis()
        ));
        debug!(skill = name, temp = %temp.display(), sub_path = %sub_path.display(), "monorepo install");

        let copied = self.git.clone_repo(url, &temp).and_then(|()| {
            let source = temp.join(sub_path);
            if !source.is_dir() {
                return Err(SkmError::Integrity(format!(
                    "Sub-path \"{}\" not found in repository",
                    sub_path.display()
                )));
            }
            self.store.copy_tree(&source, dest)
        });

        if let Err(err) = self.store.remove_tree(&temp) {
            warn!(path = %temp.display(), error = %err, "failed to remove temporary clone");
        }
        copied
    }

    /// Best-effort removal of a half-installed skill.
    fn discard(&self, name: &str) {
        if let Err(err) = self.store.remove_skill(name) {
            warn!(skill = name, error = %err, "failed to clean up partial install");
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

/// Last path segment of a repository URL, without a trailing `.git`.
pub fn skill_name_from_url(url: &str) -> Result<String> {
    let trimmed = url.trim().trim_end_matches('/');
    let trimmed = trimmed.strip_suffix(".git").unwrap_or(trimmed);
    let name = trimmed.rsplit(['/', ':']).next().unwrap_or_default();
    if name.is_empty() || name == "." || name == ".." {
        return Err(SkmError::InvalidInput(format!(
            "Cannot derive a skill name from \"{url}\""
        )));
    }
    Ok(name.to_string())
}

/// A monorepo sub-path must stay inside the repository.
fn checked_sub_path(raw: &str) -> Result<PathBuf> {
    let path = Path::new(raw.trim());
    let inside = path
        .components()
        .all(|component| matches!(component, Component::Normal(_) | Component::CurDir));
    if !inside || path.as_os_str().is_empty() {
        return Err(SkmError::InvalidInput(format!(
            "Sub-path \"{raw}\" must be a relative path inside the repository"
        )));
    }
    Ok(path.to_path_buf())
}
