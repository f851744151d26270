//! Remove an installed skill.

use tracing::info;

use crate::error::{Result, SkmError};
use crate::ops::{Outcome, ProgressReporter};
use crate::storage::skills::{SkillStore, check_skill_name};

pub struct UninstallSkill<'a> {
    store: &'a dyn SkillStore,
}

impl<'a> UninstallSkill<'a> {
    pub fn new(store: &'a dyn SkillStore) -> Self {
        Self { store }
    }

    pub fn execute(&self, name: &str, progress: &dyn ProgressReporter) -> Outcome<()> {
        self.run(name, progress).into()
    }

    fn run(&self, name: &str, progress: &dyn ProgressReporter) -> Result<()> {
        check_skill_name(name)?;
        if !self.store.skill_exists(name) {
            return Err(SkmError::NotInstalled(format!(
                "Skill \"{name}\" is not installed"
            )));
        }

        progress.start(&format!("Removing {name}..."));
        match self.store.remove_skill(name) {
            Ok(()) => {
                progress.stop(&format!("Removed {name}"));
                info!(skill = name, "uninstalled skill");
                Ok(())
            }
            Err(err) => {
                progress.stop(&format!("Failed to remove {name}"));
                Err(err.context("Failed to remove skill"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::manifest::InstalledSkill;
    use crate::test_utils::doubles::{MemorySkillStore, RecordingProgress};
    use crate::ops::NoProgress;
    use crate::storage::skills::LocalSkillStore;
    use crate::test_utils::fixtures::{UnitTestFixture, registry_skill};

    fn installed(name: &str) -> InstalledSkill {
        InstalledSkill::new(
            registry_skill(name, "1.0.0"),
            format!("/memory/skills/{name}").into(),
        )
    }

    #[test]
    fn missing_skill_never_calls_remove() {
        let store = MemorySkillStore::default();
        let outcome = UninstallSkill::new(&store).execute("ghost", &RecordingProgress::default());

        assert!(!outcome.success);
        assert_eq!(outcome.error.as_deref(), Some("Skill \"ghost\" is not installed"));
        assert!(store.removed().is_empty());
    }

    #[test]
    fn removes_installed_skill() {
        let store = MemorySkillStore::with_installed(vec![installed("skill-a")]);
        let progress = RecordingProgress::default();

        let outcome = UninstallSkill::new(&store).execute("skill-a", &progress);

        assert!(outcome.success);
        assert_eq!(store.removed(), vec!["skill-a".to_string()]);
        assert!(!store.skill_exists("skill-a"));
        assert_eq!(
            progress.events(),
            vec!["start:Removing skill-a...".to_string(), "stop:Removed skill-a".to_string()]
        );
    }

    #[test]
    fn remove_failure_is_an_outcome_not_a_panic() {
        let store = MemorySkillStore::with_installed(vec![installed("skill-a")]).failing_remove();

        let outcome = UninstallSkill::new(&store).execute("skill-a", &RecordingProgress::default());

        assert!(!outcome.success);
        let error = outcome.error.unwrap();
        assert!(error.contains("Failed to remove skill"), "{error}");
        assert!(error.contains("permission denied"), "{error}");
    }

    #[test]
    fn names_outside_the_skills_dir_are_rejected() {
        for name in ["..", ".", "", "a/b"] {
            let store = MemorySkillStore::default().with_bare_dir(name);
            let outcome = UninstallSkill::new(&store).execute(name, &RecordingProgress::default());

            assert!(!outcome.success, "{name:?} accepted");
            assert_eq!(
                outcome.error.as_deref(),
                Some(format!("Invalid skill name \"{name}\"").as_str())
            );
            assert!(store.removed().is_empty());
        }
    }

    #[test]
    fn parent_name_leaves_claude_dir_intact() {
        let fixture = UnitTestFixture::new();
        let store = LocalSkillStore::new(fixture.data_path.join(".claude/skills"));
        fixture.create_file(".claude/settings.json", "{}");
        fixture.create_file(".claude/skills/other/SKILL.md", "# other");

        assert!(!UninstallSkill::new(&store).execute("..", &NoProgress).success);
        assert!(!UninstallSkill::new(&store).execute("", &NoProgress).success);
        assert!(fixture.data_path.join(".claude/settings.json").exists());
        assert!(store.skill_exists("other"));
    }
}
