//! List installed skills.

use crate::core::manifest::InstalledSkill;
use crate::ops::Outcome;
use crate::storage::skills::SkillStore;

pub struct ListSkills<'a> {
    store: &'a dyn SkillStore,
}

impl<'a> ListSkills<'a> {
    pub fn new(store: &'a dyn SkillStore) -> Self {
        Self { store }
    }

    pub fn execute(&self) -> Outcome<Vec<InstalledSkill>> {
        self.store.list_installed().into()
    }
}
