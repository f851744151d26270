//! Search the registry.

use crate::core::manifest::SkillManifest;
use crate::ops::Outcome;
use crate::registry::SkillRegistry;

pub struct SearchSkills<'a> {
    registry: &'a dyn SkillRegistry,
}

impl<'a> SearchSkills<'a> {
    pub fn new(registry: &'a dyn SkillRegistry) -> Self {
        Self { registry }
    }

    /// A missing or blank query returns every available skill.
    pub fn execute(&self, query: Option<&str>) -> Outcome<Vec<SkillManifest>> {
        let found = match query.map(str::trim).filter(|query| !query.is_empty()) {
            Some(query) => self.registry.search(query),
            None => self.registry.fetch_available(),
        };
        found.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::doubles::MemoryRegistry;
    use crate::test_utils::fixtures::registry_skill;

    fn registry() -> MemoryRegistry {
        MemoryRegistry::with_skills(vec![
            registry_skill("pdf-tools", "1.0.0"),
            registry_skill("git-helper", "1.0.0"),
        ])
    }

    #[test]
    fn blank_query_lists_everything() {
        let registry = registry();
        for query in [None, Some(""), Some("   ")] {
            let outcome = SearchSkills::new(&registry).execute(query);
            assert_eq!(outcome.value.map(|skills| skills.len()), Some(2));
        }
    }

    #[test]
    fn query_is_trimmed_before_matching() {
        let registry = registry();
        let outcome = SearchSkills::new(&registry).execute(Some("  PDF "));
        let names: Vec<_> = outcome.value.unwrap().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["pdf-tools".to_string()]);
    }

    #[test]
    fn registry_failure_is_reported() {
        let registry = MemoryRegistry::offline();
        let outcome = SearchSkills::new(&registry).execute(Some("x"));
        assert!(!outcome.success);
        assert!(outcome.error.unwrap().starts_with("Failed to fetch skill registry"));
    }
}
