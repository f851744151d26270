//! Remote catalog of installable skills, MCP servers and plugins.
//!
//! Implementations only need to supply [`SkillRegistry::catalog`]; lookups and
//! search are derived from it. The catalog is fetched at most once per
//! registry instance.

mod http;

pub use http::HttpRegistry;

use crate::core::manifest::{McpManifest, PluginManifest, RegistryData, SkillManifest};
use crate::error::Result;

pub trait SkillRegistry {
    /// The full registry document.
    fn catalog(&self) -> Result<&RegistryData>;

    fn fetch_available(&self) -> Result<Vec<SkillManifest>> {
        Ok(self.catalog()?.skills.clone())
    }

    /// Case-insensitive substring match on name, description and tags.
    fn search(&self, query: &str) -> Result<Vec<SkillManifest>> {
        Ok(self
            .catalog()?
            .skills
            .iter()
            .filter(|skill| skill.matches_query(query))
            .cloned()
            .collect())
    }

    /// Exact, case-sensitive lookup.
    fn find_by_name(&self, name: &str) -> Result<Option<SkillManifest>> {
        Ok(self
            .catalog()?
            .skills
            .iter()
            .find(|skill| skill.name == name)
            .cloned())
    }

    fn fetch_mcps(&self) -> Result<Vec<McpManifest>> {
        Ok(self.catalog()?.mcps.clone())
    }

    fn find_mcp_by_name(&self, name: &str) -> Result<Option<McpManifest>> {
        Ok(self
            .catalog()?
            .mcps
            .iter()
            .find(|mcp| mcp.name == name)
            .cloned())
    }

    fn fetch_plugins(&self) -> Result<Vec<PluginManifest>> {
        Ok(self.catalog()?.plugins.clone())
    }

    fn find_plugin_by_name(&self, name: &str) -> Result<Option<PluginManifest>> {
        Ok(self
            .catalog()?
            .plugins
            .iter()
            .find(|plugin| plugin.name == name)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::doubles::MemoryRegistry;
    use crate::test_utils::fixtures::registry_skill;

    fn registry() -> MemoryRegistry {
        let mut docker = registry_skill("docker-helper", "1.0.0");
        docker.description = "Compose and build images".to_string();
        let mut review = registry_skill("code-review", "2.1.0");
        review.tags = vec!["Quality".to_string()];
        MemoryRegistry::with_skills(vec![docker, review])
    }

    #[test]
    fn search_matches_description() {
        let found = registry().search("COMPOSE").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "docker-helper");
    }

    #[test]
    fn search_matches_tags() {
        let found = registry().search("quality").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "code-review");
    }

    #[test]
    fn find_by_name_is_case_sensitive() {
        let registry = registry();
        assert!(registry.find_by_name("code-review").unwrap().is_some());
        assert!(registry.find_by_name("Code-Review").unwrap().is_none());
    }

    #[test]
    fn extensions_default_to_empty() {
        let registry = registry();
        assert!(registry.fetch_mcps().unwrap().is_empty());
        assert!(registry.find_plugin_by_name("anything").unwrap().is_none());
    }
}
