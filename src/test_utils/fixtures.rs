use std::path::PathBuf;

use tempfile::TempDir;

use crate::core::manifest::{
    McpConfig, McpInstallConfig, McpInstallKind, McpManifest, PluginInstallConfig, PluginManifest,
    PluginSettingsConfig, SkillManifest,
};

/// Isolated filesystem root for a single test.
pub struct UnitTestFixture {
    pub temp_dir: TempDir,
    pub data_path: PathBuf,
}

impl Default for UnitTestFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl UnitTestFixture {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let data_path = temp_dir.path().to_path_buf();
        println!("[FIXTURE] Created temp directory: {data_path:?}");
        Self {
            temp_dir,
            data_path,
        }
    }

    /// Write `content` at `relative_path`, creating parent directories.
    pub fn create_file(&self, relative_path: &str, content: &str) -> PathBuf {
        let full_path = self.data_path.join(relative_path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        std::fs::write(&full_path, content).expect("Failed to write file");
        println!(
            "[FIXTURE] Created file: {:?} ({} bytes)",
            full_path,
            content.len()
        );
        full_path
    }

    /// Write `skills/<name>/SKILL.md` and return its path.
    pub fn create_skill(&self, name: &str, content: &str) -> PathBuf {
        self.create_file(&format!("skills/{name}/SKILL.md"), content)
    }
}

/// A `SKILL.md` body that parses and validates cleanly.
pub fn skill_document(name: &str, version: &str) -> String {
    format!(
        "---\n\
         name: {name}\n\
         description: Helps with {name} tasks\n\
         license: MIT\n\
         metadata:\n  \
           author: tester\n  \
           version: \"{version}\"\n  \
           tags: [testing]\n\
         ---\n\n\
         # {name}\n\nUse this skill when testing.\n"
    )
}

pub fn registry_skill(name: &str, version: &str) -> SkillManifest {
    SkillManifest {
        name: name.to_string(),
        description: format!("{name} skill"),
        version: version.to_string(),
        author: "tester".to_string(),
        repository: format!("https://example.com/skills/{name}.git"),
        tags: vec!["testing".to_string()],
        license: Some("MIT".to_string()),
        sub_path: None,
    }
}

pub fn registry_mcp(name: &str) -> McpManifest {
    McpManifest {
        name: name.to_string(),
        description: format!("{name} server"),
        repository: format!("https://example.com/mcp/{name}.git"),
        language: "typescript".to_string(),
        version: Some("1.0.0".to_string()),
        install: McpInstallConfig {
            kind: McpInstallKind::Script,
            build: None,
            install: None,
        },
        config: McpConfig {
            command: "node".to_string(),
            args: None,
            env: None,
            env_vars: Vec::new(),
        },
    }
}

pub fn registry_plugin(name: &str, settings_key: &str) -> PluginManifest {
    PluginManifest {
        name: name.to_string(),
        description: format!("{name} plugin"),
        repository: format!("https://example.com/plugins/{name}.git"),
        version: Some("1.0.0".to_string()),
        author: "tester".to_string(),
        kind: "hook".to_string(),
        install: PluginInstallConfig::default(),
        config: PluginSettingsConfig {
            settings_key: settings_key.to_string(),
            settings_value: serde_json::Map::new(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::frontmatter::FrontmatterParser;

    #[test]
    fn skill_document_parses() {
        let parsed = FrontmatterParser::parse(&skill_document("demo", "1.2.3"));
        let frontmatter = parsed.frontmatter.expect("frontmatter");
        assert_eq!(frontmatter.name, "demo");
        assert_eq!(frontmatter.metadata.version, "1.2.3");
        assert_eq!(frontmatter.metadata.tags, Some(vec!["testing".to_string()]));
    }
}
