//! Core skill types and logic

pub mod frontmatter;
pub mod manifest;
pub mod validation;
pub mod version;

pub use frontmatter::{FrontmatterMetadata, FrontmatterParser, ParsedSkillFile, SkillFrontmatter};
pub use manifest::{
    InstalledMcp, InstalledPlugin, InstalledSkill, McpManifest, McpServerEntry, PluginManifest,
    RegistryData, SkillManifest,
};
pub use validation::{SKILL_FILE, ValidationResult, validate, validate_skill_path};
pub use version::{NOT_IN_REGISTRY, is_newer};
