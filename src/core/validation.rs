//! Skill validation

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::debug;

use super::frontmatter::{FrontmatterParser, SkillFrontmatter};

/// Primary document every skill directory must contain.
pub const SKILL_FILE: &str = "SKILL.md";

pub const MAX_DESCRIPTION_LENGTH: usize = 1024;

static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9-]+$").expect("valid regex"));
static SEMVER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\d+\.\d+$").expect("valid regex"));

/// Outcome of validating a skill. Warnings never affect `valid`.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    fn invalid(error: String) -> Self {
        Self {
            valid: false,
            errors: vec![error],
            warnings: Vec::new(),
        }
    }
}

/// Validate parsed frontmatter against the skill schema.
#[must_use]
pub fn validate(frontmatter: Option<&SkillFrontmatter>) -> ValidationResult {
    let Some(fm) = frontmatter else {
        return ValidationResult::invalid("Missing or invalid YAML frontmatter".to_string());
    };

    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if fm.name.is_empty() {
        errors.push("Missing required field: name".to_string());
    } else if !NAME_PATTERN.is_match(&fm.name) {
        errors.push("Name must contain only lowercase letters, numbers, and hyphens".to_string());
    }

    if fm.description.is_empty() {
        errors.push("Missing required field: description".to_string());
    } else if fm.description.chars().count() > MAX_DESCRIPTION_LENGTH {
        errors.push(format!(
            "Description exceeds maximum length of {MAX_DESCRIPTION_LENGTH} characters"
        ));
    }

    if fm.license.is_empty() {
        errors.push("Missing required field: license".to_string());
    }

    // metadata.tags is typed as a list, so the array rule holds by construction.
    if fm.metadata.author.is_empty() {
        errors.push("Missing required field: metadata.author".to_string());
    }

    if fm.metadata.version.is_empty() {
        errors.push("Missing required field: metadata.version".to_string());
    } else if !SEMVER_PATTERN.is_match(&fm.metadata.version) {
        warnings.push("Version should follow semantic versioning (e.g., 1.0.0)".to_string());
    }

    ValidationResult {
        valid: errors.is_empty(),
        errors,
        warnings,
    }
}

/// Validate the `SKILL.md` inside a skill directory.
#[must_use]
pub fn validate_skill_path(skill_path: &Path) -> ValidationResult {
    let skill_file = skill_path.join(SKILL_FILE);
    if !skill_file.exists() {
        return ValidationResult::invalid(format!(
            "{SKILL_FILE} not found at {}",
            skill_file.display()
        ));
    }

    match std::fs::read_to_string(&skill_file) {
        Ok(content) => {
            let parsed = FrontmatterParser::parse(&content);
            let result = validate(parsed.frontmatter.as_ref());
            debug!(
                path = %skill_file.display(),
                valid = result.valid,
                errors = result.errors.len(),
                warnings = result.warnings.len(),
                "validated skill"
            );
            result
        }
        Err(err) => ValidationResult::invalid(format!("Failed to read {SKILL_FILE}: {err}")),
    }
}
