//! skm validate - Check a skill directory against the SKILL.md schema

use std::path::{Path, PathBuf};

use clap::Args;
use serde::Serialize;

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, emit_human, emit_json};
use crate::core::validation::{SKILL_FILE, ValidationResult, validate_skill_path};
use crate::error::{Result, SkmError};

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Skill directory, or the SKILL.md inside it
    #[arg(default_value = ".")]
    pub path: PathBuf,
}

#[derive(Serialize)]
struct ValidateReport<'a> {
    path: String,
    #[serde(flatten)]
    result: &'a ValidationResult,
}

pub fn run(ctx: &AppContext, args: &ValidateArgs) -> Result<()> {
    let dir = skill_dir(&args.path);
    let result = validate_skill_path(&dir);

    if ctx.is_json() {
        emit_json(&ValidateReport {
            path: dir.display().to_string(),
            result: &result,
        })?;
    } else {
        emit_human(render(&dir, &result));
    }

    if result.valid {
        Ok(())
    } else {
        Err(SkmError::InvalidInput(format!(
            "{} has {} validation error(s)",
            dir.display(),
            result.errors.len()
        )))
    }
}

fn skill_dir(path: &Path) -> PathBuf {
    if path.file_name().is_some_and(|name| name == SKILL_FILE) {
        path.parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
    } else {
        path.to_path_buf()
    }
}

fn render(dir: &Path, result: &ValidationResult) -> HumanLayout {
    let mut layout = HumanLayout::new();
    layout.title("Validation");
    layout.kv("Path", &dir.display().to_string());

    if !result.errors.is_empty() {
        layout.section("Errors");
        for error in &result.errors {
            layout.bullet(error);
        }
    }
    if !result.warnings.is_empty() {
        layout.section("Warnings");
        for warning in &result.warnings {
            layout.bullet(warning);
        }
    }

    layout.section("Status");
    layout.bullet(if result.valid { "OK" } else { "INVALID" });
    layout
}
