//! skm list - List installed skills

use clap::Args;
use tracing::debug;

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, emit_human, finish};
use crate::core::manifest::InstalledSkill;
use crate::error::Result;
use crate::ops::ListSkills;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only names, one per line
    #[arg(long)]
    pub names: bool,
}

pub fn run(ctx: &AppContext, args: &ListArgs) -> Result<()> {
    debug!(target: "list", mode = ?ctx.output_format, "output mode selected");

    let skills = finish(ctx.output_format, ListSkills::new(&ctx.store).execute())?;
    if ctx.is_json() {
        return Ok(());
    }
    if args.names {
        for skill in &skills {
            println!("{}", skill.name());
        }
        return Ok(());
    }
    emit_human(render(&skills));
    Ok(())
}

fn render(skills: &[InstalledSkill]) -> HumanLayout {
    let mut layout = HumanLayout::new();
    if skills.is_empty() {
        layout.push_line("No skills installed. Try `skm search` to browse the registry.");
        return layout;
    }
    layout.title(&format!("Installed skills ({})", skills.len()));
    for skill in skills {
        layout.section(skill.name());
        layout.kv("Version", skill.version());
        if !skill.manifest.description.is_empty() {
            layout.kv("Description", &skill.manifest.description);
        }
        layout.kv(
            "Installed",
            &skill.installed_at.format("%Y-%m-%d %H:%M").to_string(),
        );
        layout.kv("Path", &skill.path.display().to_string());
        layout.blank();
    }
    layout
}
