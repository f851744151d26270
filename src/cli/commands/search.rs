//! skm search - Search the registry

use clap::Args;
use colored::Colorize;

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, emit_human, finish};
use crate::core::manifest::SkillManifest;
use crate::error::Result;
use crate::ops::{ProgressReporter, SearchSkills};
use crate::storage::SkillStore;
use crate::utils::format::{format_tags, truncate_string};

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Matched against name, description and tags; omit to list everything
    pub query: Option<String>,

    /// Maximum number of results
    #[arg(long, short)]
    pub limit: Option<usize>,
}

pub fn run(ctx: &AppContext, args: &SearchArgs) -> Result<()> {
    let progress = ctx.progress();
    progress.start("Fetching skill registry...");
    let outcome = SearchSkills::new(&*ctx.registry).execute(args.query.as_deref());
    progress.stop("Fetched skill registry");

    let mut outcome = outcome;
    if let (Some(limit), Some(found)) = (args.limit, outcome.value.as_mut()) {
        found.truncate(limit);
    }
    let found = finish(ctx.output_format, outcome)?;
    if ctx.is_json() {
        return Ok(());
    }
    emit_human(render(&found, args.query.as_deref(), |name| {
        ctx.store.skill_exists(name)
    }));
    Ok(())
}

fn render(
    skills: &[SkillManifest],
    query: Option<&str>,
    is_installed: impl Fn(&str) -> bool,
) -> HumanLayout {
    let mut layout = HumanLayout::new();
    if skills.is_empty() {
        match query {
            Some(query) => layout.push_line(format!("No skills match \"{query}\".")),
            None => layout.push_line("The registry has no skills."),
        };
        return layout;
    }

    layout.title(&format!("Found {} skill(s)", skills.len()));
    for skill in skills {
        let marker = if is_installed(&skill.name) {
            format!(" {}", "[installed]".green())
        } else {
            String::new()
        };
        layout.push_line(format!(
            "{} {}{marker}",
            skill.name.bold(),
            format!("v{}", skill.version).dimmed()
        ));
        layout.push_line(format!("  {}", truncate_string(&skill.description, 76)));
        layout.kv("  Tags", &format_tags(&skill.tags));
        layout.blank();
    }
    layout
}
