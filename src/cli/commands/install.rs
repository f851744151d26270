//! skm install - Install a skill

use clap::Args;
use colored::Colorize;

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, emit_human, finish};
use crate::cli::prompt;
use crate::core::manifest::CUSTOM_VERSION;
use crate::error::{Result, SkmError};
use crate::ops::{InstallRequest, InstallSkill, SearchSkills};
use crate::storage::{GitTransport, SkillStore};
use crate::utils::format::truncate_string;

#[derive(Args, Debug)]
pub struct InstallArgs {
    /// Registry skill name
    pub name: Option<String>,

    /// Install straight from a git URL instead of the registry
    #[arg(long, short, value_name = "URL")]
    pub repo: Option<String>,
}

pub fn run(ctx: &AppContext, args: &InstallArgs) -> Result<()> {
    let request = if args.name.is_none() && args.repo.is_none() {
        match pick_from_registry(ctx)? {
            Some(name) => InstallRequest::by_name(name),
            None => return Ok(()),
        }
    } else {
        InstallRequest {
            skill_name: args.name.clone(),
            repo_url: args.repo.clone(),
        }
    };
    install(ctx, &request)
}

pub(crate) fn install(ctx: &AppContext, request: &InstallRequest) -> Result<()> {
    let progress = ctx.progress();
    let outcome = InstallSkill::new(&ctx.store, &*ctx.git, &*ctx.registry).execute(request, &progress);
    let installed = finish(ctx.output_format, outcome)?;
    if ctx.is_json() {
        return Ok(());
    }

    let mut layout = HumanLayout::new();
    layout.push_line(format!(
        "{} Installed {}",
        "✓".green(),
        installed.name().bold()
    ));
    layout.kv("Version", installed.version());
    layout.kv("Path", &installed.path.display().to_string());
    if installed.version() == CUSTOM_VERSION
        && let Some(tag) = ctx.git.latest_tag(&installed.manifest.repository)
    {
        layout.kv("Latest tag", &tag);
    }
    emit_human(layout);
    Ok(())
}

/// Menu of registry skills not installed yet; `None` when the user cancels
/// or everything is already installed.
pub(crate) fn pick_from_registry(ctx: &AppContext) -> Result<Option<String>> {
    if !prompt::is_interactive() {
        return Err(SkmError::InvalidInput(
            "Either a skill name or --repo must be provided".to_string(),
        ));
    }
    let available = SearchSkills::new(&*ctx.registry).execute(None).into_result()?;

    let candidates: Vec<_> = available
        .into_iter()
        .filter(|skill| !ctx.store.skill_exists(&skill.name))
        .collect();
    if candidates.is_empty() {
        eprintln!("Every registry skill is already installed.");
        return Ok(None);
    }

    let labels: Vec<String> = candidates
        .iter()
        .map(|skill| {
            format!(
                "{} {} - {}",
                skill.name,
                format!("v{}", skill.version).dimmed(),
                truncate_string(&skill.description, 60)
            )
        })
        .collect();
    let choice = prompt::select("Select a skill to install", &labels)?;
    Ok(choice.map(|index| candidates[index].name.clone()))
}
