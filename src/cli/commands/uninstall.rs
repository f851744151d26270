//! skm uninstall - Remove an installed skill

use clap::Args;
use colored::Colorize;

use crate::app::AppContext;
use crate::cli::output::finish;
use crate::cli::prompt;
use crate::error::{Result, SkmError};
use crate::ops::{ListSkills, UninstallSkill};

#[derive(Args, Debug)]
pub struct UninstallArgs {
    /// Installed skill name; prompts when omitted
    pub name: Option<String>,

    /// Skip the confirmation prompt
    #[arg(long, short)]
    pub yes: bool,
}

pub fn run(ctx: &AppContext, args: &UninstallArgs) -> Result<()> {
    let name = match &args.name {
        Some(name) => name.clone(),
        None => match pick_installed(ctx)? {
            Some(name) => name,
            None => return Ok(()),
        },
    };

    let ask = !args.yes && !ctx.is_json() && prompt::is_interactive();
    if ask && !prompt::confirm(&format!("Uninstall skill \"{name}\"?"), false)? {
        eprintln!("Cancelled.");
        return Ok(());
    }
    uninstall(ctx, &name)
}

pub(crate) fn uninstall(ctx: &AppContext, name: &str) -> Result<()> {
    let progress = ctx.progress();
    finish(ctx.output_format, UninstallSkill::new(&ctx.store).execute(name, &progress))?;
    if !ctx.is_json() {
        println!("{} Uninstalled {}", "✓".green(), name.bold());
    }
    Ok(())
}

pub(crate) fn pick_installed(ctx: &AppContext) -> Result<Option<String>> {
    if !prompt::is_interactive() {
        return Err(SkmError::InvalidInput("A skill name must be provided".to_string()));
    }
    let installed = ListSkills::new(&ctx.store).execute().into_result()?;
    if installed.is_empty() {
        eprintln!("No skills installed.");
        return Ok(None);
    }
    let labels: Vec<String> = installed
        .iter()
        .map(|skill| format!("{} (v{})", skill.name(), skill.version()))
        .collect();
    let choice = prompt::select("Select a skill to uninstall", &labels)?;
    Ok(choice.map(|index| installed[index].name().to_string()))
}
