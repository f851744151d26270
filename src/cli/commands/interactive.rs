//! skm interactive - Menu-driven mode

use std::collections::BTreeMap;

use colored::Colorize;

use crate::app::AppContext;
use crate::cli::commands::{install, list, mcp, outdated, plugin, search, uninstall};
use crate::cli::prompt;
use crate::error::{Result, SkmError};
use crate::extensions::{McpService, PluginService};
use crate::ops::InstallRequest;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    InstallSkill,
    InstallFromRepo,
    UninstallSkill,
    ListSkills,
    Search,
    Outdated,
    InstallMcp,
    UninstallMcp,
    InstallPlugin,
    UninstallPlugin,
    Quit,
}

const MENU: [(Action, &str); 11] = [
    (Action::InstallSkill, "Install a skill"),
    (Action::InstallFromRepo, "Install a skill from a git URL"),
    (Action::UninstallSkill, "Uninstall a skill"),
    (Action::ListSkills, "List installed skills"),
    (Action::Search, "Search the registry"),
    (Action::Outdated, "Check for skill updates"),
    (Action::InstallMcp, "Install an MCP server"),
    (Action::UninstallMcp, "Uninstall an MCP server"),
    (Action::InstallPlugin, "Install a plugin"),
    (Action::UninstallPlugin, "Uninstall a plugin"),
    (Action::Quit, "Quit"),
];

pub fn run(ctx: &AppContext) -> Result<()> {
    if ctx.is_json() || !prompt::is_interactive() {
        return Err(SkmError::InvalidInput(
            "interactive mode needs a terminal; run `skm --help` for commands".to_string(),
        ));
    }

    println!("{}", "skm - skills, MCP servers and plugins for Claude".bold());
    let labels: Vec<String> = MENU.iter().map(|(_, label)| (*label).to_string()).collect();
    loop {
        println!();
        let Some(index) = prompt::select("What would you like to do?", &labels)? else {
            return Ok(());
        };
        let action = MENU[index].0;
        if action == Action::Quit {
            return Ok(());
        }
        // A failed action reports and returns to the menu.
        if let Err(err) = dispatch(ctx, action) {
            eprintln!("{} {err}", "Error:".red());
        }
    }
}

fn dispatch(ctx: &AppContext, action: Action) -> Result<()> {
    match action {
        Action::InstallSkill => match install::pick_from_registry(ctx)? {
            Some(name) => install::install(ctx, &InstallRequest::by_name(name)),
            None => Ok(()),
        },
        Action::InstallFromRepo => {
            let url = prompt::input("Git repository URL", false)?;
            if url.is_empty() {
                return Ok(());
            }
            install::install(ctx, &InstallRequest::from_repo(url))
        }
        Action::UninstallSkill => match uninstall::pick_installed(ctx)? {
            Some(name) if prompt::confirm(&format!("Uninstall skill \"{name}\"?"), false)? => {
                uninstall::uninstall(ctx, &name)
            }
            _ => Ok(()),
        },
        Action::ListSkills => list::run(ctx, &list::ListArgs { names: false }),
        Action::Search => {
            let query = prompt::input("Search query (empty for all)", false)?;
            let args = search::SearchArgs {
                query: (!query.is_empty()).then_some(query),
                limit: None,
            };
            search::run(ctx, &args)
        }
        Action::Outdated => outdated::run(ctx, &outdated::OutdatedArgs { all: true }),
        Action::InstallMcp => {
            let names: Vec<String> = ctx
                .mcp
                .list_available()?
                .into_iter()
                .map(|mcp| mcp.name)
                .collect();
            match prompt::select("Select an MCP server", &names)? {
                Some(index) => mcp::install(ctx, &names[index], &BTreeMap::new()),
                None => Ok(()),
            }
        }
        Action::UninstallMcp => {
            let names: Vec<String> = ctx
                .mcp
                .list_installed()?
                .into_iter()
                .map(|mcp| mcp.name)
                .collect();
            match prompt::select("Select an MCP server to remove", &names)? {
                Some(index) => mcp::uninstall(ctx, &names[index]),
                None => Ok(()),
            }
        }
        Action::InstallPlugin => {
            let names: Vec<String> = ctx
                .plugins
                .list_available()?
                .into_iter()
                .filter(|plugin| !ctx.plugins.is_installed(&plugin.name))
                .map(|plugin| plugin.name)
                .collect();
            match prompt::select("Select a plugin", &names)? {
                Some(index) => plugin::install(ctx, &names[index]),
                None => Ok(()),
            }
        }
        Action::UninstallPlugin => {
            let names: Vec<String> = ctx
                .plugins
                .list_installed()?
                .into_iter()
                .map(|plugin| plugin.name)
                .collect();
            match prompt::select("Select a plugin to remove", &names)? {
                Some(index) => plugin::uninstall(ctx, &names[index]),
                None => Ok(()),
            }
        }
        Action::Quit => Ok(()),
    }
}
