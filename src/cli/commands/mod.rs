//! CLI command implementations
//!
//! Each subcommand has its own module with:
//! - Args struct for command-line arguments
//! - run() function to execute the command

use clap::Subcommand;

pub mod install;
pub mod interactive;
pub mod list;
pub mod mcp;
pub mod outdated;
pub mod plugin;
pub mod search;
pub mod uninstall;
pub mod validate;

use crate::app::AppContext;
use crate::error::Result;

pub fn run(ctx: &AppContext, command: &Commands) -> Result<()> {
    match command {
        Commands::Install(args) => install::run(ctx, args),
        Commands::Uninstall(args) => uninstall::run(ctx, args),
        Commands::List(args) => list::run(ctx, args),
        Commands::Search(args) => search::run(ctx, args),
        Commands::Outdated(args) => outdated::run(ctx, args),
        Commands::Validate(args) => validate::run(ctx, args),
        Commands::Mcp(args) => mcp::run(ctx, args),
        Commands::Plugin(args) => plugin::run(ctx, args),
        Commands::Interactive => interactive::run(ctx),
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Install a skill from the registry or a git URL
    Install(install::InstallArgs),

    /// Remove an installed skill
    Uninstall(uninstall::UninstallArgs),

    /// List installed skills
    List(list::ListArgs),

    /// Search the registry
    Search(search::SearchArgs),

    /// Show installed skills with newer registry versions
    Outdated(outdated::OutdatedArgs),

    /// Check a local skill directory
    Validate(validate::ValidateArgs),

    /// Manage MCP servers
    Mcp(mcp::McpArgs),

    /// Manage plugins
    Plugin(plugin::PluginArgs),

    /// Menu-driven mode (the default without a subcommand)
    Interactive,
}
