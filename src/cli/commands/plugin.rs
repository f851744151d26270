//! skm plugin - Manage plugins

use std::collections::HashSet;

use clap::{Args, Subcommand};
use colored::Colorize;
use serde::Serialize;

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, emit_human, emit_json, finish};
use crate::core::manifest::{InstalledPlugin, PluginManifest};
use crate::error::Result;
use crate::extensions::PluginService;
use crate::ops::{InstallPlugin, UninstallPlugin, UpdatePlugin};
use crate::utils::format::truncate_string;

#[derive(Args, Debug)]
pub struct PluginArgs {
    #[command(subcommand)]
    pub command: PluginCommand,
}

#[derive(Subcommand, Debug)]
pub enum PluginCommand {
    /// Registry plugins and what is installed
    List,

    /// Clone a plugin and write its settings entry
    Install(PluginNameArgs),

    /// Remove a plugin and its settings entry
    Uninstall(PluginNameArgs),

    /// Pull a plugin and refresh its settings entry
    Update(PluginNameArgs),
}

#[derive(Args, Debug)]
pub struct PluginNameArgs {
    pub name: String,
}

pub fn run(ctx: &AppContext, args: &PluginArgs) -> Result<()> {
    match &args.command {
        PluginCommand::List => list(ctx),
        PluginCommand::Install(name_args) => install(ctx, &name_args.name),
        PluginCommand::Uninstall(name_args) => uninstall(ctx, &name_args.name),
        PluginCommand::Update(name_args) => update(ctx, &name_args.name),
    }
}

#[derive(Serialize)]
struct PluginListing<'a> {
    available: &'a [PluginManifest],
    installed: &'a [InstalledPlugin],
}

fn list(ctx: &AppContext) -> Result<()> {
    let available = ctx.plugins.list_available()?;
    let installed = ctx.plugins.list_installed()?;
    if ctx.is_json() {
        return emit_json(&PluginListing {
            available: &available,
            installed: &installed,
        });
    }

    let installed_names: HashSet<&str> =
        installed.iter().map(|plugin| plugin.name.as_str()).collect();
    let mut layout = HumanLayout::new();
    layout.section("Plugins");
    if available.is_empty() {
        layout.push_line("(none)");
    }
    for plugin in &available {
        let marker = if installed_names.contains(plugin.name.as_str()) {
            format!(" {}", "[installed]".green())
        } else {
            String::new()
        };
        layout.bullet(&format!(
            "{} ({}){marker} - {}",
            plugin.name.bold(),
            plugin.kind,
            truncate_string(&plugin.description, 60)
        ));
    }
    emit_human(layout);
    Ok(())
}

pub(crate) fn install(ctx: &AppContext, name: &str) -> Result<()> {
    let progress = ctx.progress();
    let manifest = finish(ctx.output_format, InstallPlugin::new(&ctx.plugins).execute(name, &progress))?;
    if !ctx.is_json() {
        println!(
            "{} Installed plugin {} (settings key `{}`)",
            "✓".green(),
            manifest.name.bold(),
            manifest.config.settings_key
        );
    }
    Ok(())
}

pub(crate) fn uninstall(ctx: &AppContext, name: &str) -> Result<()> {
    let progress = ctx.progress();
    finish(ctx.output_format, UninstallPlugin::new(&ctx.plugins).execute(name, &progress))?;
    if !ctx.is_json() {
        println!("{} Uninstalled plugin {}", "✓".green(), name.bold());
    }
    Ok(())
}

pub(crate) fn update(ctx: &AppContext, name: &str) -> Result<()> {
    let progress = ctx.progress();
    let manifest = finish(ctx.output_format, UpdatePlugin::new(&ctx.plugins).execute(name, &progress))?;
    if !ctx.is_json() {
        println!("{} Updated plugin {}", "✓".green(), manifest.name.bold());
    }
    Ok(())
}
