//! skm mcp - Manage MCP servers

use std::collections::{BTreeMap, HashSet};

use clap::{Args, Subcommand};
use colored::Colorize;
use serde::Serialize;

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, emit_human, emit_json, finish};
use crate::cli::prompt;
use crate::core::manifest::{InstalledMcp, McpEnvVar, McpManifest};
use crate::core::version::NOT_IN_REGISTRY;
use crate::error::{Result, SkmError};
use crate::extensions::McpService;
use crate::ops::{InstallMcp, McpStatus, UninstallMcp, UpdateMcp};
use crate::utils::format::truncate_string;

#[derive(Args, Debug)]
pub struct McpArgs {
    #[command(subcommand)]
    pub command: McpCommand,
}

#[derive(Subcommand, Debug)]
pub enum McpCommand {
    /// Registry MCP servers and what is installed
    List,

    /// Clone, build and register an MCP server
    Install(McpInstallArgs),

    /// Remove an MCP server and its settings entry
    Uninstall(McpNameArgs),

    /// Pull, rebuild and re-register an MCP server
    Update(McpNameArgs),

    /// Registry versions of installed MCP servers
    Outdated,
}

#[derive(Args, Debug)]
pub struct McpInstallArgs {
    pub name: String,

    /// Environment value for the server, repeatable
    #[arg(long = "env", short, value_name = "KEY=VALUE", value_parser = parse_env_pair)]
    pub env: Vec<(String, String)>,
}

#[derive(Args, Debug)]
pub struct McpNameArgs {
    pub name: String,
}

pub fn run(ctx: &AppContext, args: &McpArgs) -> Result<()> {
    match &args.command {
        McpCommand::List => list(ctx),
        McpCommand::Install(install_args) => {
            let flags: BTreeMap<String, String> = install_args.env.iter().cloned().collect();
            install(ctx, &install_args.name, &flags)
        }
        McpCommand::Uninstall(name_args) => uninstall(ctx, &name_args.name),
        McpCommand::Update(name_args) => update(ctx, &name_args.name),
        McpCommand::Outdated => outdated(ctx),
    }
}

fn parse_env_pair(raw: &str) -> std::result::Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got `{raw}`")),
    }
}

#[derive(Serialize)]
struct McpListing<'a> {
    available: &'a [McpManifest],
    installed: &'a [InstalledMcp],
}

fn list(ctx: &AppContext) -> Result<()> {
    let available = ctx.mcp.list_available()?;
    let installed = ctx.mcp.list_installed()?;
    if ctx.is_json() {
        return emit_json(&McpListing {
            available: &available,
            installed: &installed,
        });
    }

    let installed_names: HashSet<&str> = installed.iter().map(|mcp| mcp.name.as_str()).collect();
    let mut layout = HumanLayout::new();
    layout.section("Available MCP servers");
    if available.is_empty() {
        layout.push_line("(none)");
    }
    for mcp in &available {
        let marker = if installed_names.contains(mcp.name.as_str()) {
            format!(" {}", "[installed]".green())
        } else {
            String::new()
        };
        layout.bullet(&format!(
            "{} {}{marker} - {}",
            mcp.name.bold(),
            mcp.version.as_deref().unwrap_or("-").dimmed(),
            truncate_string(&mcp.description, 60)
        ));
    }
    layout.blank();
    layout.section("Installed MCP servers");
    if installed.is_empty() {
        layout.push_line("(none)");
    }
    for mcp in &installed {
        layout.kv(&mcp.name, &mcp.path.display().to_string());
    }
    emit_human(layout);
    Ok(())
}

pub(crate) fn install(ctx: &AppContext, name: &str, flags: &BTreeMap<String, String>) -> Result<()> {
    let ask = !ctx.is_json() && prompt::is_interactive();
    let progress = ctx.progress();
    let outcome = InstallMcp::new(&ctx.mcp).execute_with(name, &progress, |manifest| {
        collect_env(manifest, flags, |key| std::env::var(key).ok(), |var| {
            if ask { ask_for(var).map(Some) } else { Ok(None) }
        })
    });
    let manifest = finish(ctx.output_format, outcome)?;
    if !ctx.is_json() {
        println!("{} Installed MCP {}", "✓".green(), manifest.name.bold());
        println!("  Restart Claude to load the new server.");
    }
    Ok(())
}

pub(crate) fn uninstall(ctx: &AppContext, name: &str) -> Result<()> {
    let progress = ctx.progress();
    finish(ctx.output_format, UninstallMcp::new(&ctx.mcp).execute(name, &progress))?;
    if !ctx.is_json() {
        println!("{} Uninstalled MCP {}", "✓".green(), name.bold());
    }
    Ok(())
}

pub(crate) fn update(ctx: &AppContext, name: &str) -> Result<()> {
    let progress = ctx.progress();
    let manifest = finish(ctx.output_format, UpdateMcp::new(&ctx.mcp).execute(name, &progress))?;
    if !ctx.is_json() {
        println!("{} Updated MCP {}", "✓".green(), manifest.name.bold());
    }
    Ok(())
}

fn outdated(ctx: &AppContext) -> Result<()> {
    let entries = finish(ctx.output_format, McpStatus::new(&ctx.mcp).execute())?;
    if ctx.is_json() {
        return Ok(());
    }
    let mut layout = HumanLayout::new();
    if entries.is_empty() {
        layout.push_line("No MCP servers installed.");
    } else {
        layout.section("Installed MCP servers");
        for entry in &entries {
            let version = if entry.latest_version == NOT_IN_REGISTRY {
                entry.latest_version.dimmed().to_string()
            } else {
                format!("latest {}", entry.latest_version)
            };
            layout.kv(&entry.name, &version);
        }
    }
    emit_human(layout);
    Ok(())
}

/// Values for the manifest's declared variables: `--env` flags first, then
/// the process environment, then `ask`. Unanswered variables are left out
/// so manifest defaults and the required check still apply.
fn collect_env(
    manifest: &McpManifest,
    flags: &BTreeMap<String, String>,
    lookup: impl Fn(&str) -> Option<String>,
    ask: impl Fn(&McpEnvVar) -> Result<Option<String>>,
) -> Result<BTreeMap<String, String>> {
    let mut env = flags.clone();
    for var in &manifest.config.env_vars {
        if env.get(&var.name).is_some_and(|value| !value.is_empty()) {
            continue;
        }
        let value = match lookup(&var.name).filter(|value| !value.is_empty()) {
            Some(value) => Some(value),
            None => ask(var)?,
        };
        if let Some(value) = value.filter(|value| !value.is_empty()) {
            env.insert(var.name.clone(), value);
        }
    }
    Ok(env)
}

fn ask_for(var: &McpEnvVar) -> Result<String> {
    let mut label = var.name.clone();
    if !var.description.is_empty() {
        label = format!("{label} ({})", var.description);
    }
    if let Some(default) = &var.default {
        label = format!("{label} [default: {default}]");
    } else if !var.required {
        label = format!("{label} [optional]");
    }
    let value = prompt::input(&label, var.secret)?;
    if value.is_empty() && var.required && var.default.is_none() {
        return Err(SkmError::InvalidInput(format!("{} is required", var.name)));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures::registry_mcp;

    fn manifest() -> McpManifest {
        let mut manifest = registry_mcp("search");
        manifest.config.env_vars = vec![
            McpEnvVar {
                name: "API_KEY".to_string(),
                description: "key".to_string(),
                required: true,
                default: None,
                secret: true,
            },
            McpEnvVar {
                name: "REGION".to_string(),
                description: String::new(),
                required: false,
                default: Some("eu".to_string()),
                secret: false,
            },
        ];
        manifest
    }

    #[test]
    fn parses_env_pairs() {
        assert_eq!(
            parse_env_pair("A=b=c"),
            Ok(("A".to_string(), "b=c".to_string()))
        );
        assert!(parse_env_pair("novalue").is_err());
        assert!(parse_env_pair("=x").is_err());
    }

    #[test]
    fn flags_win_over_environment() {
        let flags = BTreeMap::from([("API_KEY".to_string(), "flag".to_string())]);
        let env = collect_env(&manifest(), &flags, |_| Some("env".to_string()), |_| Ok(None))
            .unwrap();
        assert_eq!(env["API_KEY"], "flag");
        assert_eq!(env["REGION"], "env");
    }

    #[test]
    fn asks_only_for_unset_variables() {
        let env = collect_env(
            &manifest(),
            &BTreeMap::new(),
            |key| (key == "REGION").then(|| "us".to_string()),
            |var| {
                assert_eq!(var.name, "API_KEY");
                Ok(Some("typed".to_string()))
            },
        )
        .unwrap();
        assert_eq!(env["API_KEY"], "typed");
        assert_eq!(env["REGION"], "us");
    }

    #[test]
    fn unanswered_variables_are_omitted() {
        let env = collect_env(&manifest(), &BTreeMap::new(), |_| None, |_| Ok(None)).unwrap();
        assert!(env.is_empty());
    }
}
