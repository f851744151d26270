//! Non-skill extensions: MCP servers and plugins.
//!
//! Both clone a repository into their own install directory and then record
//! a launch entry in the shared settings document. The key each one writes
//! is decided here and nowhere else.

pub mod mcp;
pub mod plugin;
pub mod process;

use std::path::Path;

pub use mcp::{LocalMcpService, McpService};
pub use plugin::{LocalPluginService, PluginService};

/// Commands declared as `./something` run from the install directory.
#[must_use]
pub fn resolve_relative_command(command: &str, install_path: &Path) -> String {
    command.strip_prefix("./").map_or_else(
        || command.to_string(),
        |relative| install_path.join(relative).to_string_lossy().into_owned(),
    )
}
