//! MCP server use cases.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::core::manifest::McpManifest;
use crate::core::version::NOT_IN_REGISTRY;
use crate::error::{Result, SkmError};
use crate::extensions::mcp::McpService;
use crate::ops::{Outcome, ProgressReporter};

pub struct InstallMcp<'a> {
    service: &'a dyn McpService,
}

impl<'a> InstallMcp<'a> {
    pub fn new(service: &'a dyn McpService) -> Self {
        Self { service }
    }

    pub fn execute(&self, name: &str, progress: &dyn ProgressReporter) -> Outcome<McpManifest> {
        self.execute_with(name, progress, |_| Ok(BTreeMap::new()))
    }

    /// Like [`execute`](Self::execute), asking `collect_env` for variable
    /// values once the manifest is known and the server is not yet installed.
    pub fn execute_with<F>(
        &self,
        name: &str,
        progress: &dyn ProgressReporter,
        collect_env: F,
    ) -> Outcome<McpManifest>
    where
        F: FnOnce(&McpManifest) -> Result<BTreeMap<String, String>>,
    {
        self.run(name, progress, collect_env).into()
    }

    fn run<F>(&self, name: &str, progress: &dyn ProgressReporter, collect_env: F) -> Result<McpManifest>
    where
        F: FnOnce(&McpManifest) -> Result<BTreeMap<String, String>>,
    {
        progress.start(&format!("Searching for MCP \"{name}\"..."));
        let manifest = match self.service.find_by_name(name) {
            Ok(Some(manifest)) => manifest,
            Ok(None) => {
                let message = format!("MCP \"{name}\" not found in registry");
                progress.stop(&message);
                return Err(SkmError::NotFound(message));
            }
            Err(err) => {
                progress.stop("Failed to reach skill registry");
                return Err(err);
            }
        };
        progress.stop(&format!("Found MCP: {}", manifest.name));

        if self.service.is_installed(name)? {
            return Err(SkmError::AlreadyInstalled(format!(
                "MCP \"{name}\" is already installed"
            )));
        }

        let env = collect_env(&manifest)?;
        progress.start(&format!("Installing {}...", manifest.name));
        match self.service.install(&manifest, &env) {
            Ok(()) => {
                progress.stop(&format!("Installed {}", manifest.name));
                Ok(manifest)
            }
            Err(err) => {
                progress.stop("Failed to install MCP");
                Err(err.context("Failed to install MCP"))
            }
        }
    }
}

pub struct UninstallMcp<'a> {
    service: &'a dyn McpService,
}

impl<'a> UninstallMcp<'a> {
    pub fn new(service: &'a dyn McpService) -> Self {
        Self { service }
    }

    pub fn execute(&self, name: &str, progress: &dyn ProgressReporter) -> Outcome<()> {
        self.run(name, progress).into()
    }

    fn run(&self, name: &str, progress: &dyn ProgressReporter) -> Result<()> {
        if !self.service.is_installed(name)? {
            return Err(SkmError::NotInstalled(format!("MCP \"{name}\" is not installed")));
        }

        progress.start(&format!("Uninstalling {name}..."));
        match self.service.uninstall(name) {
            Ok(()) => {
                progress.stop(&format!("Uninstalled {name}"));
                Ok(())
            }
            Err(err) => {
                progress.stop("Failed to uninstall MCP");
                Err(err.context("Failed to uninstall MCP"))
            }
        }
    }
}

pub struct UpdateMcp<'a> {
    service: &'a dyn McpService,
}

impl<'a> UpdateMcp<'a> {
    pub fn new(service: &'a dyn McpService) -> Self {
        Self { service }
    }

    pub fn execute(&self, name: &str, progress: &dyn ProgressReporter) -> Outcome<McpManifest> {
        self.run(name, progress).into()
    }

    fn run(&self, name: &str, progress: &dyn ProgressReporter) -> Result<McpManifest> {
        progress.start(&format!("Updating MCP \"{name}\"..."));

        if !self.service.is_installed(name)? {
            let message = format!("MCP \"{name}\" is not installed");
            progress.stop(&message);
            return Err(SkmError::NotInstalled(message));
        }
        let Some(manifest) = self.service.find_by_name(name)? else {
            let message = format!("MCP \"{name}\" not found in registry");
            progress.stop(&message);
            return Err(SkmError::NotFound(message));
        };

        match self.service.update(name, &manifest) {
            Ok(()) => {
                progress.stop(&format!("Updated {}", manifest.name));
                Ok(manifest)
            }
            Err(err) => {
                progress.stop("Failed to update MCP");
                Err(err.context("Failed to update MCP"))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct McpStatusEntry {
    pub name: String,
    pub latest_version: String,
}

/// Registry version of every registered MCP server. Installs record no
/// version of their own, so there is nothing to compare against.
pub struct McpStatus<'a> {
    service: &'a dyn McpService,
}

impl<'a> McpStatus<'a> {
    pub fn new(service: &'a dyn McpService) -> Self {
        Self { service }
    }

    pub fn execute(&self) -> Outcome<Vec<McpStatusEntry>> {
        self.run().into()
    }

    fn run(&self) -> Result<Vec<McpStatusEntry>> {
        let installed = self.service.list_installed()?;
        let available = self.service.list_available()?;
        let versions: HashMap<&str, &str> = available
            .iter()
            .filter_map(|mcp| Some((mcp.name.as_str(), mcp.version.as_deref()?)))
            .collect();

        Ok(installed
            .into_iter()
            .map(|mcp| McpStatusEntry {
                latest_version: versions
                    .get(mcp.name.as_str())
                    .copied()
                    .unwrap_or(NOT_IN_REGISTRY)
                    .to_string(),
                name: mcp.name,
            })
            .collect())
    }
}
