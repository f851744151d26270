//! Plugin use cases.

use crate::core::manifest::PluginManifest;
use crate::error::{Result, SkmError};
use crate::extensions::plugin::PluginService;
use crate::ops::{Outcome, ProgressReporter};

fn not_in_registry(name: &str) -> SkmError {
    SkmError::NotFound(format!("Plugin \"{name}\" not found in registry"))
}

fn not_installed(name: &str) -> SkmError {
    SkmError::NotInstalled(format!("Plugin \"{name}\" is not installed"))
}

pub struct InstallPlugin<'a> {
    service: &'a dyn PluginService,
}

impl<'a> InstallPlugin<'a> {
    pub fn new(service: &'a dyn PluginService) -> Self {
        Self { service }
    }

    pub fn execute(&self, name: &str, progress: &dyn ProgressReporter) -> Outcome<PluginManifest> {
        self.run(name, progress).into()
    }

    fn run(&self, name: &str, progress: &dyn ProgressReporter) -> Result<PluginManifest> {
        progress.start(&format!("Searching for plugin \"{name}\"..."));
        let manifest = match self.service.find_by_name(name) {
            Ok(Some(manifest)) => manifest,
            Ok(None) => {
                let err = not_in_registry(name);
                progress.stop(&err.to_string());
                return Err(err);
            }
            Err(err) => {
                progress.stop("Failed to reach skill registry");
                return Err(err);
            }
        };
        progress.stop(&format!("Found plugin: {}", manifest.name));

        if self.service.is_installed(name) {
            return Err(SkmError::AlreadyInstalled(format!(
                "Plugin \"{name}\" is already installed"
            )));
        }

        progress.start(&format!("Installing {}...", manifest.name));
        match self.service.install(&manifest) {
            Ok(()) => {
                progress.stop(&format!("Installed {}", manifest.name));
                Ok(manifest)
            }
            Err(err) => {
                progress.stop("Failed to install plugin");
                Err(err.context("Failed to install plugin"))
            }
        }
    }
}

pub struct UpdatePlugin<'a> {
    service: &'a dyn PluginService,
}

impl<'a> UpdatePlugin<'a> {
    pub fn new(service: &'a dyn PluginService) -> Self {
        Self { service }
    }

    pub fn execute(&self, name: &str, progress: &dyn ProgressReporter) -> Outcome<PluginManifest> {
        self.run(name, progress).into()
    }

    fn run(&self, name: &str, progress: &dyn ProgressReporter) -> Result<PluginManifest> {
        progress.start(&format!("Updating plugin \"{name}\"..."));

        if !self.service.is_installed(name) {
            let err = not_installed(name);
            progress.stop(&err.to_string());
            return Err(err);
        }
        let Some(manifest) = self.service.find_by_name(name)? else {
            let err = not_in_registry(name);
            progress.stop(&err.to_string());
            return Err(err);
        };

        match self.service.update(name, &manifest) {
            Ok(()) => {
                progress.stop(&format!("Updated {}", manifest.name));
                Ok(manifest)
            }
            Err(err) => {
                progress.stop("Failed to update plugin");
                Err(err.context("Failed to update plugin"))
            }
        }
    }
}

pub struct UninstallPlugin<'a> {
    service: &'a dyn PluginService,
}

impl<'a> UninstallPlugin<'a> {
    pub fn new(service: &'a dyn PluginService) -> Self {
        Self { service }
    }

    pub fn execute(&self, name: &str, progress: &dyn ProgressReporter) -> Outcome<()> {
        self.run(name, progress).into()
    }

    fn run(&self, name: &str, progress: &dyn ProgressReporter) -> Result<()> {
        if !self.service.is_installed(name) {
            return Err(not_installed(name));
        }
        // The settings key to drop is only known from the manifest.
        let manifest = self
            .service
            .find_by_name(name)?
            .ok_or_else(|| not_in_registry(name))?;

        progress.start(&format!("Uninstalling {name}..."));
        match self.service.uninstall(name, &manifest) {
            Ok(()) => {
                progress.stop(&format!("Uninstalled {name}"));
                Ok(())
            }
            Err(err) => {
                progress.stop("Failed to uninstall plugin");
                Err(err.context("Failed to uninstall plugin"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::doubles::{MemoryPluginService, RecordingProgress};
    use crate::test_utils::fixtures::registry_plugin;

    fn statusline_service() -> MemoryPluginService {
        MemoryPluginService::with_available(vec![registry_plugin("statusline", "statusLine")])
    }

    #[test]
    fn install_then_reject_second_install() {
        let service = statusline_service();
        let progress = RecordingProgress::default();

        let outcome = InstallPlugin::new(&service).execute("statusline", &progress);
        assert!(outcome.success);
        assert_eq!(outcome.value.unwrap().config.settings_key, "statusLine");

        let outcome = InstallPlugin::new(&service).execute("statusline", &progress);
        assert_eq!(
            outcome.error.as_deref(),
            Some("Plugin \"statusline\" is already installed")
        );
        assert_eq!(service.calls(), vec!["install:statusline".to_string()]);
    }

    #[test]
    fn install_unknown_plugin() {
        let service = statusline_service();
        let outcome = InstallPlugin::new(&service).execute("nope", &RecordingProgress::default());
        assert_eq!(outcome.error.as_deref(), Some("Plugin \"nope\" not found in registry"));
    }

    #[test]
    fn update_requires_installation() {
        let service = statusline_service();
        let progress = RecordingProgress::default();
        let outcome = UpdatePlugin::new(&service).execute("statusline", &progress);
        assert_eq!(
            outcome.error.as_deref(),
            Some("Plugin \"statusline\" is not installed")
        );
        assert_eq!(
            progress.events(),
            vec![
                "start:Updating plugin \"statusline\"...".to_string(),
                "stop:Plugin \"statusline\" is not installed".to_string(),
            ]
        );
    }

    #[test]
    fn update_failure_is_wrapped() {
        let service = statusline_service().with_installed("statusline").failing("diverged");
        let outcome = UpdatePlugin::new(&service).execute("statusline", &RecordingProgress::default());
        assert_eq!(outcome.error.as_deref(), Some("Failed to update plugin: diverged"));
    }

    #[test]
    fn uninstall_needs_registry_manifest() {
        let service = MemoryPluginService::default().with_installed("orphan");
        let outcome = UninstallPlugin::new(&service).execute("orphan", &RecordingProgress::default());
        assert_eq!(outcome.error.as_deref(), Some("Plugin \"orphan\" not found in registry"));
        assert!(service.calls().is_empty());

        let service = statusline_service().with_installed("statusline");
        let outcome = UninstallPlugin::new(&service).execute("statusline", &RecordingProgress::default());
        assert!(outcome.success);
        assert!(!service.is_installed("statusline"));
    }
}
