use std::sync::Arc;

use crate::cli::OutputFormat;
use crate::cli::progress::SpinnerProgress;
use crate::config::{Config, ResolvedPaths};
use crate::error::Result;
use crate::extensions::{LocalMcpService, LocalPluginService};
use crate::registry::{HttpRegistry, SkillRegistry};
use crate::storage::{Git2Transport, GitTransport, LocalSkillStore, SettingsStore};

/// Production services wired from configuration. Nothing here touches the
/// network or the filesystem until a command uses it.
pub struct AppContext {
    pub config: Config,
    pub paths: ResolvedPaths,
    pub registry: Arc<HttpRegistry>,
    pub git: Arc<Git2Transport>,
    pub store: LocalSkillStore,
    pub mcp: LocalMcpService,
    pub plugins: LocalPluginService,
    pub output_format: OutputFormat,
    pub verbosity: u8,
    pub quiet: bool,
}

impl AppContext {
    pub fn from_cli(cli: &crate::cli::Cli) -> Result<Self> {
        let config = Config::load(cli.config.as_deref())?;
        let paths = config.paths.resolve()?;

        let registry = Arc::new(HttpRegistry::from_config(&config.registry)?);
        let git = Arc::new(Git2Transport::new());
        let shared_registry: Arc<dyn SkillRegistry> = registry.clone();
        let shared_git: Arc<dyn GitTransport> = git.clone();

        let mcp = LocalMcpService::new(
            Arc::clone(&shared_registry),
            Arc::clone(&shared_git),
            SettingsStore::new(&paths.settings_file),
            &paths.mcp_dir,
        );
        let plugins = LocalPluginService::new(
            shared_registry,
            shared_git,
            SettingsStore::new(&paths.settings_file),
            &paths.plugin_dir,
        );

        tracing::debug!(
            skills = %paths.skills_dir.display(),
            settings = %paths.settings_file.display(),
            registry = %registry.url(),
            "resolved locations"
        );

        Ok(Self {
            store: LocalSkillStore::new(&paths.skills_dir),
            config,
            paths,
            registry,
            git,
            mcp,
            plugins,
            output_format: cli.output_format(),
            verbosity: cli.verbose,
            quiet: cli.quiet,
        })
    }

    /// Spinner for use cases; silent when output must stay machine-readable.
    pub fn progress(&self) -> SpinnerProgress {
        SpinnerProgress::new(self.output_format == OutputFormat::Human && !self.quiet)
    }

    pub fn is_json(&self) -> bool {
        self.output_format == OutputFormat::Json
    }
}
