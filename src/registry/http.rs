use std::sync::OnceLock;
use std::time::Duration;

use tracing::{debug, info};

use super::SkillRegistry;
use crate::config::RegistryConfig;
use crate::core::manifest::RegistryData;
use crate::error::{Result, SkmError};

/// Registry backed by a JSON document served over HTTP(S).
pub struct HttpRegistry {
    url: String,
    client: reqwest::blocking::Client,
    cache: OnceLock<RegistryData>,
}

impl HttpRegistry {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("skm/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| SkmError::Config(format!("registry http client: {err}")))?;
        Ok(Self {
            url: url.into(),
            client,
            cache: OnceLock::new(),
        })
    }

    pub fn from_config(config: &RegistryConfig) -> Result<Self> {
        Self::new(
            config.url.clone(),
            Duration::from_secs(config.timeout_secs.max(1)),
        )
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    fn fetch(&self) -> Result<RegistryData> {
        debug!(url = %self.url, "fetching registry");
        let response = self
            .client
            .get(&self.url)
            .send()
            .map_err(|err| fetch_error(&err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(fetch_error(&format!("HTTP {status}")));
        }

        let data: RegistryData = response
            .json()
            .map_err(|err| fetch_error(&format!("invalid registry document: {err}")))?;
        info!(
            version = %data.version,
            skills = data.skills.len(),
            mcps = data.mcps.len(),
            plugins = data.plugins.len(),
            "registry loaded"
        );
        Ok(data)
    }
}

impl SkillRegistry for HttpRegistry {
    fn catalog(&self) -> Result<&RegistryData> {
        if let Some(data) = self.cache.get() {
            return Ok(data);
        }
        let data = self.fetch()?;
        Ok(self.cache.get_or_init(|| data))
    }
}

fn fetch_error(cause: &str) -> SkmError {
    SkmError::Registry(format!("Failed to fetch skill registry: {cause}"))
}
