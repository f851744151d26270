//! Compare installed skill versions against the registry.

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use crate::core::version::{NOT_IN_REGISTRY, is_newer};
use crate::error::Result;
use crate::ops::Outcome;
use crate::registry::SkillRegistry;
use crate::storage::skills::SkillStore;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutdatedSkill {
    pub name: String,
    pub installed_version: String,
    pub latest_version: String,
    pub has_update: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutdatedReport {
    pub skills: Vec<OutdatedSkill>,
    pub total_installed: usize,
    pub outdated_count: usize,
}

pub struct CheckOutdated<'a> {
    store: &'a dyn SkillStore,
    registry: &'a dyn SkillRegistry,
}

impl<'a> CheckOutdated<'a> {
    pub fn new(store: &'a dyn SkillStore, registry: &'a dyn SkillRegistry) -> Self {
        Self { store, registry }
    }

    pub fn execute(&self) -> Outcome<OutdatedReport> {
        self.run().into()
    }

    fn run(&self) -> Result<OutdatedReport> {
        let installed = self.store.list_installed()?;
        let available = self.registry.fetch_available()?;
        let latest: HashMap<&str, &str> = available
            .iter()
            .map(|skill| (skill.name.as_str(), skill.version.as_str()))
            .collect();

        let skills: Vec<OutdatedSkill> = installed
            .iter()
            .map(|skill| {
                let latest_version = latest
                    .get(skill.name())
                    .copied()
                    .unwrap_or(NOT_IN_REGISTRY)
                    .to_string();
                OutdatedSkill {
                    name: skill.name().to_string(),
                    installed_version: skill.version().to_string(),
                    has_update: is_newer(skill.version(), &latest_version),
                    latest_version,
                }
            })
            .collect();

        let outdated_count = skills.iter().filter(|skill| skill.has_update).count();
        debug!(total = skills.len(), outdated = outdated_count, "checked for updates");
        Ok(OutdatedReport {
            total_installed: skills.len(),
            outdated_count,
            skills,
        })
    }
}
