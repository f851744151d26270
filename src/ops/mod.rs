//! Use cases.
//!
//! Each use case borrows the services it needs, runs one workflow, and
//! returns an [`Outcome`]. Errors never escape a use case: they are folded
//! into `success: false` plus a message that names the failed step.

pub mod install;
pub mod list;
pub mod mcp;
pub mod outdated;
pub mod plugin;
pub mod search;
pub mod uninstall;

pub use install::{InstallRequest, InstallSkill};
pub use list::ListSkills;
pub use mcp::{InstallMcp, McpStatus, McpStatusEntry, UninstallMcp, UpdateMcp};
pub use outdated::{CheckOutdated, OutdatedReport, OutdatedSkill};
pub use plugin::{InstallPlugin, UninstallPlugin, UpdatePlugin};
pub use search::SearchSkills;
pub use uninstall::UninstallSkill;

use serde::Serialize;

use crate::error::{Result, SkmError};

/// Receives step notifications from long-running use cases.
pub trait ProgressReporter {
    fn start(&self, message: &str);
    fn stop(&self, message: &str);
}

/// Discards progress, for non-interactive callers.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn start(&self, _message: &str) {}
    fn stop(&self, _message: &str) {}
}

/// Uniform result of a use case.
#[derive(Debug, Clone, Serialize)]
pub struct Outcome<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip)]
    code: Option<&'static str>,
}

impl<T> Outcome<T> {
    pub const fn ok(value: T) -> Self {
        Self {
            success: true,
            value: Some(value),
            error: None,
            code: None,
        }
    }

    pub fn failed(err: &SkmError) -> Self {
        Self {
            success: false,
            value: None,
            error: Some(err.to_string()),
            code: Some(err.code()),
        }
    }

    /// Back into a `Result` for callers that propagate with `?`.
    pub fn into_result(self) -> Result<T> {
        match self.value {
            Some(value) if self.success => Ok(value),
            _ => Err(SkmError::Operation {
                code: self.code.unwrap_or("error"),
                message: self.error.unwrap_or_else(|| "operation failed".to_string()),
            }),
        }
    }
}

impl<T> From<Result<T>> for Outcome<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(value) => Self::ok(value),
            Err(err) => Self::failed(&err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_outcome_serializes_error_only() {
        let outcome: Outcome<u8> = Outcome::failed(&SkmError::NotFound("gone".to_string()));
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json, serde_json::json!({"success": false, "error": "gone"}));
    }

    #[test]
    fn into_result_keeps_error_code() {
        let outcome: Outcome<u8> =
            Outcome::failed(&SkmError::AlreadyInstalled("twice".to_string()));
        let err = outcome.into_result().unwrap_err();
        assert_eq!(err.code(), "already_installed");
        assert_eq!(err.to_string(), "twice");
    }
}
