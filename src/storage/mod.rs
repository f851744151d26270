//! Local persistence: installed skills on disk, git checkouts, and the shared
//! settings document.

pub mod git;
pub mod settings;
pub mod skills;

pub use git::{Git2Transport, GitTransport};
pub use settings::{SettingsMap, SettingsStore};
pub use skills::{LocalSkillStore, MANIFEST_FILE, SkillStore};
