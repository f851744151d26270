//! skm - package manager for Claude skills, MCP servers and plugins.

pub mod app;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod extensions;
pub mod ops;
pub mod registry;
pub mod storage;
pub mod utils;

#[cfg(test)]
mod test_utils;

pub use error::{Result, SkmError};
