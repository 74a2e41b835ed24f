//! Core building blocks shared by every command
//!
//! - **config**: release.toml parsing, defaults and validation
//! - **context**: project root plus configuration, built once per invocation
//! - **error**: error taxonomy with help messages and exit codes
//! - **process**: subprocess runner with an isolated environment
//! - **vcs**: version-control abstraction (system git)

pub mod config;
pub mod context;
pub mod error;
pub mod process;
pub mod vcs;
