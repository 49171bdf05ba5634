//! Command implementations
//!
//! Each command module provides a clap-derived struct and execute method.

pub mod build;
pub mod clean;
pub mod download;
pub mod list;
pub mod run;
pub mod setup;
