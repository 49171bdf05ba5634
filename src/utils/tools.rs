//! Tool detection with helpful errors when something is missing

use std::path::PathBuf;

use anyhow::Result;
use which::which;

use crate::error::DevGlError;
use crate::exec::subprocess::{run_command, Invocation};

/// Require a tool on PATH, or fail with an install hint
pub fn require_tool(tool_name: &str, required_for: &str, hint: &str) -> Result<PathBuf> {
    which(tool_name).map_err(|_| DevGlError::missing_tool(tool_name, required_for, hint).into())
}

/// Whether the current user is root
///
/// Asks `id -u`; anything unexpected counts as "not root".
pub fn running_as_root() -> bool {
    if !cfg!(unix) {
        return false;
    }
    match run_command(&Invocation::new("id").arg("-u"), false) {
        Ok(result) if result.success => result.stdout.trim() == "0",
        _ => false,
    }
}

/// Prefix an invocation with `sudo` when privileges are needed and available
pub fn with_sudo(invocation: Invocation) -> Invocation {
    with_sudo_if(invocation, running_as_root(), which("sudo").is_ok())
}

/// Prefix with `sudo` only for a non-root user who has `sudo` installed
pub fn with_sudo_if(invocation: Invocation, is_root: bool, has_sudo: bool) -> Invocation {
    if is_root || !has_sudo {
        return invocation;
    }
    let mut args = Vec::with_capacity(invocation.args.len() + 1);
    args.push(invocation.program);
    args.extend(invocation.args);
    Invocation {
        program: "sudo".to_string(),
        args,
    }
}
