//! Subprocess execution
//!
//! Every external tool devgl drives (package manager, meson, the compiler and
//! the produced executable) goes through [`CommandRunner`], so the dispatcher
//! can be exercised in tests without spawning anything.

use std::fmt;
use std::process::{Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

use crate::error::hints;
use crate::utils::tools::require_tool;

/// A single external command: program and arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append one argument
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            if arg.contains(' ') {
                write!(f, " \"{}\"", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// Result of a subprocess execution
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded (exit code 0)
    pub success: bool,

    /// Process exit code, `None` when terminated by a signal
    pub exit_code: Option<i32>,

    /// Captured standard output (empty when forwarded to the terminal)
    pub stdout: String,

    /// Execution duration
    pub duration: Duration,
}

impl CommandResult {
    /// Create a CommandResult from an exit status
    pub fn from_status(status: ExitStatus, stdout: String, duration: Duration) -> Self {
        Self {
            success: status.success(),
            exit_code: status.code(),
            stdout,
            duration,
        }
    }

    /// A finished result with the given exit code and no output
    #[cfg(test)]
    pub fn from_code(code: i32) -> Self {
        Self {
            success: code == 0,
            exit_code: Some(code),
            stdout: String::new(),
            duration: Duration::ZERO,
        }
    }
}

/// Executes invocations and reports how they finished
pub trait CommandRunner {
    fn run(&self, invocation: &Invocation) -> Result<CommandResult>;
}

/// Runs invocations as real child processes attached to the terminal
#[derive(Debug, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<CommandResult> {
        require_tool(
            &invocation.program,
            &invocation.to_string(),
            hints::for_tool(&invocation.program),
        )?;
        run_command(invocation, true)
    }
}

/// Run a command to completion, either forwarding its output or capturing
/// stdout (stderr always goes to the terminal)
pub fn run_command(invocation: &Invocation, inherit_io: bool) -> Result<CommandResult> {
    let start = Instant::now();

    let mut cmd = Command::new(&invocation.program);
    cmd.args(&invocation.args);

    if inherit_io {
        cmd.stdin(Stdio::inherit());
        cmd.stdout(Stdio::inherit());
        cmd.stderr(Stdio::inherit());

        let status = cmd
            .status()
            .with_context(|| format!("Failed to execute {}", invocation.program))?;

        Ok(CommandResult::from_status(status, String::new(), start.elapsed()))
    } else {
        cmd.stderr(Stdio::inherit());
        let output = cmd
            .output()
            .with_context(|| format!("Failed to execute {}", invocation.program))?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        Ok(CommandResult::from_status(output.status, stdout, start.elapsed()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invocation_display_quotes_spaces() {
        let inv = Invocation::new("meson")
            .arg("setup")
            .arg("my build")
            .arg("src");
        assert_eq!(inv.to_string(), "meson setup \"my build\" src");
    }

    #[test]
    fn test_invocation_builder() {
        let inv = Invocation::new("cc")
            .arg("-Wall")
            .args(["a.c", "-o", "a"]);
        assert_eq!(inv.program, "cc");
        assert_eq!(inv.args, vec!["-Wall", "a.c", "-o", "a"]);
    }

    #[test]
    fn test_from_code() {
        assert!(CommandResult::from_code(0).success);
        let failed = CommandResult::from_code(3);
        assert!(!failed.success);
        assert_eq!(failed.exit_code, Some(3));
    }

    #[cfg(unix)]
    #[test]
    fn test_captured_run_reports_exit_and_output() {
        let ok = run_command(&Invocation::new("sh").args(["-c", "echo hello"]), false).unwrap();
        assert!(ok.success);
        assert_eq!(ok.stdout.trim(), "hello");

        let failed = run_command(&Invocation::new("sh").args(["-c", "exit 7"]), false).unwrap();
        assert!(!failed.success);
        assert_eq!(failed.exit_code, Some(7));
    }

    #[cfg(unix)]
    #[test]
    fn test_system_runner_forwards_exit_code() {
        let result = SystemRunner
            .run(&Invocation::new("sh").args(["-c", "exit 4"]))
            .unwrap();
        assert!(!result.success);
        assert_eq!(result.exit_code, Some(4));
        assert!(result.stdout.is_empty());
    }

    #[test]
    fn test_missing_program_is_missing_tool() {
        let err = SystemRunner
            .run(&Invocation::new("devgl-definitely-not-a-real-program"))
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<crate::error::DevGlError>(),
            Some(crate::error::DevGlError::MissingTool { .. })
        ));
    }
}
