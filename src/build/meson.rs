//! Meson setup and compile invocations
//!
//! This module only builds the command lines; running them is up to the
//! caller's [`CommandRunner`](crate::exec::CommandRunner).

use std::path::PathBuf;

use crate::exec::Invocation;

/// Meson configuration builder
#[derive(Debug, Default)]
pub struct MesonConfig {
    /// Source directory (where meson.build is located)
    source_dir: PathBuf,
    /// Build directory
    build_dir: PathBuf,
    /// Number of parallel jobs for compile
    jobs: Option<usize>,
    /// Verbose compile output
    verbose: bool,
}

impl MesonConfig {
    /// Create a new Meson configuration
    pub fn new(source_dir: PathBuf, build_dir: PathBuf) -> Self {
        Self {
            source_dir,
            build_dir,
            ..Default::default()
        }
    }

    /// Set number of parallel jobs
    pub fn jobs(mut self, jobs: Option<usize>) -> Self {
        self.jobs = jobs;
        self
    }

    /// Enable verbose output
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Whether the build directory has already been set up
    pub fn is_configured(&self) -> bool {
        self.build_dir.is_dir()
    }

    /// Whether the build directory contains meson's own state
    pub fn has_meson_state(&self) -> bool {
        self.build_dir.join("meson-private").is_dir()
    }

    /// `meson setup <build> <source>`
    pub fn setup_invocation(&self) -> Invocation {
        Invocation::new("meson")
            .arg("setup")
            .arg(self.build_dir.display().to_string())
            .arg(self.source_dir.display().to_string())
    }

    /// `meson compile -C <build>`
    pub fn compile_invocation(&self) -> Invocation {
        let mut inv = Invocation::new("meson")
            .arg("compile")
            .arg("-C")
            .arg(self.build_dir.display().to_string());

        if let Some(jobs) = self.jobs {
            inv = inv.arg("-j").arg(jobs.to_string());
        }

        if self.verbose {
            inv = inv.arg("-v");
        }

        inv
    }
}
