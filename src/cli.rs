//! CLI argument parsing using clap derive macros

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};

use crate::build::platforms::HostPlatform;
use crate::commands::{
    build::BuildCommand, clean::CleanCommand, download::DownloadCommand, list::ListCommand,
    run::RunCommand, setup::SetupCommand,
};
use crate::config::DevGlConfig;
use crate::dispatcher::Dispatcher;
use crate::error::DevGlError;
use crate::exec::SystemRunner;
use crate::utils::terminal::disable_colors;

/// devgl - OpenGL project helper
///
/// Installs OpenGL development packages, builds Meson projects or single
/// source files, and runs the result.
#[derive(Parser, Debug)]
#[command(name = "devgl")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Print every external command before running it
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Number of parallel jobs for meson compile
    #[arg(short, long, global = true, env = "DEVGL_JOBS")]
    pub jobs: Option<usize>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Install system dependencies (`download dependencies` or `download deps`)
    Download(DownloadCommand),

    /// Set up, build and run a project, or run a compiled source file
    Run(RunCommand),

    /// Build a project, or compile a single source file
    Build(BuildCommand),

    /// Create a project's meson build directory
    Setup(SetupCommand),

    /// Remove build directories
    Clean(CleanCommand),

    /// List configured projects
    List(ListCommand),
}

impl Cli {
    /// Clap command with the project list and examples appended to the help
    pub fn help_command(config: Option<&DevGlConfig>) -> clap::Command {
        let command = Self::command();
        match config {
            Some(config) => command.after_help(projects_help(config)),
            None => command,
        }
    }

    /// Execute the CLI command
    pub fn execute(self, config: Result<DevGlConfig>) -> Result<()> {
        if self.no_color {
            disable_colors();
        }

        let Some(command) = self.command else {
            print_usage(config.as_ref().ok());
            return Err(DevGlError::usage("No command given.").into());
        };

        let dispatcher = Dispatcher::new(config?, HostPlatform::detect(), Box::new(SystemRunner))
            .verbose(self.verbose)
            .jobs(self.jobs);

        match command {
            Commands::Download(cmd) => cmd.execute(&dispatcher),
            Commands::Run(cmd) => cmd.execute(&dispatcher),
            Commands::Build(cmd) => cmd.execute(&dispatcher),
            Commands::Setup(cmd) => cmd.execute(&dispatcher),
            Commands::Clean(cmd) => cmd.execute(&dispatcher),
            Commands::List(cmd) => cmd.execute(&dispatcher),
        }
    }
}

/// Print the help text on stdout, with the project list when a config loaded
pub fn print_usage(config: Option<&DevGlConfig>) {
    println!("{}", Cli::help_command(config).render_help());
}

fn projects_help(config: &DevGlConfig) -> String {
    let mut help = String::from("Available Projects:\n");
    for name in config.project_names() {
        help.push_str(&format!("  {}\n", name));
    }
    help.push_str(
        "\nExamples:\n  \
         devgl download dependencies\n  \
         devgl run app\n  \
         devgl build triangle.c\n  \
         devgl run triangle.c",
    );
    help
}
