//! devgl - OpenGL development helper
//!
//! Installs the OpenGL development packages, sets up and builds Meson
//! projects (or compiles a single source file), and runs the result.
//!
//! ## Architecture
//!
//! ```text
//! cli → commands/ → dispatcher → apt-get/brew, meson, cc, the built program
//! ```

mod build;
mod cli;
mod commands;
mod config;
mod dispatcher;
mod error;
mod exec;
mod utils;

use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::FromArgMatches;

use cli::Cli;
use config::DevGlConfig;
use error::DevGlError;
use utils::terminal::print_error;

fn main() -> ExitCode {
    // a broken DevGL.toml must not prevent --help from working
    let config = DevGlConfig::load();

    let matches = match Cli::help_command(config.as_ref().ok()).try_get_matches() {
        Ok(matches) => matches,
        Err(err) => return exit_for_clap(err),
    };
    let cli = match Cli::from_arg_matches(&matches) {
        Ok(cli) => cli,
        Err(err) => return exit_for_clap(err),
    };

    match cli.execute(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report(err),
    }
}

/// Help and version exit 0, every other parse failure exits 1
fn exit_for_clap(err: clap::Error) -> ExitCode {
    let _ = err.print();
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
        _ => ExitCode::from(1),
    }
}

fn report(err: anyhow::Error) -> ExitCode {
    let code = match err.downcast_ref::<DevGlError>() {
        Some(devgl_err) => {
            devgl_err.display_with_hints();
            devgl_err.exit_code()
        }
        None => {
            print_error(&format!("{:#}", err));
            1
        }
    };
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}
