//! Download command implementation

use anyhow::Result;
use clap::{Args, ValueEnum};

use crate::dispatcher::Dispatcher;

/// What to download
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DownloadWhat {
    /// OpenGL development packages, meson and ninja
    #[value(alias = "deps")]
    Dependencies,
}

/// Install the system packages needed to build the projects
#[derive(Args, Debug)]
pub struct DownloadCommand {
    /// What to install (`dependencies` or `deps`)
    #[arg(value_enum)]
    pub what: DownloadWhat,
}

impl DownloadCommand {
    pub fn execute(self, dispatcher: &Dispatcher) -> Result<()> {
        match self.what {
            DownloadWhat::Dependencies => dispatcher.install_dependencies(),
        }
    }
}
