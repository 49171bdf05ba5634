//! Setup command implementation

use anyhow::Result;
use clap::Args;

use crate::dispatcher::Dispatcher;

/// Create the meson build directory for a project if it is missing
#[derive(Args, Debug)]
pub struct SetupCommand {
    /// Project name
    pub project: String,
}

impl SetupCommand {
    pub fn execute(self, dispatcher: &Dispatcher) -> Result<()> {
        dispatcher.setup_build(&self.project)
    }
}
