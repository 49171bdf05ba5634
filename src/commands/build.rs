//! Build command implementation

use anyhow::Result;
use clap::Args;

use crate::dispatcher::Dispatcher;

/// Build a project with meson, or compile a single source file
#[derive(Args, Debug)]
pub struct BuildCommand {
    /// Project name, or a .c/.cpp file to compile directly
    pub target: String,
}

impl BuildCommand {
    pub fn execute(self, dispatcher: &Dispatcher) -> Result<()> {
        let target = dispatcher.classify(&self.target)?;
        dispatcher.build_target(&target)
    }
}
