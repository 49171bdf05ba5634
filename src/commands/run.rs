//! Run command implementation
//!
//! For a project this sets up, builds and runs it in one go. For a source
//! file it only runs the executable a previous `build` produced.

use anyhow::Result;
use clap::Args;

use crate::dispatcher::Dispatcher;

/// Build and run a project, or run a compiled source file
#[derive(Args, Debug)]
pub struct RunCommand {
    /// Project name, or a source file built earlier with `devgl build`
    pub target: String,

    /// Arguments to pass to the executable
    #[arg(last = true)]
    pub args: Vec<String>,
}

impl RunCommand {
    pub fn execute(self, dispatcher: &Dispatcher) -> Result<()> {
        let target = dispatcher.classify(&self.target)?;
        dispatcher.run_target(&target, &self.args)
    }
}
