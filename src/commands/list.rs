//! List command implementation

use anyhow::Result;
use clap::Args;

use crate::dispatcher::Dispatcher;

/// List configured projects and whether they are built
#[derive(Args, Debug)]
pub struct ListCommand {}

impl ListCommand {
    pub fn execute(self, dispatcher: &Dispatcher) -> Result<()> {
        dispatcher.list_projects();
        Ok(())
    }
}
