//! Clean command implementation

use anyhow::Result;
use clap::Args;

use crate::dispatcher::Dispatcher;

/// Remove build directories
#[derive(Args, Debug)]
pub struct CleanCommand {
    /// Project to clean; every configured project when omitted
    pub project: Option<String>,
}

impl CleanCommand {
    pub fn execute(self, dispatcher: &Dispatcher) -> Result<()> {
        match self.project {
            Some(project) => dispatcher.clean_project(&project),
            None => {
                for name in dispatcher.project_names() {
                    dispatcher.clean_project(&name)?;
                }
                Ok(())
            }
        }
    }
}
