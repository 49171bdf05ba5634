//! External process execution

pub mod subprocess;

pub use subprocess::{CommandResult, CommandRunner, Invocation, SystemRunner};
