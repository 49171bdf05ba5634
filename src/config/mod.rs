//! Project configuration

pub mod devgl_toml;

pub use devgl_toml::{CompilerConfig, DevGlConfig, ProjectProfile};
