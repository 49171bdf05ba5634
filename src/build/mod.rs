//! Build orchestration
//!
//! - `meson` - Meson setup/compile command lines for configured projects
//! - `compiler` - direct compilation of a single C/C++ source file
//! - `platforms` - host profiles (package install command, link flags)

pub mod compiler;
pub mod meson;
pub mod platforms;
