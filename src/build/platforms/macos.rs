//! macOS profile: Homebrew formulas, OpenGL framework link flags

use std::path::Path;

use crate::exec::Invocation;

use super::PlatformProfile;

/// Homebrew formulas matching the Linux package set
const BREW_FORMULAS: &[&str] = &[
    "glfw",
    "glew",
    "freetype",
    "box2d",
    "meson",
    "ninja",
    "pkg-config",
];

/// Homebrew prefix on Apple Silicon; Intel installs live in /usr/local
const APPLE_SILICON_PREFIX: &str = "/opt/homebrew";
const INTEL_PREFIX: &str = "/usr/local";

/// macOS platform profile
pub struct MacosProfile {
    brew_prefix: String,
}

impl MacosProfile {
    pub fn new() -> Self {
        let brew_prefix = if Path::new(APPLE_SILICON_PREFIX).is_dir() {
            APPLE_SILICON_PREFIX
        } else {
            INTEL_PREFIX
        };
        Self::with_prefix(brew_prefix)
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            brew_prefix: prefix.into(),
        }
    }
}

impl PlatformProfile for MacosProfile {
    fn name(&self) -> &str {
        "macos"
    }

    fn package_manager(&self) -> &str {
        "brew"
    }

    fn default_packages(&self) -> Vec<String> {
        BREW_FORMULAS.iter().map(|p| p.to_string()).collect()
    }

    // Homebrew refuses to run as root, so no sudo here
    fn install_invocation(&self, packages: &[String]) -> Invocation {
        Invocation::new("brew")
            .arg("install")
            .args(packages.iter().cloned())
    }

    fn link_flags(&self) -> Vec<String> {
        vec![
            format!("-I{}/include", self.brew_prefix),
            format!("-L{}/lib", self.brew_prefix),
            "-lGLEW".to_string(),
            "-lglfw".to_string(),
            "-framework".to_string(),
            "OpenGL".to_string(),
        ]
    }
}
