//! Host platform profiles
//!
//! Each supported OS family implements [`PlatformProfile`], which knows how to
//! install the OpenGL development packages and which flags a single source
//! file needs to link against GLFW/GLEW/OpenGL. The profile is picked once at
//! startup and handed to the dispatcher.

pub mod linux;
pub mod macos;

use anyhow::Result;

use crate::error::DevGlError;
use crate::exec::Invocation;

/// OS-family-specific install and link configuration
pub trait PlatformProfile {
    /// Short platform name ("linux", "macos")
    fn name(&self) -> &str;

    /// Package manager program the install step needs on PATH
    fn package_manager(&self) -> &str;

    /// Packages installed by `download dependencies`
    fn default_packages(&self) -> Vec<String>;

    /// Command that installs `packages`
    fn install_invocation(&self, packages: &[String]) -> Invocation;

    /// Flags appended when compiling a single source file
    fn link_flags(&self) -> Vec<String>;
}

/// Pick the profile for an OS name as reported by `std::env::consts::OS`
pub fn for_os(os: &str) -> Result<Box<dyn PlatformProfile>> {
    match os {
        "linux" => Ok(Box::new(linux::LinuxProfile::new())),
        "macos" => Ok(Box::new(macos::MacosProfile::new())),
        other => Err(DevGlError::UnsupportedPlatform {
            os: other.to_string(),
        }
        .into()),
    }
}

/// Platform profile of the host, or the OS name when there is none
///
/// Only package installation and single-file builds need a profile, so an
/// unsupported host is reported when one of those asks for it.
pub enum HostPlatform {
    Supported(Box<dyn PlatformProfile>),
    Unsupported(String),
}

impl HostPlatform {
    /// Profile for the host this binary runs on
    pub fn detect() -> Self {
        Self::for_os(std::env::consts::OS)
    }

    pub fn for_os(os: &str) -> Self {
        match for_os(os) {
            Ok(profile) => Self::Supported(profile),
            Err(_) => Self::Unsupported(os.to_string()),
        }
    }

    /// The profile, or `UnsupportedPlatform` naming the host OS
    pub fn profile(&self) -> Result<&dyn PlatformProfile> {
        match self {
            Self::Supported(profile) => Ok(profile.as_ref()),
            Self::Unsupported(os) => Err(DevGlError::UnsupportedPlatform { os: os.clone() }.into()),
        }
    }
}

impl From<Box<dyn PlatformProfile>> for HostPlatform {
    fn from(profile: Box<dyn PlatformProfile>) -> Self {
        Self::Supported(profile)
    }
}
