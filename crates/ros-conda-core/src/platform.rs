//! Target platform handling

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Platform a recipe is generated for
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Platform {
    #[serde(rename = "linux-64")]
    Linux64,
    #[serde(rename = "linux-aarch64")]
    LinuxAarch64,
    #[serde(rename = "osx-64")]
    Osx64,
    #[serde(rename = "osx-arm64")]
    OsxArm64,
    #[serde(rename = "win-64")]
    Win64,
}

/// Script flavour produced for a platform
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum BuildPlatform {
    Windows,
    Unix,
}

impl Platform {
    /// Platform of the running process
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Self::Win64
        } else if cfg!(all(target_os = "macos", target_arch = "aarch64")) {
            Self::OsxArm64
        } else if cfg!(target_os = "macos") {
            Self::Osx64
        } else if cfg!(target_arch = "aarch64") {
            Self::LinuxAarch64
        } else {
            Self::Linux64
        }
    }

    /// Conda subdir string, e.g. `linux-64`
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Linux64 => "linux-64",
            Self::LinuxAarch64 => "linux-aarch64",
            Self::Osx64 => "osx-64",
            Self::OsxArm64 => "osx-arm64",
            Self::Win64 => "win-64",
        }
    }

    pub fn is_linux(&self) -> bool {
        matches!(self, Self::Linux64 | Self::LinuxAarch64)
    }

    pub fn is_osx(&self) -> bool {
        matches!(self, Self::Osx64 | Self::OsxArm64)
    }

    pub fn is_windows(&self) -> bool {
        matches!(self, Self::Win64)
    }

    pub fn is_unix(&self) -> bool {
        self.is_linux() || self.is_osx()
    }

    /// Keys used by platform-specific mapping table entries, most specific first
    pub fn mapping_keys(&self) -> &'static [&'static str] {
        if self.is_linux() {
            &["linux"]
        } else if self.is_osx() {
            &["osx"]
        } else {
            &["win64", "win"]
        }
    }
}

impl From<Platform> for BuildPlatform {
    fn from(platform: Platform) -> Self {
        if platform.is_windows() {
            Self::Windows
        } else {
            Self::Unix
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "linux-64" | "linux" => Self::Linux64,
            "linux-aarch64" => Self::LinuxAarch64,
            "osx-64" | "osx" => Self::Osx64,
            "osx-arm64" => Self::OsxArm64,
            "win-64" | "win64" | "windows" => Self::Win64,
            other => return Err(Error::config(format!("Unknown platform: {other}"))),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_families() {
        assert!(Platform::Linux64.is_unix());
        assert!(Platform::OsxArm64.is_unix());
        assert!(!Platform::Win64.is_unix());
        assert_eq!(BuildPlatform::from(Platform::Win64), BuildPlatform::Windows);
        assert_eq!(BuildPlatform::from(Platform::Osx64), BuildPlatform::Unix);
    }

    #[test]
    fn test_platform_from_str() {
        assert_eq!("linux-64".parse::<Platform>().unwrap(), Platform::Linux64);
        assert_eq!("WIN-64".parse::<Platform>().unwrap(), Platform::Win64);
        assert!("plan9".parse::<Platform>().is_err());
    }

    #[test]
    fn test_mapping_keys() {
        assert_eq!(Platform::LinuxAarch64.mapping_keys(), &["linux"]);
        assert_eq!(Platform::Win64.mapping_keys(), &["win64", "win"]);
    }
}
