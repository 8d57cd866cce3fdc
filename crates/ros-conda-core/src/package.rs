//! ROS package naming and build types

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Prefix shared by every conda package built from a ROS distribution
pub const ROS_PACKAGE_PREFIX: &str = "ros";

/// Convert a ROS package name to its conda name (e.g. `ros-humble-std-msgs`)
pub fn ros_package_name(distro: &str, package: &str) -> String {
    format!("{ROS_PACKAGE_PREFIX}-{distro}-{}", package.replace('_', "-"))
}

/// Build system type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BuildType {
    /// Ament CMake build system (ROS 2)
    AmentCmake,

    /// Ament Python build system (ROS 2)
    AmentPython,

    /// Plain CMake
    Cmake,

    /// Catkin (ROS 1)
    Catkin,
}

impl BuildType {
    /// Name as written in `package.xml`
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AmentCmake => "ament_cmake",
            Self::AmentPython => "ament_python",
            Self::Cmake => "cmake",
            Self::Catkin => "catkin",
        }
    }

    /// Stem of the build script template, `build_<stem>.sh.in`
    pub fn template_stem(&self) -> &'static str {
        match self {
            Self::AmentCmake => "ament_cmake",
            Self::AmentPython => "ament_python",
            // plain cmake packages are driven through the catkin script
            Self::Cmake | Self::Catkin => "catkin",
        }
    }
}

impl fmt::Display for BuildType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuildType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "ament_cmake" => Self::AmentCmake,
            "ament_python" => Self::AmentPython,
            "cmake" => Self::Cmake,
            "catkin" => Self::Catkin,
            _ => return Err(Error::unsupported_build_type(s)),
        })
    }
}
