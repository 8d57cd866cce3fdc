//! Dependency mapping for ros-conda
//!
//! This crate turns the dependency names declared in a `package.xml` into
//! conda package names:
//!
//! - [`table`]: the rosdep-key to conda mapping table (`robostack.yaml`)
//! - [`markers`]: expansion of marker tokens such as `REQUIRE_OPENGL`
//! - [`mapper`]: lookup of a single dependency name
//! - [`extractor`]: build/host/run requirements for a whole manifest
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use ros_conda_core::Platform;
//! use ros_conda_mapping::{DependencyMapper, MappingTable};
//! use ros_conda_ros::{Distribution, DistributionType};
//!
//! # fn example() -> ros_conda_core::Result<()> {
//! let table = MappingTable::builtin()?;
//! let mapper = DependencyMapper::new(table, Platform::Linux64);
//! let humble = Distribution::new("humble", DistributionType::Ros2, 3, ["rclcpp"]);
//!
//! assert_eq!(mapper.map("rclcpp", &humble), vec!["ros-humble-rclcpp"]);
//! # Ok(())
//! # }
//! ```

pub mod extractor;
pub mod mapper;
pub mod markers;
pub mod table;

pub use extractor::{
    host_mirrors_build, HostPolicy, RequirementExtractor, BUILD_CATEGORIES, RUN_CATEGORIES,
};
pub use mapper::{DependencyMapper, ROS_TOOLING_PACKAGES, WORKSPACE_PACKAGE};
pub use markers::{expand_markers, is_marker, MappedPackage, MarkerRule, Placement, MARKER_RULES};
pub use table::{MappingTable, TargetPackages};
