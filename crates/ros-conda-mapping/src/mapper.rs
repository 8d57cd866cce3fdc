//! Dependency mapping for converting ROS dependencies to conda packages

use ros_conda_core::{ros_package_name, Platform};
use ros_conda_ros::Distribution;
use tracing::trace;

use crate::markers::{expand_markers, MappedPackage};
use crate::table::MappingTable;

/// Package implicitly required by every ROS 2 build
pub const WORKSPACE_PACKAGE: &str = "ros_workspace";

/// Tooling packages that always map to distro packages, even when the
/// mapping table or the distribution knows them by another name
pub const ROS_TOOLING_PACKAGES: [&str; 4] =
    ["ament_cmake", "ament_python", "rosidl_default_generators", WORKSPACE_PACKAGE];

/// Dependency mapper for ROS to conda package names
#[derive(Debug, Clone)]
pub struct DependencyMapper<'a> {
    /// rosdep key mappings
    table: &'a MappingTable,
    /// Platform used to select per-platform entries and marker expansions
    platform: Platform,
}

impl<'a> DependencyMapper<'a> {
    pub fn new(table: &'a MappingTable, platform: Platform) -> Self {
        Self { table, platform }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Map a dependency name to conda package names
    pub fn map(&self, dependency: &str, distro: &Distribution) -> Vec<String> {
        self.map_placed(dependency, distro).into_iter().map(|p| p.name).collect()
    }

    /// Map a dependency name, keeping the placement of marker expansions
    pub fn map_placed(&self, dependency: &str, distro: &Distribution) -> Vec<MappedPackage> {
        if ROS_TOOLING_PACKAGES.contains(&dependency) {
            return vec![MappedPackage::inherit(ros_package_name(distro.name(), dependency))];
        }

        if let Some(packages) = self.table.lookup(dependency, self.platform) {
            trace!("{} -> {:?} from mapping table", dependency, packages);
            return expand_markers(packages, self.platform);
        }

        if distro.has_package(dependency) {
            return vec![MappedPackage::inherit(ros_package_name(distro.name(), dependency))];
        }

        trace!("{} is not mapped, passing through", dependency);
        vec![MappedPackage::inherit(dependency)]
    }
}

#[cfg(test)]
mod tests {
    use ros_conda_ros::DistributionType;

    use super::*;

    const TABLE: &str = r#"
python3-numpy:
  robostack: [numpy]
ament_cmake:
  robostack: [cmake]
libgl-dev:
  robostack: [REQUIRE_GL]
libudev-dev:
  robostack:
    linux: [libudev]
    osx: []
    win64: []
"#;

    fn humble() -> Distribution {
        Distribution::new(
            "humble",
            DistributionType::Ros2,
            3,
            ["std_msgs", "geometry_msgs", "ament_cmake"],
        )
    }

    #[test]
    fn test_ros_package_mapping() {
        let table = MappingTable::from_yaml_str(TABLE).unwrap();
        let mapper = DependencyMapper::new(&table, Platform::Linux64);

        assert_eq!(mapper.map("std_msgs", &humble()), vec!["ros-humble-std-msgs"]);
        assert_eq!(mapper.map("geometry_msgs", &humble()), vec!["ros-humble-geometry-msgs"]);
    }

    #[test]
    fn test_tooling_packages_win_over_table() {
        let table = MappingTable::from_yaml_str(TABLE).unwrap();
        let mapper = DependencyMapper::new(&table, Platform::Linux64);
        let empty = Distribution::new("jazzy", DistributionType::Ros2, 3, Vec::<String>::new());

        assert_eq!(mapper.map("ament_cmake", &humble()), vec!["ros-humble-ament-cmake"]);
        assert_eq!(mapper.map("ros_workspace", &empty), vec!["ros-jazzy-ros-workspace"]);
        assert_eq!(
            mapper.map("rosidl_default_generators", &empty),
            vec!["ros-jazzy-rosidl-default-generators"]
        );
    }

    #[test]
    fn test_table_mapping_is_distro_independent() {
        let table = MappingTable::from_yaml_str(TABLE).unwrap();
        let mapper = DependencyMapper::new(&table, Platform::OsxArm64);
        let noetic = Distribution::new("noetic", DistributionType::Ros1, 3, ["python3-numpy"]);

        assert_eq!(mapper.map("python3-numpy", &humble()), vec!["numpy"]);
        assert_eq!(mapper.map("python3-numpy", &noetic), vec!["numpy"]);
    }

    #[test]
    fn test_platform_specific_entry() {
        let table = MappingTable::from_yaml_str(TABLE).unwrap();
        let linux = DependencyMapper::new(&table, Platform::Linux64);
        let osx = DependencyMapper::new(&table, Platform::Osx64);

        assert_eq!(linux.map("libudev-dev", &humble()), vec!["libudev"]);
        assert!(osx.map("libudev-dev", &humble()).is_empty());
    }

    #[test]
    fn test_markers_expanded() {
        let table = MappingTable::from_yaml_str(TABLE).unwrap();
        let linux = DependencyMapper::new(&table, Platform::Linux64);
        let win = DependencyMapper::new(&table, Platform::Win64);

        assert_eq!(linux.map("libgl-dev", &humble()), vec!["libgl-devel"]);
        assert!(win.map("libgl-dev", &humble()).is_empty());
    }

    #[test]
    fn test_unknown_names_pass_through() {
        let table = MappingTable::from_yaml_str(TABLE).unwrap();
        let mapper = DependencyMapper::new(&table, Platform::Linux64);

        assert_eq!(mapper.map("my_private_lib", &humble()), vec!["my_private_lib"]);
    }
}
