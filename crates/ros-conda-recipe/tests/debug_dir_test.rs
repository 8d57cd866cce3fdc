//! Changes the process working directory, so it lives in its own test binary.

use std::path::PathBuf;

use ros_conda_config::RosBackendConfig;
use ros_conda_core::{Platform, ProjectModel};
use ros_conda_recipe::RecipeGenerator;
use ros_conda_ros::{Distribution, DistributionType};
use tempfile::TempDir;

#[test]
fn test_relative_debug_dir_without_working_directory() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("talker");
    std::fs::create_dir_all(&root).unwrap();
    std::fs::write(
        root.join("package.xml"),
        r#"<?xml version="1.0"?>
<package format="3">
  <name>talker</name>
  <version>0.4.2</version>
  <description>Test</description>
  <maintainer email="a@b.c">A</maintainer>
  <license>MIT</license>
  <buildtool_depend>ament_cmake</buildtool_depend>
  <depend>rclcpp</depend>
</package>"#,
    )
    .unwrap();

    let mut config = RosBackendConfig::new("humble");
    config.debug_dir = Some(PathBuf::from("debug"));
    let humble = Distribution::new("humble", DistributionType::Ros2, 3, ["rclcpp"]);
    let generator = RecipeGenerator::with_distributions(config, Box::new(humble)).unwrap();

    let removed = temp_dir.path().join("removed");
    std::fs::create_dir_all(&removed).unwrap();
    std::env::set_current_dir(&removed).unwrap();
    std::fs::remove_dir(&removed).unwrap();

    let result = generator.generate(ProjectModel::default(), &root, Platform::Linux64);
    std::env::set_current_dir(temp_dir.path()).unwrap();

    let generated = result.unwrap();
    assert_eq!(generated.recipe.package.name, "ros-humble-talker");
    assert!(!temp_dir.path().join("debug").exists());
}
