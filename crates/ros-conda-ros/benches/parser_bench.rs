use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ros_conda_ros::{
    evaluate_condition, parse_package_manifest, parse_package_xml, ConditionContext,
};
use tempfile::TempDir;

const COMPLEX_XML: &str = r#"<?xml version="1.0"?>
<package format="3">
  <name>complex_package</name>
  <version>2.1.0</version>
  <description>A complex package with many dependencies and metadata</description>

  <maintainer email="maintainer1@example.com">Main Tainer</maintainer>
  <maintainer email="maintainer2@example.com">Second Maintainer</maintainer>

  <author email="author1@example.com">First Author</author>
  <author>Second Author</author>

  <license>Apache-2.0</license>
  <license>MIT</license>

  <url type="website">https://example.com/complex_package</url>
  <url type="repository">https://github.com/example/complex_package</url>

  <buildtool_depend>ament_cmake</buildtool_depend>
  <buildtool_export_depend>ament_cmake_core</buildtool_export_depend>

  <build_depend version_gte="0.9.0">rclcpp</build_depend>
  <build_depend>std_msgs</build_depend>
  <build_depend>sensor_msgs</build_depend>
  <build_depend version_eq="1.0.0">geometry_msgs</build_depend>
  <build_depend>tf2_ros</build_depend>
  <build_depend>pcl_ros</build_depend>

  <build_export_depend>rclcpp</build_export_depend>
  <build_export_depend>std_msgs</build_export_depend>

  <exec_depend>rclcpp</exec_depend>
  <exec_depend>std_msgs</exec_depend>
  <exec_depend>sensor_msgs</exec_depend>
  <exec_depend condition="$ROS_DISTRO == humble">tf2_ros</exec_depend>
  <exec_depend condition="$ROS_PYTHON_VERSION == 3">python3-numpy</exec_depend>

  <test_depend>ament_lint_auto</test_depend>
  <test_depend>ament_cmake_gtest</test_depend>

  <doc_depend>doxygen</doc_depend>

  <depend>nav_msgs</depend>
  <depend version_lte="2.0.0">visualization_msgs</depend>

  <export>
    <build_type>ament_cmake</build_type>
  </export>
</package>"#;

fn benchmark_xml_parsing(c: &mut Criterion) {
    let temp_dir = TempDir::new().unwrap();
    let complex_xml_path = temp_dir.path().join("package.xml");
    std::fs::write(&complex_xml_path, COMPLEX_XML).unwrap();

    c.bench_function("parse_complex_package_xml", |b| {
        b.iter(|| {
            let package = parse_package_xml(black_box(&complex_xml_path)).expect("Failed to parse");
            assert_eq!(package.name, "complex_package");
        });
    });
}

fn benchmark_condition_evaluation(c: &mut Criterion) {
    let context = ConditionContext::new()
        .with("ROS_VERSION", "2")
        .with("ROS_DISTRO", "humble")
        .with("ROS_PYTHON_VERSION", "3");
    let manifest = parse_package_manifest(COMPLEX_XML).expect("Failed to parse");

    let mut group = c.benchmark_group("conditions");

    group.bench_function("single_expression", |b| {
        b.iter(|| {
            evaluate_condition(
                black_box("($ROS_DISTRO == foxy or $ROS_DISTRO == humble) and $ROS_VERSION == 2"),
                &context,
            )
            .expect("Failed to evaluate")
        });
    });

    group.bench_function("whole_manifest", |b| {
        b.iter(|| {
            let mut manifest = black_box(manifest.clone());
            manifest.evaluate_conditions(&context).expect("Failed to evaluate");
            manifest
        });
    });

    group.finish();
}

criterion_group!(benches, benchmark_xml_parsing, benchmark_condition_evaluation);
criterion_main!(benches);
