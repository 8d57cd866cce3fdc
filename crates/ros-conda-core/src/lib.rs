//! Core types and traits for ros-conda
//!
//! This crate provides the requirement model, recipe structures, platform
//! handling and error types shared by the manifest, mapping and recipe
//! generation crates.

pub mod error;
pub mod package;
pub mod platform;
pub mod recipe;
pub mod requirement;

pub use error::{Error, Result};
pub use package::{ros_package_name, BuildType, ROS_PACKAGE_PREFIX};
pub use platform::{BuildPlatform, Platform};
pub use recipe::{Build, Package, ProjectModel, Recipe, Script, DEFAULT_VERSION, UNDEFINED_NAME};
pub use requirement::{merge_requirements, Category, PackageRequirement, RequirementSet};
