//! ROS package handling for ros-conda
//!
//! This crate parses `package.xml` manifests, evaluates their dependency
//! conditions and reads released distributions from a rosdistro index.

pub mod condition;
pub mod distro;
pub mod package_xml;
pub mod parser;

pub use condition::{evaluate_condition, ConditionContext};
pub use distro::{
    default_index_url, CachedSource, Distribution, DistributionIndex, DistributionProvider,
    DistributionType, IndexSource, UrlSource, DEFAULT_INDEX_URL,
};
pub use package_xml::{
    DependencyCategory, DependencySpec, ExportBuildType, PackageDependencies, PackageManifest,
    Person, Url,
};
pub use parser::{load_manifest, parse_package_manifest, parse_package_xml, PACKAGE_XML};
