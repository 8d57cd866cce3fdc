//! Requirement extraction from a parsed manifest

use std::fmt;

use ros_conda_core::{Category, PackageRequirement, RequirementSet};
use ros_conda_ros::{DependencyCategory, Distribution, PackageManifest};
use tracing::debug;

use crate::mapper::{DependencyMapper, WORKSPACE_PACKAGE};

/// Declarations that make up the build requirements, in order
pub const BUILD_CATEGORIES: [DependencyCategory; 4] = [
    DependencyCategory::Buildtool,
    DependencyCategory::BuildtoolExport,
    DependencyCategory::Build,
    DependencyCategory::BuildExport,
];

/// Declarations that make up the run requirements, in order
pub const RUN_CATEGORIES: [DependencyCategory; 4] = [
    DependencyCategory::Run,
    DependencyCategory::Exec,
    DependencyCategory::BuildExport,
    DependencyCategory::BuildtoolExport,
];

/// Derives host requirements from the mapped build requirements
pub type HostPolicy = fn(&[PackageRequirement]) -> Vec<PackageRequirement>;

/// Host requirements are the build requirements
pub fn host_mirrors_build(build: &[PackageRequirement]) -> Vec<PackageRequirement> {
    build.to_vec()
}

/// Computes build/host/run requirements for a manifest
#[derive(Clone)]
pub struct RequirementExtractor<'a> {
    mapper: DependencyMapper<'a>,
    host_policy: HostPolicy,
}

impl fmt::Debug for RequirementExtractor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequirementExtractor").field("mapper", &self.mapper).finish_non_exhaustive()
    }
}

impl<'a> RequirementExtractor<'a> {
    pub fn new(mapper: DependencyMapper<'a>) -> Self {
        Self { mapper, host_policy: host_mirrors_build }
    }

    pub fn with_host_policy(mut self, host_policy: HostPolicy) -> Self {
        self.host_policy = host_policy;
        self
    }

    /// Extract requirements from a manifest whose conditions were evaluated
    /// for `distro`
    pub fn extract(&self, manifest: &PackageManifest, distro: &Distribution) -> RequirementSet {
        let deps = &manifest.dependencies;

        let mut build_names = deps.applicable_names(&BUILD_CATEGORIES);
        if !distro.is_ros1() {
            build_names.push(WORKSPACE_PACKAGE.to_string());
        }
        let run_names = deps.applicable_names(&RUN_CATEGORIES);

        let mut placed = RequirementSet::new();
        self.place(&mut placed, &build_names, Category::Build, distro);
        self.place(&mut placed, &run_names, Category::Run, distro);

        let mut requirements = RequirementSet::new();
        requirements.extend_unique(Category::Build, placed.build);
        requirements.extend_unique(Category::Host, (self.host_policy)(&requirements.build));
        requirements.extend_unique(Category::Host, placed.host);
        requirements.extend_unique(Category::Run, placed.run);

        debug!(
            "{}: {} build, {} host, {} run requirements",
            manifest.name,
            requirements.build.len(),
            requirements.host.len(),
            requirements.run.len()
        );
        requirements
    }

    fn place(
        &self,
        placed: &mut RequirementSet,
        names: &[String],
        aggregate: Category,
        distro: &Distribution,
    ) {
        for name in names {
            for package in self.mapper.map_placed(name, distro) {
                let category = package.placement.resolve(aggregate);
                placed.push_unique(category, PackageRequirement::concrete(package.name));
            }
        }
    }
}
