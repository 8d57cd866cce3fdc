//! Requirements every generated recipe carries

use ros_conda_core::{PackageRequirement, Platform};

const BUILD_TOOLS: [&str; 7] = ["ninja", "python", "setuptools", "git", "git-lfs", "cmake", "cpython"];
const UNIX_BUILD_TOOLS: [&str; 3] = ["patch", "make", "coreutils"];
const WINDOWS_BUILD_TOOLS: [&str; 1] = ["m2-patch"];
const OSX_BUILD_TOOLS: [&str; 1] = ["tapi"];
const COMPILERS: [&str; 2] = ["${{ compiler('c') }}", "${{ compiler('cxx') }}"];

const HOST_PACKAGES: [&str; 4] = ["python", "numpy", "pip", "pkg-config"];

/// Build tools and compilers for `platform`
pub fn build_requirements(platform: Platform) -> Vec<PackageRequirement> {
    let mut tools: Vec<&str> = BUILD_TOOLS.to_vec();
    if platform.is_unix() {
        tools.extend(UNIX_BUILD_TOOLS);
    }
    if platform.is_windows() {
        tools.extend(WINDOWS_BUILD_TOOLS);
    }
    if platform.is_osx() {
        tools.extend(OSX_BUILD_TOOLS);
    }

    tools
        .into_iter()
        .map(PackageRequirement::concrete)
        .chain(COMPILERS.into_iter().map(PackageRequirement::template))
        .collect()
}

pub fn host_requirements() -> Vec<PackageRequirement> {
    HOST_PACKAGES.into_iter().map(PackageRequirement::concrete).collect()
}
