//! Expansion of marker tokens in mapped package lists
//!
//! Some mapping entries name a capability instead of a package, e.g.
//! `REQUIRE_OPENGL`. Markers are replaced by the packages their rule lists
//! for the target platform.

use ros_conda_core::{Category, Platform};

pub const REQUIRE_GL: &str = "REQUIRE_GL";
pub const REQUIRE_OPENGL: &str = "REQUIRE_OPENGL";

/// Requirement category a mapped package ends up in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Same category as the dependency that produced it
    Inherit,
    Build,
    Host,
    Run,
}

impl Placement {
    /// Resolve against the category of the originating dependency
    pub fn resolve(self, inherited: Category) -> Category {
        match self {
            Self::Inherit => inherited,
            Self::Build => Category::Build,
            Self::Host => Category::Host,
            Self::Run => Category::Run,
        }
    }
}

/// Platforms an expansion applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformFamily {
    Linux,
    /// Linux and macOS
    Unix,
    Any,
}

impl PlatformFamily {
    pub fn matches(self, platform: Platform) -> bool {
        match self {
            Self::Linux => platform.is_linux(),
            Self::Unix => platform.is_unix(),
            Self::Any => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expansion {
    pub family: PlatformFamily,
    pub packages: &'static [&'static str],
    pub placement: Placement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerRule {
    pub marker: &'static str,
    pub expansions: &'static [Expansion],
}

/// Known markers, applied in this order
pub const MARKER_RULES: &[MarkerRule] = &[
    MarkerRule {
        marker: REQUIRE_GL,
        expansions: &[Expansion {
            family: PlatformFamily::Linux,
            packages: &["libgl-devel"],
            placement: Placement::Inherit,
        }],
    },
    MarkerRule {
        marker: REQUIRE_OPENGL,
        expansions: &[
            Expansion {
                family: PlatformFamily::Linux,
                packages: &["libgl-devel", "libopengl-devel"],
                placement: Placement::Inherit,
            },
            Expansion {
                family: PlatformFamily::Unix,
                packages: &["xorg-libx11", "xorg-libxext"],
                placement: Placement::Inherit,
            },
        ],
    },
];

/// A conda package produced by mapping, with where it should be placed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedPackage {
    pub name: String,
    pub placement: Placement,
}

impl MappedPackage {
    pub fn inherit(name: impl Into<String>) -> Self {
        Self { name: name.into(), placement: Placement::Inherit }
    }
}

pub fn is_marker(name: &str) -> bool {
    MARKER_RULES.iter().any(|rule| rule.marker == name)
}

/// Replace every marker in `packages` with its expansion for `platform`.
///
/// Non-marker names keep their order and come first; expansions follow in
/// rule order. Applying this to its own output changes nothing.
pub fn expand_markers(packages: Vec<String>, platform: Platform) -> Vec<MappedPackage> {
    let present: Vec<&MarkerRule> = MARKER_RULES
        .iter()
        .filter(|rule| packages.iter().any(|name| name == rule.marker))
        .collect();

    let mut expanded: Vec<MappedPackage> = packages
        .into_iter()
        .filter(|name| !is_marker(name))
        .map(MappedPackage::inherit)
        .collect();

    for rule in present {
        for expansion in rule.expansions.iter().filter(|e| e.family.matches(platform)) {
            expanded.extend(expansion.packages.iter().map(|name| MappedPackage {
                name: (*name).to_string(),
                placement: expansion.placement,
            }));
        }
    }

    expanded
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(packages: &[MappedPackage]) -> Vec<&str> {
        packages.iter().map(|p| p.name.as_str()).collect()
    }

    fn strings(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_require_gl() {
        let linux = expand_markers(strings(&["REQUIRE_GL"]), Platform::Linux64);
        assert_eq!(names(&linux), vec!["libgl-devel"]);

        let osx = expand_markers(strings(&["REQUIRE_GL"]), Platform::OsxArm64);
        assert!(osx.is_empty());
    }

    #[test]
    fn test_require_opengl_per_platform() {
        let input = strings(&["qt-main", "REQUIRE_OPENGL"]);

        let linux = expand_markers(input.clone(), Platform::Linux64);
        assert_eq!(
            names(&linux),
            vec!["qt-main", "libgl-devel", "libopengl-devel", "xorg-libx11", "xorg-libxext"]
        );

        let osx = expand_markers(input.clone(), Platform::Osx64);
        assert_eq!(names(&osx), vec!["qt-main", "xorg-libx11", "xorg-libxext"]);

        let win = expand_markers(input, Platform::Win64);
        assert_eq!(names(&win), vec!["qt-main"]);
    }

    #[test]
    fn test_every_occurrence_removed() {
        let expanded =
            expand_markers(strings(&["REQUIRE_GL", "glew", "REQUIRE_GL"]), Platform::Win64);
        assert_eq!(names(&expanded), vec!["glew"]);
    }

    #[test]
    fn test_expansion_is_idempotent() {
        for platform in [Platform::Linux64, Platform::OsxArm64, Platform::Win64] {
            let once = expand_markers(strings(&["REQUIRE_GL", "REQUIRE_OPENGL"]), platform);
            let again = expand_markers(once.iter().map(|p| p.name.clone()).collect(), platform);
            assert_eq!(once, again);
            assert!(once.iter().all(|p| !is_marker(&p.name)));
        }
    }

    #[test]
    fn test_placement_resolution() {
        assert_eq!(Placement::Inherit.resolve(Category::Run), Category::Run);
        assert_eq!(Placement::Host.resolve(Category::Run), Category::Host);
    }
}
