//! Package requirements and requirement sets

use std::fmt;

use serde::{Deserialize, Serialize};

/// Marker that turns a requirement string into a template expression
const TEMPLATE_MARKER: &str = "${{";

/// A dependency of the generated recipe
///
/// Concrete requirements name a package (optionally followed by a version
/// constraint); templates are expressions such as `${{ compiler('c') }}` that
/// the build tool evaluates later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PackageRequirement {
    Concrete(String),
    Template(String),
}

impl PackageRequirement {
    /// Create a concrete requirement
    pub fn concrete(spec: impl Into<String>) -> Self {
        Self::Concrete(spec.into())
    }

    /// Create a template requirement
    pub fn template(expr: impl Into<String>) -> Self {
        Self::Template(expr.into())
    }

    /// Package name of a concrete requirement, without any version constraint
    pub fn package_name(&self) -> Option<&str> {
        match self {
            Self::Concrete(spec) => spec
                .split(|c: char| c.is_whitespace() || "=<>!~[".contains(c))
                .next()
                .filter(|name| !name.is_empty()),
            Self::Template(_) => None,
        }
    }

    /// Rendered text of a template requirement
    pub fn template_text(&self) -> Option<&str> {
        match self {
            Self::Template(expr) => Some(expr),
            Self::Concrete(_) => None,
        }
    }

    /// Check if both requirements refer to the same dependency.
    ///
    /// Concrete requirements compare by package name, templates by text.
    pub fn same_as(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Concrete(_), Self::Concrete(_)) => {
                self.package_name().is_some() && self.package_name() == other.package_name()
            }
            (Self::Template(a), Self::Template(b)) => a == b,
            _ => false,
        }
    }
}

impl From<String> for PackageRequirement {
    fn from(value: String) -> Self {
        if value.contains(TEMPLATE_MARKER) {
            Self::Template(value)
        } else {
            Self::Concrete(value)
        }
    }
}

impl From<&str> for PackageRequirement {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<PackageRequirement> for String {
    fn from(value: PackageRequirement) -> Self {
        match value {
            PackageRequirement::Concrete(s) | PackageRequirement::Template(s) => s,
        }
    }
}

impl fmt::Display for PackageRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Concrete(s) | Self::Template(s) => f.write_str(s),
        }
    }
}

/// When a requirement is needed relative to the build step
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Build,
    Host,
    Run,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Build, Category::Host, Category::Run];
}

/// Ordered build/host/run requirements
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RequirementSet {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub build: Vec<PackageRequirement>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub host: Vec<PackageRequirement>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub run: Vec<PackageRequirement>,
}

impl RequirementSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requirements of one category
    pub fn get(&self, category: Category) -> &[PackageRequirement] {
        match category {
            Category::Build => &self.build,
            Category::Host => &self.host,
            Category::Run => &self.run,
        }
    }

    fn get_mut(&mut self, category: Category) -> &mut Vec<PackageRequirement> {
        match category {
            Category::Build => &mut self.build,
            Category::Host => &mut self.host,
            Category::Run => &mut self.run,
        }
    }

    /// Check if an equivalent requirement is already present in `category`
    pub fn contains(&self, category: Category, requirement: &PackageRequirement) -> bool {
        self.get(category).iter().any(|existing| existing.same_as(requirement))
    }

    /// Append a requirement unless an equivalent one is present.
    ///
    /// Returns `true` if the requirement was added.
    pub fn push_unique(&mut self, category: Category, requirement: PackageRequirement) -> bool {
        if self.contains(category, &requirement) {
            return false;
        }
        self.get_mut(category).push(requirement);
        true
    }

    /// Append every requirement of `requirements` that is not yet present
    pub fn extend_unique<I>(&mut self, category: Category, requirements: I)
    where
        I: IntoIterator<Item = PackageRequirement>,
    {
        for requirement in requirements {
            self.push_unique(category, requirement);
        }
    }

    /// Concrete package names of one category, in order
    pub fn package_names(&self, category: Category) -> Vec<&str> {
        self.get(category).iter().filter_map(PackageRequirement::package_name).collect()
    }

    /// Total number of requirements over all categories
    pub fn len(&self) -> usize {
        self.build.len() + self.host.len() + self.run.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Merge computed requirements into a base set.
///
/// Base entries keep their position; computed entries are appended in order,
/// skipping any that match a requirement already in the result.
pub fn merge_requirements(base: &RequirementSet, computed: &RequirementSet) -> RequirementSet {
    let mut merged = base.clone();
    for category in Category::ALL {
        merged.extend_unique(category, computed.get(category).iter().cloned());
    }
    merged
}
