//! Package.xml parsing types and structures

use std::str::FromStr;

use ros_conda_core::{BuildType, Error, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::condition::{evaluate_condition, ConditionContext};

/// ROS package manifest from package.xml
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PackageManifest {
    /// Manifest format (1, 2 or 3)
    pub format: u32,

    /// Package name
    pub name: String,

    /// Package version
    pub version: String,

    /// Package description
    pub description: String,

    /// Package maintainers
    pub maintainers: Vec<Person>,

    /// Package authors
    pub authors: Vec<Person>,

    /// Package license(s)
    pub licenses: Vec<String>,

    /// Package URL(s)
    pub urls: Vec<Url>,

    /// Build types declared in `<export>`, possibly conditional
    pub build_types: Vec<ExportBuildType>,

    /// Package dependencies
    pub dependencies: PackageDependencies,
}

/// Person information (maintainer or author)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Person {
    /// Person's name
    pub name: String,

    /// Person's email (optional)
    pub email: Option<String>,
}

/// URL with type
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Url {
    /// URL type (website, repository, bugtracker, etc.)
    #[serde(rename = "type")]
    pub url_type: Option<String>,

    /// The URL itself
    pub url: String,
}

/// A `<build_type>` entry of the export section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExportBuildType {
    /// Build type name as written
    pub name: String,

    /// Optional condition
    pub condition: Option<String>,

    /// Result of evaluating `condition`; true until evaluated
    #[serde(default = "default_evaluated")]
    pub evaluated_condition: bool,
}

impl ExportBuildType {
    pub fn new(name: impl Into<String>, condition: Option<String>) -> Self {
        Self { name: name.into(), condition, evaluated_condition: true }
    }

    pub fn applies(&self) -> bool {
        self.evaluated_condition
    }
}

/// Dependency tag categories of package.xml
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyCategory {
    Buildtool,
    BuildtoolExport,
    Build,
    BuildExport,
    Run,
    Exec,
    Test,
    Doc,
}

/// All dependency types in package.xml
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PackageDependencies {
    /// Build dependencies
    pub build_depend: Vec<DependencySpec>,

    /// Build export dependencies
    pub build_export_depend: Vec<DependencySpec>,

    /// Build tool dependencies
    pub buildtool_depend: Vec<DependencySpec>,

    /// Build tool export dependencies
    pub buildtool_export_depend: Vec<DependencySpec>,

    /// Execution dependencies
    pub exec_depend: Vec<DependencySpec>,

    /// Run dependencies (format 1)
    pub run_depend: Vec<DependencySpec>,

    /// Test dependencies
    pub test_depend: Vec<DependencySpec>,

    /// Documentation dependencies
    pub doc_depend: Vec<DependencySpec>,

    /// Generic dependencies (maps to build, build_export, and exec)
    pub depend: Vec<DependencySpec>,
}

/// A dependency specification
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DependencySpec {
    /// Package name
    pub name: String,

    /// Optional version constraint
    pub version_eq: Option<String>,
    pub version_gte: Option<String>,
    pub version_lte: Option<String>,
    pub version_gt: Option<String>,
    pub version_lt: Option<String>,

    /// Optional condition
    pub condition: Option<String>,

    /// Result of evaluating `condition`; true until evaluated
    #[serde(default = "default_evaluated")]
    pub evaluated_condition: bool,
}

fn default_evaluated() -> bool {
    true
}

impl DependencySpec {
    /// Create an unconditional dependency without version constraints
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version_eq: None,
            version_gte: None,
            version_lte: None,
            version_gt: None,
            version_lt: None,
            condition: None,
            evaluated_condition: true,
        }
    }

    /// Create a dependency guarded by a condition
    pub fn with_condition(name: impl Into<String>, condition: impl Into<String>) -> Self {
        Self { condition: Some(condition.into()), ..Self::new(name) }
    }

    /// Check if the dependency applies in the evaluated context
    pub fn applies(&self) -> bool {
        self.evaluated_condition
    }
}

impl PackageDependencies {
    /// Declarations of one category
    pub fn declarations(&self, category: DependencyCategory) -> &[DependencySpec] {
        match category {
            DependencyCategory::Buildtool => &self.buildtool_depend,
            DependencyCategory::BuildtoolExport => &self.buildtool_export_depend,
            DependencyCategory::Build => &self.build_depend,
            DependencyCategory::BuildExport => &self.build_export_depend,
            DependencyCategory::Run => &self.run_depend,
            DependencyCategory::Exec => &self.exec_depend,
            DependencyCategory::Test => &self.test_depend,
            DependencyCategory::Doc => &self.doc_depend,
        }
    }

    /// Names of applicable dependencies across `categories`, in order
    pub fn applicable_names(&self, categories: &[DependencyCategory]) -> Vec<String> {
        categories
            .iter()
            .flat_map(|category| self.declarations(*category))
            .filter(|dep| dep.applies())
            .map(|dep| dep.name.clone())
            .collect()
    }

    /// Expand generic 'depend' tags into specific dependency types
    pub fn expand_generic_depends(&mut self) {
        // Generic 'depend' expands to build_depend, build_export_depend, and
        // exec_depend
        for dep in &self.depend {
            self.build_depend.push(dep.clone());
            self.build_export_depend.push(dep.clone());
            self.exec_depend.push(dep.clone());
        }
    }

    /// Expand format 1 'run_depend' tags into build_export_depend and
    /// exec_depend
    pub fn expand_run_depends(&mut self) {
        for dep in &self.run_depend {
            self.build_export_depend.push(dep.clone());
            self.exec_depend.push(dep.clone());
        }
    }

    fn all_specs_mut(&mut self) -> impl Iterator<Item = &mut DependencySpec> {
        self.build_depend
            .iter_mut()
            .chain(&mut self.build_export_depend)
            .chain(&mut self.buildtool_depend)
            .chain(&mut self.buildtool_export_depend)
            .chain(&mut self.exec_depend)
            .chain(&mut self.run_depend)
            .chain(&mut self.test_depend)
            .chain(&mut self.doc_depend)
            .chain(&mut self.depend)
    }
}

impl PackageManifest {
    /// Evaluate every dependency and build type condition against `context`
    pub fn evaluate_conditions(&mut self, context: &ConditionContext) -> Result<()> {
        for dep in self.dependencies.all_specs_mut() {
            dep.evaluated_condition = eval_optional(dep.condition.as_deref(), context)?;
        }
        for build_type in &mut self.build_types {
            build_type.evaluated_condition =
                eval_optional(build_type.condition.as_deref(), context)?;
        }
        Ok(())
    }

    /// Resolve the build type.
    ///
    /// The applicable `<export><build_type>` tag wins; without one the type
    /// is inferred from build tool dependencies and finally defaults to
    /// catkin. More than one applicable tag is an error.
    pub fn resolved_build_type(&self) -> Result<BuildType> {
        let mut applicable = self.build_types.iter().filter(|bt| bt.applies());
        if let Some(declared) = applicable.next() {
            if let Some(other) = applicable.next() {
                return Err(Error::parse(format!(
                    "{}: more than one applicable build_type ('{}' and '{}')",
                    self.name, declared.name, other.name
                )));
            }
            return BuildType::from_str(&declared.name);
        }

        let buildtools = &self.dependencies.buildtool_depend;
        let inferred = [BuildType::AmentCmake, BuildType::AmentPython, BuildType::Cmake]
            .into_iter()
            .find(|bt| buildtools.iter().any(|d| d.applies() && d.name == bt.as_str()));

        match inferred {
            Some(build_type) => {
                debug!(
                    "{}: no build_type exported, inferred {} from build tools",
                    self.name, build_type
                );
                Ok(build_type)
            }
            None => {
                debug!("{}: no build_type exported, defaulting to catkin", self.name);
                Ok(BuildType::Catkin)
            }
        }
    }
}

fn eval_optional(condition: Option<&str>, context: &ConditionContext) -> Result<bool> {
    match condition {
        Some(condition) => evaluate_condition(condition, context),
        None => Ok(true),
    }
}
