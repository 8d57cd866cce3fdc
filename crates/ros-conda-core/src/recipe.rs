//! Recipe model emitted for the package-build pipeline

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::requirement::RequirementSet;

/// Name used by the caller when the package name is still to be derived
pub const UNDEFINED_NAME: &str = "undefined";

/// Version used by the caller when the version is still to be derived
pub const DEFAULT_VERSION: &str = "0.0.0";

/// Caller-supplied project description the recipe is built on
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProjectModel {
    /// Package name, if declared by the caller
    #[serde(default)]
    pub name: Option<String>,

    /// Package version, if declared by the caller
    #[serde(default)]
    pub version: Option<String>,

    /// Requirements declared by the caller; these take precedence
    #[serde(default)]
    pub requirements: RequirementSet,
}

/// A complete build recipe
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Recipe {
    pub package: Package,
    pub build: Build,
    pub requirements: RequirementSet,
}

/// Package identity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Package {
    pub name: String,
    pub version: String,
}

/// Build section
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Build {
    /// Kept when reading an existing recipe; generated recipes leave it
    /// unset since compiled ROS packages are platform specific
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub noarch: Option<String>,

    #[serde(default)]
    pub script: Script,
}

/// Build script lines and environment
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Script {
    #[serde(default)]
    pub content: Vec<String>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub env: IndexMap<String, String>,
}

impl Package {
    /// Check if the name still has to be derived
    pub fn has_placeholder_name(&self) -> bool {
        self.name.is_empty() || self.name == UNDEFINED_NAME
    }

    /// Check if the version still has to be derived
    pub fn has_placeholder_version(&self) -> bool {
        self.version.is_empty() || self.version == DEFAULT_VERSION
    }
}

impl Recipe {
    /// Create a recipe from a project model, filling placeholders for
    /// undeclared name and version
    pub fn from_model(model: ProjectModel) -> Self {
        Self {
            package: Package {
                name: model.name.unwrap_or_else(|| UNDEFINED_NAME.to_string()),
                version: model.version.unwrap_or_else(|| DEFAULT_VERSION.to_string()),
            },
            build: Build::default(),
            requirements: model.requirements,
        }
    }

    /// Serialize the recipe to YAML
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// File name used for debug snapshots
    pub fn snapshot_file_name(&self) -> String {
        format!("{}-{}-recipe.yaml", self.package.name, self.package.version)
    }
}
