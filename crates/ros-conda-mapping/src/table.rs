//! The rosdep-key to conda package mapping table
//!
//! The table uses the RoboStack layout: every key maps to an object whose
//! `robostack` field is either a flat list of conda packages or a per-platform
//! object with `linux`, `osx` and `win64` (or `win`) lists.
//!
//! ```yaml
//! eigen:
//!   robostack: [eigen]
//! libudev-dev:
//!   robostack:
//!     linux: [libudev]
//!     osx: []
//!     win64: []
//! ```

use std::path::Path;

use indexmap::IndexMap;
use once_cell::sync::OnceCell;
use ros_conda_core::{Error, Platform, Result};
use serde::Deserialize;
use tracing::debug;

const BUILTIN_TABLE: &str = include_str!("../data/robostack.yaml");

static BUILTIN: OnceCell<MappingTable> = OnceCell::new();

/// Conda packages a key maps to
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TargetPackages {
    /// Same packages on every platform
    Flat(Vec<String>),
    /// Packages keyed by platform family
    PerPlatform(IndexMap<String, Vec<String>>),
}

impl TargetPackages {
    /// Packages for `platform`; a platform without a key maps to nothing
    pub fn for_platform(&self, platform: Platform) -> Vec<String> {
        match self {
            Self::Flat(packages) => packages.clone(),
            Self::PerPlatform(by_platform) => platform
                .mapping_keys()
                .iter()
                .find_map(|key| by_platform.get(*key))
                .cloned()
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    #[serde(default)]
    robostack: Option<TargetPackages>,
}

/// Immutable mapping from dependency keys to conda packages
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingTable {
    entries: IndexMap<String, TargetPackages>,
}

impl MappingTable {
    /// The table shipped with this crate, parsed once per process
    pub fn builtin() -> Result<&'static MappingTable> {
        BUILTIN.get_or_try_init(|| Self::from_yaml_str(BUILTIN_TABLE))
    }

    /// Load a table from a YAML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::mapping_data(format!("cannot read mapping table {}: {e}", path.display()))
        })?;
        let table = Self::from_yaml_str(&content)
            .map_err(|e| Error::mapping_data(format!("{}: {e}", path.display())))?;
        debug!("Loaded {} mapping entries from {}", table.len(), path.display());
        Ok(table)
    }

    /// Parse a table from YAML text
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let raw: IndexMap<String, serde_yaml::Value> = serde_yaml::from_str(content)
            .map_err(|e| Error::mapping_data(format!("malformed mapping table: {e}")))?;

        let mut entries = IndexMap::with_capacity(raw.len());
        for (key, value) in raw {
            // `key:` with no body is an entry without packages
            let entry: RawEntry = if value.is_null() {
                RawEntry { robostack: None }
            } else {
                serde_yaml::from_value(value).map_err(|e| {
                    Error::mapping_data(format!("malformed mapping entry '{key}': {e}"))
                })?
            };
            let targets = entry.robostack.unwrap_or(TargetPackages::Flat(Vec::new()));
            entries.insert(key, targets);
        }

        Ok(Self { entries })
    }

    /// Packages `key` maps to on `platform`, or `None` if the key is unknown
    pub fn lookup(&self, key: &str, platform: Platform) -> Option<Vec<String>> {
        self.entries.get(key).map(|targets| targets.for_platform(platform))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = r#"
eigen:
  robostack: [eigen]
libudev-dev:
  robostack:
    linux: [libudev]
    osx: []
    win64: []
libomp-dev:
  robostack:
    osx: [llvm-openmp]
    win: [intel-openmp]
no-packages:
  other_field: [ignored]
bare-key:
"#;

    #[test]
    fn test_flat_entry() {
        let table = MappingTable::from_yaml_str(TABLE).unwrap();
        for platform in [Platform::Linux64, Platform::OsxArm64, Platform::Win64] {
            assert_eq!(table.lookup("eigen", platform), Some(vec!["eigen".to_string()]));
        }
    }

    #[test]
    fn test_platform_entry() {
        let table = MappingTable::from_yaml_str(TABLE).unwrap();
        assert_eq!(table.lookup("libudev-dev", Platform::Linux64), Some(vec!["libudev".to_string()]));
        assert_eq!(table.lookup("libudev-dev", Platform::Osx64), Some(vec![]));
        assert_eq!(table.lookup("libomp-dev", Platform::Win64), Some(vec!["intel-openmp".to_string()]));
        // no linux key at all
        assert_eq!(table.lookup("libomp-dev", Platform::LinuxAarch64), Some(vec![]));
    }

    #[test]
    fn test_entries_without_packages() {
        let table = MappingTable::from_yaml_str(TABLE).unwrap();
        assert_eq!(table.lookup("no-packages", Platform::Linux64), Some(vec![]));
        assert_eq!(table.lookup("bare-key", Platform::Linux64), Some(vec![]));
        assert_eq!(table.lookup("unknown", Platform::Linux64), None);
    }

    #[test]
    fn test_malformed_table() {
        let err = MappingTable::from_yaml_str("eigen:\n  robostack: 42\n").unwrap_err();
        assert!(matches!(err, Error::MappingData { .. }));
        assert!(err.to_string().contains("eigen"));

        let err = MappingTable::from_yaml_str("- not\n- a map\n").unwrap_err();
        assert!(matches!(err, Error::MappingData { .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = MappingTable::from_file(Path::new("/nonexistent/robostack.yaml")).unwrap_err();
        assert!(matches!(err, Error::MappingData { .. }));
    }

    #[test]
    fn test_builtin_table_loads_once() {
        let first = MappingTable::builtin().unwrap();
        let second = MappingTable::builtin().unwrap();
        assert!(std::ptr::eq(first, second));
        assert!(first.contains("libgl-dev"));
        assert!(first.contains("python3-numpy"));
    }
}
