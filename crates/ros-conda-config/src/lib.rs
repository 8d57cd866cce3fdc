//! Configuration management for ros-conda
//!
//! This crate handles the backend configuration (YAML or JSON), its
//! validation, and environment variable substitution in configured paths.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use regex::Regex;
use ros_conda_core::error::{Error, Result};
use ros_conda_ros::default_index_url;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Backend configuration for recipe generation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct RosBackendConfig {
    /// Whether to build a noarch package; unset means yes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub noarch: Option<bool>,

    /// Environment variables set during the build
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub env: IndexMap<String, String>,

    /// Directory receiving a copy of every generated recipe
    #[serde(default, alias = "debug_dir", skip_serializing_if = "Option::is_none")]
    pub debug_dir: Option<PathBuf>,

    /// Extra globs that invalidate the build when matching files change
    #[serde(default, alias = "extra_input_globs", skip_serializing_if = "Vec::is_empty")]
    pub extra_input_globs: Vec<String>,

    /// ROS distribution to build against, e.g. `humble`
    pub distro: String,

    /// rosdistro index location (URL or path)
    #[serde(default, alias = "index_url", skip_serializing_if = "Option::is_none")]
    pub index_url: Option<String>,

    /// Directory caching downloaded distribution files
    #[serde(default, alias = "cache_dir", skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<PathBuf>,

    /// Mapping table replacing the built-in one
    #[serde(default, alias = "mapping_file", skip_serializing_if = "Option::is_none")]
    pub mapping_file: Option<PathBuf>,

    /// Directory with `build_<kind>.sh.in` templates replacing the built-in ones
    #[serde(default, alias = "templates_dir", skip_serializing_if = "Option::is_none")]
    pub templates_dir: Option<PathBuf>,
}

impl RosBackendConfig {
    /// Create a configuration with defaults for everything but the distro
    pub fn new(distro: impl Into<String>) -> Self {
        Self {
            noarch: None,
            env: IndexMap::new(),
            debug_dir: None,
            extra_input_globs: Vec::new(),
            distro: distro.into(),
            index_url: None,
            cache_dir: None,
            mapping_file: None,
            templates_dir: None,
        }
    }

    /// Load configuration from a YAML or JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("Failed to read config file {path:?}: {e}")))?;

        let is_json = path.extension().is_some_and(|ext| ext == "json");
        let mut config: RosBackendConfig = if is_json {
            serde_json::from_str(&content)
                .map_err(|e| Error::config(format!("Failed to parse JSON: {e}")))?
        } else {
            serde_yaml::from_str(&content)
                .map_err(|e| Error::config(format!("Failed to parse YAML: {e}")))?
        };

        config.expand_env_vars()?;
        config.validate()?;

        debug!("Loaded backend configuration for {} from {:?}", config.distro, path);
        Ok(config)
    }

    /// Build a configuration from an already parsed JSON object
    pub fn from_json_value(value: serde_json::Value) -> Result<Self> {
        let mut config: RosBackendConfig = serde_json::from_value(value)
            .map_err(|e| Error::config(format!("Invalid backend configuration: {e}")))?;
        config.expand_env_vars()?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to YAML, e.g. for `init`
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Expand environment variables in paths
    fn expand_env_vars(&mut self) -> Result<()> {
        for path in [
            &mut self.debug_dir,
            &mut self.cache_dir,
            &mut self.mapping_file,
            &mut self.templates_dir,
        ]
        .into_iter()
        .flatten()
        {
            *path = expand_path(path)?;
        }
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.distro.is_empty() {
            return Err(Error::config("distro must be set"));
        }
        if !self.distro.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') {
            return Err(Error::config(format!("Invalid distro name: {:?}", self.distro)));
        }

        for key in self.env.keys() {
            if key.is_empty() || key.contains('=') {
                return Err(Error::config(format!("Invalid environment variable name: {key:?}")));
            }
        }

        if self.extra_input_globs.iter().any(|glob| glob.trim().is_empty()) {
            return Err(Error::config("extra-input-globs must not contain empty globs"));
        }

        if let Some(templates_dir) = &self.templates_dir {
            if !templates_dir.is_dir() {
                return Err(Error::config(format!(
                    "Templates directory does not exist: {templates_dir:?}"
                )));
            }
        }

        Ok(())
    }

    /// Whether a noarch package was requested.
    ///
    /// Recipe generation does not apply this; generated recipes are always
    /// platform specific.
    pub fn is_noarch(&self) -> bool {
        self.noarch.unwrap_or(true)
    }

    /// Debug directory made absolute against the working directory
    pub fn get_debug_dir(&self) -> Result<Option<PathBuf>> {
        match &self.debug_dir {
            Some(dir) if dir.is_absolute() => Ok(Some(dir.clone())),
            Some(dir) => Ok(Some(std::env::current_dir()?.join(dir))),
            None => Ok(None),
        }
    }

    /// Configured index location, falling back to the environment and then
    /// the public rosdistro index
    pub fn resolved_index_url(&self) -> String {
        self.index_url.clone().unwrap_or_else(default_index_url)
    }
}

/// Expand environment variables in a path
fn expand_path(path: &Path) -> Result<PathBuf> {
    let path_str = path.to_string_lossy();
    let env_var_re = Regex::new(r"\$\{([^}]+)\}|\$([A-Za-z_][A-Za-z0-9_]*)")
        .map_err(|e| Error::config(format!("Invalid expansion pattern: {e}")))?;

    let mut result = path_str.to_string();
    for cap in env_var_re.captures_iter(&path_str) {
        let Some(var_name) = cap.get(1).or_else(|| cap.get(2)).map(|m| m.as_str()) else {
            continue;
        };
        let var_value = std::env::var(var_name)
            .map_err(|_| Error::config(format!("Environment variable not found: {var_name}")))?;

        result = result.replace(&cap[0], &var_value);
    }

    Ok(PathBuf::from(result))
}

#[cfg(test)]
mod tests {
    use std::env;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_expand_path() {
        env::set_var("ROS_CONDA_TEST_VAR", "/test/path");

        let path = PathBuf::from("${ROS_CONDA_TEST_VAR}/sub");
        let expanded = expand_path(&path).unwrap();
        assert_eq!(expanded, PathBuf::from("/test/path/sub"));

        let path = PathBuf::from("$ROS_CONDA_TEST_VAR/sub");
        let expanded = expand_path(&path).unwrap();
        assert_eq!(expanded, PathBuf::from("/test/path/sub"));
    }

    #[test]
    fn test_expand_path_missing_variable() {
        let path = PathBuf::from("${ROS_CONDA_SURELY_UNSET_VARIABLE}/sub");
        assert!(matches!(expand_path(&path), Err(Error::Config { .. })));
    }

    #[test]
    fn test_from_yaml_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("ros-conda.yaml");
        std::fs::write(
            &config_path,
            r#"
distro: humble
noarch: false
env:
  ROS_DOMAIN_ID: "7"
  CMAKE_BUILD_PARALLEL_LEVEL: "4"
debug-dir: debug
extra_input_globs:
  - "msg/*.msg"
"#,
        )
        .unwrap();

        let config = RosBackendConfig::from_file(&config_path).unwrap();
        assert_eq!(config.distro, "humble");
        assert!(!config.is_noarch());
        assert_eq!(
            config.env.keys().collect::<Vec<_>>(),
            vec!["ROS_DOMAIN_ID", "CMAKE_BUILD_PARALLEL_LEVEL"]
        );
        assert_eq!(config.extra_input_globs, vec!["msg/*.msg"]);

        let debug_dir = config.get_debug_dir().unwrap().unwrap();
        assert!(debug_dir.is_absolute());
        assert!(debug_dir.ends_with("debug"));
    }

    #[test]
    fn test_from_json_value_defaults() {
        let config = RosBackendConfig::from_json_value(serde_json::json!({
            "distro": "jazzy",
            "index-url": "file:///srv/rosdistro/index-v4.yaml",
        }))
        .unwrap();

        assert!(config.is_noarch());
        assert!(config.env.is_empty());
        assert_eq!(config.get_debug_dir().unwrap(), None);
        assert_eq!(config.resolved_index_url(), "file:///srv/rosdistro/index-v4.yaml");
    }

    #[test]
    fn test_missing_distro_rejected() {
        let err = RosBackendConfig::from_json_value(serde_json::json!({ "noarch": true }))
            .unwrap_err();
        assert!(matches!(err, Error::Config { .. }));

        assert!(RosBackendConfig::new("").validate().is_err());
        assert!(RosBackendConfig::new("hum ble").validate().is_err());
    }

    #[test]
    fn test_config_validation() {
        let temp_dir = TempDir::new().unwrap();

        let mut config = RosBackendConfig::new("humble");
        config.templates_dir = Some(temp_dir.path().to_path_buf());
        assert!(config.validate().is_ok());

        config.templates_dir = Some(temp_dir.path().join("missing"));
        assert!(config.validate().is_err());

        let mut config = RosBackendConfig::new("humble");
        config.env.insert("BAD=NAME".to_string(), "1".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_yaml_round_trip_uses_kebab_case() {
        let mut config = RosBackendConfig::new("humble");
        config.debug_dir = Some(PathBuf::from("/tmp/debug"));

        let yaml = config.to_yaml().unwrap();
        assert!(yaml.contains("debug-dir: /tmp/debug"));
        assert!(!yaml.contains("noarch"));
    }
}
