//! CLI command implementations

use std::path::Path;

use color_eyre::eyre::{eyre, Context, Result};
use ros_conda_config::RosBackendConfig;
use tracing::debug;

pub mod generate;
pub mod init;
pub mod map;
pub mod validate;

pub use generate::GenerateCommand;
pub use init::InitCommand;
pub use map::MapCommand;
pub use validate::ValidateCommand;

/// Configuration file used when `--config` is not given
pub const DEFAULT_CONFIG: &str = "ros-conda.yaml";

/// Load the backend configuration, applying a distro override.
///
/// Without a configuration file a distro override alone is enough.
pub(crate) fn load_config(path: &Path, distro: Option<&str>) -> Result<RosBackendConfig> {
    let mut config = if path.exists() {
        RosBackendConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?
    } else if let Some(distro) = distro {
        debug!("No configuration at {}, using defaults", path.display());
        RosBackendConfig::new(distro)
    } else {
        return Err(eyre!(
            "Configuration file {} not found. Run 'ros-conda init' or pass --distro.",
            path.display()
        ));
    };

    if let Some(distro) = distro {
        config.distro = distro.to_string();
    }
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_load_config_without_file() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join(DEFAULT_CONFIG);

        assert!(load_config(&missing, None).is_err());

        let config = load_config(&missing, Some("jazzy")).unwrap();
        assert_eq!(config.distro, "jazzy");
        assert!(config.is_noarch());
    }

    #[test]
    fn test_distro_override() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(DEFAULT_CONFIG);
        std::fs::write(&path, "distro: humble\nnoarch: false\n").unwrap();

        assert_eq!(load_config(&path, None).unwrap().distro, "humble");

        let config = load_config(&path, Some("noetic")).unwrap();
        assert_eq!(config.distro, "noetic");
        assert!(!config.is_noarch());
    }
}
