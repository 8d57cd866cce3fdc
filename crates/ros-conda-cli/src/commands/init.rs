//! Init command implementation

use std::path::PathBuf;

use color_eyre::eyre::{Context, Result};
use ros_conda_config::RosBackendConfig;
use tracing::info;

/// Init command implementation
pub struct InitCommand {
    output_path: PathBuf,
    force: bool,
    distro: String,
}

impl InitCommand {
    pub fn new(output_path: PathBuf, force: bool, distro: String) -> Self {
        Self { output_path, force, distro }
    }

    pub fn execute(&self) -> Result<()> {
        info!("Initializing configuration file at {}", self.output_path.display());

        // Check if file already exists
        if self.output_path.exists() && !self.force {
            return Err(color_eyre::eyre::eyre!(
                "Configuration file already exists: {}. Use --force to overwrite.",
                self.output_path.display()
            ));
        }

        let config = self.create_default_config()?;
        let yaml_content = config.to_yaml().context("Failed to serialize config to YAML")?;

        std::fs::write(&self.output_path, yaml_content)
            .with_context(|| format!("Failed to write config to {}", self.output_path.display()))?;

        println!("✓ Created configuration file: {}", self.output_path.display());
        println!("\nNext steps:");
        println!("1. Edit the configuration file to match your package");
        println!(
            "2. Run 'ros-conda validate -c {}' to validate the configuration",
            self.output_path.display()
        );
        println!(
            "3. Run 'ros-conda generate -c {} -m <package dir>' to generate a recipe",
            self.output_path.display()
        );

        Ok(())
    }

    fn create_default_config(&self) -> Result<RosBackendConfig> {
        let mut config = RosBackendConfig::new(self.distro.clone());
        config.noarch = Some(false);
        config.extra_input_globs = vec!["msg/*.msg".to_string(), "srv/*.srv".to_string()];
        config.validate().context("Invalid default configuration")?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_init_writes_loadable_config() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("ros-conda.yaml");

        InitCommand::new(output.clone(), false, "jazzy".to_string()).execute().unwrap();
        let config = RosBackendConfig::from_file(&output).unwrap();
        assert_eq!(config.distro, "jazzy");

        // refuses to overwrite without --force
        assert!(InitCommand::new(output.clone(), false, "humble".to_string()).execute().is_err());
        InitCommand::new(output.clone(), true, "humble".to_string()).execute().unwrap();
        assert_eq!(RosBackendConfig::from_file(&output).unwrap().distro, "humble");
    }
}
