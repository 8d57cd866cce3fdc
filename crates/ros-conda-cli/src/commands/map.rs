//! Map command implementation

use std::path::PathBuf;

use color_eyre::eyre::{Context, Result};
use ros_conda_core::Platform;
use ros_conda_mapping::DependencyMapper;
use ros_conda_recipe::{distribution_provider, mapping_table};
use ros_conda_ros::DistributionProvider;
use tracing::info;

use super::load_config;

/// Map command implementation
pub struct MapCommand {
    config_path: PathBuf,
    dependencies: Vec<String>,
    distro: Option<String>,
    platform: Platform,
}

impl MapCommand {
    pub fn new(
        config_path: PathBuf,
        dependencies: Vec<String>,
        distro: Option<String>,
        platform: Platform,
    ) -> Self {
        Self { config_path, dependencies, distro, platform }
    }

    pub fn execute(&self) -> Result<()> {
        let config = load_config(&self.config_path, self.distro.as_deref())?;
        let table = mapping_table(&config).context("Failed to load mapping table")?;
        let provider: Box<dyn DistributionProvider> = distribution_provider(&config);
        let distro = provider
            .load(&config.distro)
            .with_context(|| format!("Failed to load distribution {}", config.distro))?;

        info!(
            "Mapping {} dependencies for {} on {}",
            self.dependencies.len(),
            distro.name(),
            self.platform
        );

        let mapper = DependencyMapper::new(&table, self.platform);
        for dependency in &self.dependencies {
            let packages = mapper.map(dependency, &distro);
            if packages.is_empty() {
                println!("{dependency} -> (nothing on {})", self.platform);
            } else {
                println!("{dependency} -> {}", packages.join(", "));
            }
        }

        Ok(())
    }
}
