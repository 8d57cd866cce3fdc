//! Validate command implementation

use std::path::PathBuf;

use color_eyre::eyre::{Context, Result};
use ros_conda_core::BuildType;
use ros_conda_recipe::{distribution_provider, mapping_table, Templates};
use ros_conda_ros::{load_manifest, DistributionProvider};
use tracing::{info, warn};

use super::load_config;

/// Validate command implementation
pub struct ValidateCommand {
    config_path: PathBuf,
    manifest_path: Option<PathBuf>,
}

impl ValidateCommand {
    pub fn new(config_path: PathBuf, manifest_path: Option<PathBuf>) -> Self {
        Self { config_path, manifest_path }
    }

    pub fn execute(&self) -> Result<()> {
        info!("Validating configuration");

        let config = load_config(&self.config_path, None)?;
        println!("✓ Configuration loaded successfully (distro: {})", config.distro);

        let table = mapping_table(&config).context("Failed to load mapping table")?;
        println!("✓ Mapping table has {} entries", table.len());

        let templates = match &config.templates_dir {
            Some(dir) => Templates::from_dir(dir),
            None => Templates::Builtin,
        };
        for build_type in
            [BuildType::AmentCmake, BuildType::AmentPython, BuildType::Cmake, BuildType::Catkin]
        {
            templates
                .load(build_type)
                .with_context(|| format!("No build script template for {build_type}"))?;
        }
        println!("✓ Build script templates available");

        if let Some(debug_dir) = config.get_debug_dir()? {
            if !debug_dir.exists() {
                warn!("Debug directory does not exist yet: {}", debug_dir.display());
            }
            println!("✓ Debug directory: {}", debug_dir.display());
        }

        if let Some(manifest_path) = &self.manifest_path {
            let mut manifest = load_manifest(manifest_path).with_context(|| {
                format!("Failed to read package.xml in {}", manifest_path.display())
            })?;
            let distro = distribution_provider(&config)
                .load(&config.distro)
                .with_context(|| format!("Failed to load distribution {}", config.distro))?;
            manifest
                .evaluate_conditions(&distro.condition_context())
                .context("Failed to evaluate package.xml conditions")?;
            let build_type = manifest.resolved_build_type()?;
            println!(
                "✓ Package {} {} (format {}, {})",
                manifest.name, manifest.version, manifest.format, build_type
            );
        }

        println!("\n✓ All validation checks passed!");
        Ok(())
    }
}
