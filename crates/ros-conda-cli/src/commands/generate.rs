//! Generate command implementation

use std::path::PathBuf;

use color_eyre::eyre::{Context, Result};
use ros_conda_core::{Platform, ProjectModel};
use ros_conda_recipe::RecipeGenerator;
use tracing::info;

use super::load_config;

/// Generate command implementation
pub struct GenerateCommand {
    pub config_path: PathBuf,
    pub manifest_path: PathBuf,
    pub model_path: Option<PathBuf>,
    pub platform: Platform,
    pub distro: Option<String>,
    pub editable: bool,
    pub output: Option<PathBuf>,
}

impl GenerateCommand {
    pub fn execute(&self) -> Result<()> {
        let config = load_config(&self.config_path, self.distro.as_deref())?;
        let model = self.load_model()?;

        let generator = RecipeGenerator::new(config)
            .context("Failed to set up recipe generation")?
            .with_editable(self.editable);
        let generated = generator
            .generate(model, &self.manifest_path, self.platform)
            .with_context(|| {
                format!("Failed to generate recipe for {}", self.manifest_path.display())
            })?;

        let yaml = generated.recipe.to_yaml().context("Failed to serialize recipe")?;
        match &self.output {
            Some(output) => {
                std::fs::write(output, yaml)
                    .with_context(|| format!("Failed to write recipe to {}", output.display()))?;
                info!(
                    "Wrote recipe for {} {} to {}",
                    generated.recipe.package.name,
                    generated.recipe.package.version,
                    output.display()
                );
            }
            None => print!("{yaml}"),
        }

        Ok(())
    }

    fn load_model(&self) -> Result<ProjectModel> {
        let Some(path) = &self.model_path else {
            return Ok(ProjectModel::default());
        };
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read project model {}", path.display()))?;
        // YAML is a superset of JSON
        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse project model {}", path.display()))
    }
}
