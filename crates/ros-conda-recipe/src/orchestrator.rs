//! Recipe generation from a ROS package directory

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use ros_conda_config::RosBackendConfig;
use ros_conda_core::{
    merge_requirements, ros_package_name, Category, Platform, ProjectModel, Recipe, Result,
};
use ros_conda_mapping::{
    host_mirrors_build, DependencyMapper, HostPolicy, MappingTable, RequirementExtractor,
};
use ros_conda_ros::{
    load_manifest, CachedSource, DistributionIndex, DistributionProvider, UrlSource,
};
use tracing::{debug, info, warn};

use crate::baseline;
use crate::build_script::{BuildScriptContext, Templates};
use crate::input_globs::build_input_globs;

/// A recipe together with the files that invalidate it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedRecipe {
    pub recipe: Recipe,
    pub build_input_globs: Vec<String>,
}

/// Generates conda recipes for ROS packages
pub struct RecipeGenerator {
    /// Backend configuration
    config: RosBackendConfig,
    /// Source of released distributions
    distributions: Box<dyn DistributionProvider>,
    /// Dependency mapping table
    mapping: Cow<'static, MappingTable>,
    /// Build script templates
    templates: Templates,
    host_policy: HostPolicy,
    editable: bool,
}

impl RecipeGenerator {
    /// Create a generator reading distributions from the configured index
    pub fn new(config: RosBackendConfig) -> Result<Self> {
        let distributions = distribution_provider(&config);
        Self::with_distributions(config, distributions)
    }

    /// Create a generator with an explicit distribution source
    pub fn with_distributions(
        config: RosBackendConfig,
        distributions: Box<dyn DistributionProvider>,
    ) -> Result<Self> {
        config.validate()?;

        let mapping = mapping_table(&config)?;
        let templates = match &config.templates_dir {
            Some(dir) => Templates::from_dir(dir),
            None => Templates::Builtin,
        };

        Ok(Self {
            config,
            distributions,
            mapping,
            templates,
            host_policy: host_mirrors_build,
            editable: false,
        })
    }

    pub fn with_host_policy(mut self, host_policy: HostPolicy) -> Self {
        self.host_policy = host_policy;
        self
    }

    /// Treat the package as installed in editable mode
    pub fn with_editable(mut self, editable: bool) -> Self {
        self.editable = editable;
        self
    }

    pub fn config(&self) -> &RosBackendConfig {
        &self.config
    }

    pub fn mapping(&self) -> &MappingTable {
        &self.mapping
    }

    /// Generate the recipe for the package in `manifest_root`
    pub fn generate(
        &self,
        model: ProjectModel,
        manifest_root: &Path,
        host_platform: Platform,
    ) -> Result<GeneratedRecipe> {
        let mut manifest = load_manifest(manifest_root)?;
        info!("Generating recipe for {} {} ({})", manifest.name, manifest.version, host_platform);

        let distro = self.distributions.load(&self.config.distro)?;
        let mut recipe = Recipe::from_model(model);

        if recipe.package.has_placeholder_name() {
            recipe.package.name = ros_package_name(distro.name(), &manifest.name);
        }
        if recipe.package.has_placeholder_version() {
            recipe.package.version = manifest.version.clone();
        }

        manifest.evaluate_conditions(&distro.condition_context())?;

        let mapper = DependencyMapper::new(&self.mapping, host_platform);
        let extractor = RequirementExtractor::new(mapper).with_host_policy(self.host_policy);
        let mut computed = extractor.extract(&manifest, &distro);
        computed.extend_unique(Category::Build, baseline::build_requirements(host_platform));
        computed.extend_unique(Category::Host, baseline::host_requirements());

        recipe.requirements = merge_requirements(&recipe.requirements, &computed);

        let build_type = manifest.resolved_build_type()?;
        let source_dir = absolute(manifest_root)?;
        let script = BuildScriptContext::load_from_template(
            build_type,
            host_platform.into(),
            &source_dir,
            &self.templates,
        )?;
        recipe.build.script.content = script.render();
        recipe.build.script.env = self.config.env.clone();

        debug!(
            "{}: {} build, {} host, {} run requirements, {} script lines",
            recipe.package.name,
            recipe.requirements.build.len(),
            recipe.requirements.host.len(),
            recipe.requirements.run.len(),
            recipe.build.script.content.len()
        );

        write_debug_snapshot(&recipe, self.config.get_debug_dir());

        Ok(GeneratedRecipe {
            recipe,
            build_input_globs: build_input_globs(&self.config, self.editable),
        })
    }
}

/// Distribution source for the configured index, cached if `cache-dir` is set
pub fn distribution_provider(config: &RosBackendConfig) -> Box<dyn DistributionProvider> {
    let index_url = config.resolved_index_url();
    match &config.cache_dir {
        Some(cache_dir) => Box::new(DistributionIndex::new(
            index_url,
            CachedSource::new(UrlSource::new(), cache_dir.clone()),
        )),
        None => Box::new(DistributionIndex::new(index_url, UrlSource::new())),
    }
}

/// The configured mapping table, or the built-in one
pub fn mapping_table(config: &RosBackendConfig) -> Result<Cow<'static, MappingTable>> {
    match &config.mapping_file {
        Some(path) => Ok(Cow::Owned(MappingTable::from_file(path)?)),
        None => Ok(Cow::Borrowed(MappingTable::builtin()?)),
    }
}

/// Best-effort copy of the recipe for inspection; never fails generation
fn write_debug_snapshot(recipe: &Recipe, debug_dir: Result<Option<PathBuf>>) {
    let write = || -> Result<Option<PathBuf>> {
        let Some(debug_dir) = debug_dir? else {
            return Ok(None);
        };
        let path = debug_dir.join(recipe.snapshot_file_name());
        std::fs::create_dir_all(&debug_dir)?;
        std::fs::write(&path, recipe.to_yaml()?)?;
        Ok(Some(path))
    };

    match write() {
        Ok(Some(path)) => debug!("Wrote recipe snapshot to {}", path.display()),
        Ok(None) => {}
        Err(e) => warn!("Failed to write recipe snapshot for {}: {}", recipe.package.name, e),
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}
