//! ROS distribution index access
//!
//! Distributions are read from a rosdistro index (format version 4). The
//! index lists every distribution with its type and the distribution files
//! that enumerate the released repositories.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use reqwest::blocking::Client;
use ros_conda_core::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::condition::ConditionContext;

/// Index used when neither the configuration nor the environment names one
pub const DEFAULT_INDEX_URL: &str =
    "https://raw.githubusercontent.com/ros/rosdistro/master/index-v4.yaml";

/// Environment variable overriding the index location
pub const INDEX_URL_ENV: &str = "ROSDISTRO_INDEX_URL";

/// Timeout for index downloads
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Resolve the index location from the environment, falling back to the
/// public rosdistro index
pub fn default_index_url() -> String {
    std::env::var(INDEX_URL_ENV).unwrap_or_else(|_| DEFAULT_INDEX_URL.to_string())
}

/// Generation of a ROS distribution
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DistributionType {
    Ros1,
    Ros2,
}

impl DistributionType {
    /// Value of the `ROS_VERSION` condition variable
    pub fn ros_version(&self) -> &'static str {
        match self {
            Self::Ros1 => "1",
            Self::Ros2 => "2",
        }
    }
}

impl fmt::Display for DistributionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ros1 => write!(f, "ros1"),
            Self::Ros2 => write!(f, "ros2"),
        }
    }
}

/// A released ROS distribution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Distribution {
    name: String,
    distribution_type: DistributionType,
    python_version: u32,
    release_packages: BTreeSet<String>,
}

impl Distribution {
    pub fn new<I, S>(
        name: impl Into<String>,
        distribution_type: DistributionType,
        python_version: u32,
        release_packages: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            distribution_type,
            python_version,
            release_packages: release_packages.into_iter().map(Into::into).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn classify(&self) -> DistributionType {
        self.distribution_type
    }

    pub fn is_ros1(&self) -> bool {
        self.distribution_type == DistributionType::Ros1
    }

    pub fn ros_version(&self) -> &'static str {
        self.distribution_type.ros_version()
    }

    pub fn python_version(&self) -> u32 {
        self.python_version
    }

    /// Check if `package` is released in this distribution
    pub fn has_package(&self, package: &str) -> bool {
        self.release_packages.contains(package)
    }

    /// Variables used to evaluate manifest conditions for this distribution
    pub fn condition_context(&self) -> ConditionContext {
        ConditionContext::new()
            .with("ROS_VERSION", self.ros_version())
            .with("ROS_DISTRO", self.name.clone())
            .with("ROS_PYTHON_VERSION", self.python_version.to_string())
    }
}

/// Something that can hand out distributions by name
pub trait DistributionProvider {
    /// Load the named distribution
    fn load(&self, name: &str) -> Result<Distribution>;
}

impl DistributionProvider for Distribution {
    fn load(&self, name: &str) -> Result<Distribution> {
        if name == self.name {
            Ok(self.clone())
        } else {
            Err(Error::not_found("distribution", format!("'{name}' is not '{}'", self.name)))
        }
    }
}

/// Reads index documents from some location
pub trait IndexSource {
    /// Read the document at `location` as text
    fn read(&self, location: &str) -> Result<String>;
}

/// Reads `http(s)://` locations over the network and `file://` or plain
/// paths from disk
#[derive(Debug, Clone)]
pub struct UrlSource {
    timeout: Duration,
}

impl Default for UrlSource {
    fn default() -> Self {
        Self { timeout: HTTP_TIMEOUT }
    }
}

impl UrlSource {
    pub fn new() -> Self {
        Self::default()
    }

    fn client(&self) -> Result<Client> {
        Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| Error::context("Failed to create HTTP client", e))
    }
}

impl IndexSource for UrlSource {
    fn read(&self, location: &str) -> Result<String> {
        if location.starts_with("http://") || location.starts_with("https://") {
            debug!("Fetching {}", location);
            let response = self
                .client()?
                .get(location)
                .send()
                .and_then(|response| response.error_for_status())
                .map_err(|e| Error::not_found(location, e.to_string()))?;
            return response.text().map_err(|e| Error::not_found(location, e.to_string()));
        }

        let path = location.strip_prefix("file://").unwrap_or(location);
        std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::not_found(location, e.to_string()),
            _ => Error::Io(e),
        })
    }
}

/// Keeps a copy of every document read through `inner` in a cache directory
#[derive(Debug)]
pub struct CachedSource<S> {
    inner: S,
    cache_dir: PathBuf,
}

impl<S: IndexSource> CachedSource<S> {
    pub fn new(inner: S, cache_dir: impl Into<PathBuf>) -> Self {
        Self { inner, cache_dir: cache_dir.into() }
    }

    fn cache_path(&self, location: &str) -> PathBuf {
        let file_name: String = location
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '-' { c } else { '_' })
            .collect();
        self.cache_dir.join(file_name)
    }
}

impl<S: IndexSource> IndexSource for CachedSource<S> {
    fn read(&self, location: &str) -> Result<String> {
        let cache_path = self.cache_path(location);
        if let Ok(content) = std::fs::read_to_string(&cache_path) {
            debug!("Using cached {} from {}", location, cache_path.display());
            return Ok(content);
        }

        let content = self.inner.read(location)?;
        if let Err(e) = write_cache(&cache_path, &content) {
            warn!("Failed to cache {} at {}: {}", location, cache_path.display(), e);
        }
        Ok(content)
    }
}

fn write_cache(path: &Path, content: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)
}

#[derive(Debug, Deserialize)]
struct IndexFile {
    #[serde(default)]
    distributions: BTreeMap<String, IndexEntry>,
}

#[derive(Debug, Deserialize)]
struct IndexEntry {
    #[serde(default)]
    distribution: Vec<String>,
    distribution_type: Option<DistributionType>,
    python_version: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct DistributionFile {
    #[serde(default)]
    repositories: BTreeMap<String, Repository>,
}

#[derive(Debug, Deserialize)]
struct Repository {
    release: Option<Release>,
}

#[derive(Debug, Deserialize)]
struct Release {
    packages: Option<Vec<String>>,
}

/// A rosdistro index read through an [`IndexSource`]
pub struct DistributionIndex<S> {
    index_url: String,
    source: S,
    loaded: Mutex<BTreeMap<String, Distribution>>,
}

impl<S: IndexSource> DistributionIndex<S> {
    pub fn new(index_url: impl Into<String>, source: S) -> Self {
        Self { index_url: index_url.into(), source, loaded: Mutex::new(BTreeMap::new()) }
    }

    pub fn index_url(&self) -> &str {
        &self.index_url
    }

    fn read_index(&self) -> Result<IndexFile> {
        let content = self
            .source
            .read(&self.index_url)
            .map_err(|e| Error::not_found("distribution index", e.to_string()))?;
        serde_yaml::from_str(&content)
            .map_err(|e| Error::parse(format!("Invalid index {}: {e}", self.index_url)))
    }

    fn fetch(&self, name: &str) -> Result<Distribution> {
        let index = self.read_index()?;
        let entry = index.distributions.get(name).ok_or_else(|| {
            Error::not_found(
                "distribution",
                format!("'{name}' is not listed in {}", self.index_url),
            )
        })?;

        let distribution_type = entry.distribution_type.ok_or_else(|| {
            Error::parse(format!("Distribution '{name}' has no distribution_type"))
        })?;

        let mut release_packages = BTreeSet::new();
        for file in &entry.distribution {
            let location = resolve_location(&self.index_url, file);
            let content = self.source.read(&location)?;
            let distribution_file: DistributionFile = serde_yaml::from_str(&content)
                .map_err(|e| Error::parse(format!("Invalid distribution file {location}: {e}")))?;

            for (repo_name, repo) in distribution_file.repositories {
                match repo.release {
                    Some(Release { packages: Some(packages) }) => release_packages.extend(packages),
                    Some(Release { packages: None }) => {
                        release_packages.insert(repo_name);
                    }
                    None => {}
                }
            }
        }

        info!(
            "Loaded {} distribution '{}' with {} released packages",
            distribution_type,
            name,
            release_packages.len()
        );

        Ok(Distribution {
            name: name.to_string(),
            distribution_type,
            python_version: entry.python_version.unwrap_or(3),
            release_packages,
        })
    }
}

impl<S: IndexSource> DistributionProvider for DistributionIndex<S> {
    fn load(&self, name: &str) -> Result<Distribution> {
        if let Ok(loaded) = self.loaded.lock() {
            if let Some(distro) = loaded.get(name) {
                return Ok(distro.clone());
            }
        }

        let distro = self.fetch(name)?;
        if let Ok(mut loaded) = self.loaded.lock() {
            loaded.insert(name.to_string(), distro.clone());
        }
        Ok(distro)
    }
}

/// Resolve a distribution file path relative to the index location
fn resolve_location(index_url: &str, file: &str) -> String {
    if file.contains("://") || Path::new(file).is_absolute() {
        return file.to_string();
    }
    match index_url.rfind('/') {
        Some(pos) => format!("{}/{}", &index_url[..pos], file),
        None => file.to_string(),
    }
}
