//! Build script assembly from per-build-type templates

use std::path::{Path, PathBuf};
use std::str::FromStr;

use ros_conda_core::{BuildPlatform, BuildType, Error, Result};
use tracing::debug;

/// Placeholder replaced by the package source directory
pub const SRC_DIR_PLACEHOLDER: &str = "@SRC_DIR@";

const AMENT_CMAKE_TEMPLATE: &str = include_str!("../templates/build_ament_cmake.sh.in");
const AMENT_PYTHON_TEMPLATE: &str = include_str!("../templates/build_ament_python.sh.in");
const CATKIN_TEMPLATE: &str = include_str!("../templates/build_catkin.sh.in");

/// Where build script templates are read from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Templates {
    /// Templates compiled into the binary
    #[default]
    Builtin,
    /// `build_<stem>.sh.in` files in a directory
    Directory(PathBuf),
}

impl Templates {
    pub fn from_dir(dir: impl Into<PathBuf>) -> Self {
        Self::Directory(dir.into())
    }

    /// File name of the template for `build_type`
    pub fn file_name(build_type: BuildType) -> String {
        format!("build_{}.sh.in", build_type.template_stem())
    }

    /// Template text for `build_type`
    pub fn load(&self, build_type: BuildType) -> Result<String> {
        match self {
            Self::Builtin => Ok(match build_type {
                BuildType::AmentCmake => AMENT_CMAKE_TEMPLATE,
                BuildType::AmentPython => AMENT_PYTHON_TEMPLATE,
                BuildType::Cmake | BuildType::Catkin => CATKIN_TEMPLATE,
            }
            .to_string()),
            Self::Directory(dir) => {
                let path = dir.join(Self::file_name(build_type));
                if !path.is_file() {
                    return Err(Error::not_found(
                        "build script template",
                        format!("no template at {}", path.display()),
                    ));
                }
                debug!("Reading build script template {}", path.display());
                Ok(std::fs::read_to_string(&path)?)
            }
        }
    }
}

/// Context for build script generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildScriptContext {
    /// Template text with the source directory substituted
    pub script_content: String,
    /// Recorded for the caller; only Unix scripts are produced
    pub build_platform: BuildPlatform,
    pub source_dir: PathBuf,
    pub build_type: BuildType,
}

impl BuildScriptContext {
    /// Load the template for `build_type` and substitute `source_dir`
    pub fn load_from_template(
        build_type: BuildType,
        build_platform: BuildPlatform,
        source_dir: &Path,
        templates: &Templates,
    ) -> Result<Self> {
        let template = templates.load(build_type)?;
        let script_content =
            template.replace(SRC_DIR_PLACEHOLDER, &source_dir.to_string_lossy());

        Ok(Self {
            script_content,
            build_platform,
            source_dir: source_dir.to_path_buf(),
            build_type,
        })
    }

    /// Render the build script content into a list of lines
    pub fn render(&self) -> Vec<String> {
        self.script_content.lines().map(str::to_string).collect()
    }
}

/// Assemble the script for a build type given by name
pub fn assemble(
    build_kind: &str,
    build_platform: BuildPlatform,
    source_dir: &Path,
    templates: &Templates,
) -> Result<Vec<String>> {
    let build_type = BuildType::from_str(build_kind)?;
    let context =
        BuildScriptContext::load_from_template(build_type, build_platform, source_dir, templates)?;
    Ok(context.render())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_placeholder_substituted_everywhere() {
        let source_dir = Path::new("/work/src/my_pkg");
        for kind in ["ament_cmake", "ament_python", "cmake", "catkin"] {
            let lines = assemble(kind, BuildPlatform::Unix, source_dir, &Templates::Builtin).unwrap();
            assert!(lines.iter().all(|line| !line.contains(SRC_DIR_PLACEHOLDER)), "{kind}");
            assert!(lines.iter().any(|line| line.contains("/work/src/my_pkg")), "{kind}");
        }
    }

    #[test]
    fn test_line_count_preserved() {
        let build_type = BuildType::AmentCmake;
        let template = Templates::Builtin.load(build_type).unwrap();
        let context = BuildScriptContext::load_from_template(
            build_type,
            BuildPlatform::Windows,
            Path::new("/src"),
            &Templates::Builtin,
        )
        .unwrap();

        assert_eq!(context.render().len(), template.lines().count());
        assert_eq!(context.build_platform, BuildPlatform::Windows);
    }

    #[test]
    fn test_cmake_and_catkin_share_template() {
        let cmake = assemble("cmake", BuildPlatform::Unix, Path::new("/s"), &Templates::Builtin);
        let catkin = assemble("catkin", BuildPlatform::Unix, Path::new("/s"), &Templates::Builtin);
        assert_eq!(cmake.unwrap(), catkin.unwrap());
    }

    #[test]
    fn test_unsupported_build_type() {
        let err = assemble("meson", BuildPlatform::Unix, Path::new("/s"), &Templates::Builtin)
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedBuildType { .. }));
    }

    #[test]
    fn test_templates_from_directory() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join("build_ament_cmake.sh.in"),
            "cd @SRC_DIR@\n\ncmake @SRC_DIR@ && ninja\n",
        )
        .unwrap();
        let templates = Templates::from_dir(temp_dir.path());

        let lines =
            assemble("ament_cmake", BuildPlatform::Unix, Path::new("/pkg"), &templates).unwrap();
        assert_eq!(lines, vec!["cd /pkg", "", "cmake /pkg && ninja"]);

        let err = assemble("ament_python", BuildPlatform::Unix, Path::new("/pkg"), &templates)
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
