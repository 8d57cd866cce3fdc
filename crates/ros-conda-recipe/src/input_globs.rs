//! Files whose changes invalidate a build

use ros_conda_config::RosBackendConfig;

const SOURCE_GLOBS: [&str; 16] = [
    "**/*.c",
    "**/*.cpp",
    "**/*.h",
    "**/*.hpp",
    "**/*.rs",
    "**/*.sh",
    "package.xml",
    "setup.py",
    "setup.cfg",
    "pyproject.toml",
    "Makefile",
    "CMakeLists.txt",
    "MANIFEST.in",
    "tests/**/*.py",
    "docs/**/*.rst",
    "docs/**/*.md",
];

/// Python sources are only inputs when the package is not installed in
/// editable mode
const PYTHON_GLOBS: [&str; 2] = ["**/*.py", "**/*.pyx"];

/// Build input globs for a package
pub fn build_input_globs(config: &RosBackendConfig, editable: bool) -> Vec<String> {
    let mut globs: Vec<String> = SOURCE_GLOBS.iter().map(|g| g.to_string()).collect();
    if !editable {
        globs.extend(PYTHON_GLOBS.iter().map(|g| g.to_string()));
    }
    globs.extend(config.extra_input_globs.iter().cloned());
    globs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_editable_skips_python_sources() {
        let config = RosBackendConfig::new("humble");

        let editable = build_input_globs(&config, true);
        assert!(!editable.contains(&"**/*.py".to_string()));
        assert!(editable.contains(&"**/*.hpp".to_string()));

        let regular = build_input_globs(&config, false);
        assert_eq!(regular.len(), editable.len() + 2);
        assert!(regular.contains(&"**/*.pyx".to_string()));
    }

    #[test]
    fn test_extra_globs_appended() {
        let mut config = RosBackendConfig::new("humble");
        config.extra_input_globs = vec!["msg/*.msg".to_string(), "srv/*.srv".to_string()];

        let globs = build_input_globs(&config, false);
        assert_eq!(&globs[globs.len() - 2..], ["msg/*.msg", "srv/*.srv"]);
    }
}
