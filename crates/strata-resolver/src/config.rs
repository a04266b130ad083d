//! `strata.toml` project configuration

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Default configuration file name, looked up in the project root.
pub const CONFIG_FILE: &str = "strata.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid configuration")]
    Parse(#[from] toml::de::Error),
    #[error("invalid source glob {glob:?}")]
    InvalidGlob {
        glob: String,
        #[source]
        source: globset::Error,
    },
}

/// Whole configuration file. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StrataConfig {
    pub project: ProjectConfig,
    pub resolver: ResolverConfig,
    pub layout: LayoutConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    /// Package identifier used by same-project absolute references.
    pub name: String,
    pub root: PathBuf,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        ProjectConfig {
            name: String::new(),
            root: PathBuf::from("."),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolverConfig {
    /// Falls back to `[project] name` when empty.
    pub project_name: String,
    /// Directory, relative to the project root, that `package:<name>/` maps onto.
    pub source_root: String,
    /// URI schemes of the standard library; references using them are dropped.
    pub stdlib_schemes: Vec<String>,
    /// Resolved candidates must match one of these to count as source files.
    pub source_globs: Vec<String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        ResolverConfig {
            project_name: String::new(),
            source_root: "lib".to_string(),
            stdlib_schemes: vec!["dart".to_string()],
            source_globs: vec!["**/*.dart".to_string()],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    /// Report upward folder and file edges alongside cycle issues.
    pub upward_issues: bool,
}

impl StrataConfig {
    /// Load and parse the configuration at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&contents)?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load `strata.toml` from `root` if present, defaults otherwise.
    pub fn discover(root: &Path) -> Result<Self, ConfigError> {
        let path = root.join(CONFIG_FILE);
        if path.is_file() {
            Self::load(&path)
        } else {
            tracing::debug!("No {} in {}, using defaults", CONFIG_FILE, root.display());
            Ok(Self::default())
        }
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Resolver settings with the project name filled in.
    pub fn resolver_config(&self) -> ResolverConfig {
        let mut resolver = self.resolver.clone();
        if resolver.project_name.is_empty() {
            resolver.project_name = self.project.name.clone();
        }
        resolver
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = StrataConfig::from_toml_str("").unwrap();

        assert_eq!(config, StrataConfig::default());
        assert_eq!(config.resolver.source_root, "lib");
        assert_eq!(config.resolver.stdlib_schemes, vec!["dart"]);
        assert!(!config.layout.upward_issues);
    }

    #[test]
    fn test_project_name_flows_into_resolver() {
        let config = StrataConfig::from_toml_str(
            r#"
            [project]
            name = "shop"

            [resolver]
            source_root = "src"

            [layout]
            upward_issues = true
            "#,
        )
        .unwrap();

        let resolver = config.resolver_config();
        assert_eq!(resolver.project_name, "shop");
        assert_eq!(resolver.source_root, "src");
        assert_eq!(resolver.source_globs, vec!["**/*.dart"]);
        assert!(config.layout.upward_issues);
    }

    #[test]
    fn test_unknown_section_is_rejected() {
        let result = StrataConfig::from_toml_str("[render]\ntheme = \"dark\"\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_unknown_key_inside_section_is_rejected() {
        for contents in [
            "[layout]\nupward_issue = true\n",
            "[project]\nnmae = \"shop\"\n",
            "[resolver]\nsource_glob = [\"**/*.dart\"]\n",
        ] {
            let result = StrataConfig::from_toml_str(contents);
            assert!(matches!(result, Err(ConfigError::Parse(_))), "Accepted: {contents}");
        }
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[project]\nname = \"app\"").unwrap();

        let config = StrataConfig::discover(dir.path()).unwrap();
        assert_eq!(config.project.name, "app");

        let missing = StrataConfig::load(&dir.path().join("missing.toml"));
        assert!(matches!(missing, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_discover_without_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(StrataConfig::discover(dir.path()).unwrap(), StrataConfig::default());
    }
}
