use miette::Diagnostic;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// How source-language types are labelled alongside their platform types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceTypes {
    /// One nullable and one non-null source type per referenced class.
    #[default]
    Precise,
    /// Every source type is the single fake nullable type.
    Placeholder,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExtractorConfig {
    /// Deepest nesting of type resolution before giving up with a placeholder.
    pub max_depth: usize,
    pub source_types: SourceTypes,
    /// Whether synthetic stub classes are swapped for their real counterparts.
    pub replace_synthetic: bool,
    /// Fully qualified name of the platform root class, never treated as synthetic.
    pub root_class: String,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            max_depth: 256,
            source_types: SourceTypes::Precise,
            replace_synthetic: true,
            root_class: "java.lang.Object".into(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    extractor: ExtractorConfig,
}

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    #[diagnostic(code(ir_facts::config::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid configuration in {}: {message}", path.display())]
    #[diagnostic(
        code(ir_facts::config::parse),
        help("settings live under an [extractor] table")
    )]
    Parse { path: PathBuf, message: String },
}

impl ExtractorConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Self::parse(content, Path::new("<inline>"))
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, path)
    }

    fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(content).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            message: error.to_string(),
        })?;
        if file.extractor.max_depth == 0 {
            return Err(ConfigError::Parse {
                path: path.to_path_buf(),
                message: "max_depth must be at least 1".into(),
            });
        }
        Ok(file.extractor)
    }
}
