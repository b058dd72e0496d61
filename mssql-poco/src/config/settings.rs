//! Configuration settings for mssql-poco

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::defaults;
use crate::error::{CodegenError, Result};

/// Main configuration struct for class generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// ADO.NET style SQL Server connection string
    #[serde(default)]
    pub connection_string: String,

    /// Namespace of generated classes (blank means the default)
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Directory receiving one file per table
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Extension of generated files, without the dot
    #[serde(default = "default_file_extension")]
    pub file_extension: String,

    /// Tables to include (comma-separated, or "*" for all)
    #[serde(default = "default_include_tables")]
    pub include_tables: String,

    /// Tables to exclude (comma-separated)
    #[serde(default = "default_exclude_tables")]
    pub exclude_tables: String,

    /// Skip tables with unmappable columns instead of aborting the run
    #[serde(default = "default_skip_unsupported")]
    pub skip_unsupported: bool,

    /// Dry run mode - preview without writing files
    #[serde(default = "default_dry_run")]
    pub dry_run: bool,

    /// Log level (trace, debug, info, warn, error)
    /// Can be overridden by RUST_LOG env var
    #[serde(default)]
    pub log_level: Option<String>,
}

// Default value functions for serde
fn default_namespace() -> String {
    defaults::NAMESPACE.to_string()
}
fn default_output_dir() -> PathBuf {
    PathBuf::from(defaults::OUTPUT_DIR)
}
fn default_file_extension() -> String {
    defaults::FILE_EXTENSION.to_string()
}
fn default_include_tables() -> String {
    defaults::INCLUDE_TABLES.to_string()
}
fn default_exclude_tables() -> String {
    defaults::EXCLUDE_TABLES.to_string()
}
fn default_skip_unsupported() -> bool {
    defaults::SKIP_UNSUPPORTED
}
fn default_dry_run() -> bool {
    defaults::DRY_RUN
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            connection_string: String::new(),
            namespace: default_namespace(),
            output_dir: default_output_dir(),
            file_extension: default_file_extension(),
            include_tables: default_include_tables(),
            exclude_tables: default_exclude_tables(),
            skip_unsupported: default_skip_unsupported(),
            dry_run: default_dry_run(),
            log_level: None,
        }
    }
}

impl GeneratorConfig {
    /// Create a default config with the given connection string
    pub fn default_with_connection(connection_string: impl Into<String>) -> Self {
        Self {
            connection_string: connection_string.into(),
            ..Default::default()
        }
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: GeneratorConfig = toml::from_str(&content).map_err(|e| {
            CodegenError::ConfigError(format!(
                "Failed to parse config file {}: {}",
                path.display(),
                e
            ))
        })?;
        Ok(config)
    }

    /// Load configuration using config-rs (file + environment variables)
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path));
        } else {
            builder = builder.add_source(File::with_name("mssql-poco").required(false));
        }

        // Override with environment variables (MSSQL_POCO_*)
        builder = builder.add_source(Environment::with_prefix(defaults::ENV_PREFIX).try_parsing(true));

        let config: GeneratorConfig = builder.build()?.try_deserialize()?;

        Ok(config)
    }

    /// The namespace to emit: the configured one, or the default when blank
    pub fn effective_namespace(&self) -> &str {
        let trimmed = self.namespace.trim();
        if trimmed.is_empty() {
            defaults::NAMESPACE
        } else {
            trimmed
        }
    }

    /// Path of the file generated for a table.
    ///
    /// Path separators in the table name become `_`, so the file always lands
    /// directly inside `output_dir`.
    pub fn output_file(&self, table_name: &str) -> PathBuf {
        let stem = table_name.replace(['/', '\\'], "_");
        self.output_dir
            .join(format!("{}.{}", stem, self.file_extension))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.connection_string.trim().is_empty() {
            return Err(CodegenError::InvalidInput(
                "Please provide a SQL Server connection string".into(),
            ));
        }

        let namespace = self.effective_namespace();
        if !is_valid_namespace(namespace) {
            return Err(CodegenError::InvalidInput(format!(
                "Namespace is not a valid C# namespace: {:?}",
                namespace
            )));
        }

        if self.file_extension.trim().is_empty() || self.file_extension.contains(['/', '\\']) {
            return Err(CodegenError::InvalidInput(format!(
                "Invalid file extension: {:?}",
                self.file_extension
            )));
        }

        Ok(())
    }
}

/// Dotted sequence of C# identifiers, e.g. `Company.Data.Models`
fn is_valid_namespace(namespace: &str) -> bool {
    namespace.split('.').all(|part| {
        let mut chars = part.chars();
        match chars.next() {
            Some(first) if first.is_alphabetic() || first == '_' => {
                chars.all(|c| c.is_alphanumeric() || c == '_')
            }
            _ => false,
        }
    })
}
