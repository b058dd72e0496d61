//! Error types for mssql-poco

use thiserror::Error;

/// Result type alias for mssql-poco operations
pub type Result<T> = std::result::Result<T, CodegenError>;

/// Errors that can occur while reading the catalog or generating classes
#[derive(Error, Debug)]
pub enum CodegenError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Connection or statement failure reported by the SQL Server driver
    #[error("Execution error while {context}: {source}")]
    Execution {
        context: String,
        #[source]
        source: tiberius::error::Error,
    },

    #[error("Do not know how to convert the {type_name} type to a C# type")]
    UnsupportedType { type_name: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl CodegenError {
    /// Wrap a driver error with a short description of what was being done
    pub fn execution(context: impl Into<String>, source: tiberius::error::Error) -> Self {
        CodegenError::Execution {
            context: context.into(),
            source,
        }
    }

    pub fn unsupported_type(type_name: impl Into<String>) -> Self {
        CodegenError::UnsupportedType {
            type_name: type_name.into(),
        }
    }

    /// Format error with full details including the cause chain
    pub fn format_detailed(&self) -> String {
        let mut output = format!("Error: {}\n", self);

        let mut source = std::error::Error::source(self);
        let mut depth = 1;
        while let Some(err) = source {
            output.push_str(&format!("\nCaused by:\n  {}: {}", depth, err));
            source = err.source();
            depth += 1;
        }

        output
    }
}

impl From<config::ConfigError> for CodegenError {
    fn from(err: config::ConfigError) -> Self {
        CodegenError::ConfigError(err.to_string())
    }
}
