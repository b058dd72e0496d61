//! mssql-poco: Generate C# classes from the tables of a SQL Server database
//!
//! The catalog of a live database is read through [`catalog::SchemaReader`]
//! (implemented for SQL Server by [`catalog::MssqlCatalog`]). For every base
//! table one C# class is produced whose properties mirror the table columns:
//!
//! ```csharp
//! using System;
//!
//! namespace SampleNamespace
//! {
//!     public class Customer
//!     {
//!         public int Id { get; set; }
//!         public string Name { get; set; }
//!     }
//! }
//! ```
//!
//! # Library Usage
//!
//! ```rust,ignore
//! use tokio_util::sync::CancellationToken;
//!
//! let report = mssql_poco::GeneratorBuilder::new(
//!         "server=tcp:localhost,1433;user=sa;password=secret;TrustServerCertificate=true",
//!     )
//!     .namespace("Shop.Models")
//!     .output_dir("src/Models")
//!     .generate(&CancellationToken::new())
//!     .await?;
//! ```
//!
//! The pure pieces can be used without a database:
//!
//! ```rust
//! use mssql_poco::catalog::ColumnDescriptor;
//! use mssql_poco::codegen::{emit_class, format_column, TypeMapper};
//!
//! let columns = vec![
//!     ColumnDescriptor::new("Id", "int", false),
//!     ColumnDescriptor::new("Name", "nvarchar", true).with_max_length(100),
//! ];
//! assert_eq!(format_column(&columns[1]), "nvarchar(50) NULL");
//! assert_eq!(TypeMapper::map_column(&columns[0]).unwrap().to_type_string(), "int");
//! let source = emit_class("Ns", "Customer", &columns).unwrap();
//! assert!(source.contains("public string Name { get; set; }"));
//! ```
//!
//! # CLI Usage
//!
//! ```bash
//! mssql-poco --connection-string "server=tcp:localhost,1433;user=sa;password=..." \
//!     --namespace Shop.Models --output ./Models generate
//! ```

pub mod catalog;
pub mod codegen;
pub mod config;
pub mod error;

use std::collections::HashSet;
use std::path::Path;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use catalog::{MssqlCatalog, SchemaReader, TableDescriptor};
pub use codegen::GenerationReport;
pub use config::GeneratorConfig;
pub use error::{CodegenError, Result};

/// Main entry point for class generation.
///
/// Opens one connection, runs the generation loop on it, and closes it on
/// every exit path.
pub async fn generate(config: &GeneratorConfig, cancel: &CancellationToken) -> Result<GenerationReport> {
    config.validate()?;

    let mut catalog = MssqlCatalog::connect(&config.connection_string).await?;
    let result = codegen::generate_classes(&mut catalog, config, cancel).await;
    close_quietly(catalog).await;

    if let Ok(report) = &result {
        info!("Code generation complete: {} files", report.files.len());
    }
    result
}

/// Load every selected table with its columns
pub async fn inspect(config: &GeneratorConfig) -> Result<Vec<TableDescriptor>> {
    config.validate()?;

    let mut catalog = MssqlCatalog::connect(&config.connection_string).await?;
    let result = load_tables(&mut catalog, config).await;
    close_quietly(catalog).await;
    result
}

/// Truncate the named tables in order, stopping at the first failure
pub async fn truncate_tables(config: &GeneratorConfig, table_names: &[String]) -> Result<()> {
    config.validate()?;

    let mut catalog = MssqlCatalog::connect(&config.connection_string).await?;
    let result = catalog.truncate_tables(table_names).await;
    close_quietly(catalog).await;
    result
}

async fn load_tables<R>(reader: &mut R, config: &GeneratorConfig) -> Result<Vec<TableDescriptor>>
where
    R: SchemaReader + ?Sized,
{
    let tables = reader.list_tables().await?;
    let tables = filter_tables(tables, &config.include_tables, &config.exclude_tables);

    let mut loaded = Vec::with_capacity(tables.len());
    for table in tables {
        let columns = reader.list_columns(&table.object_name()?).await?;
        loaded.push(table.with_columns(columns));
    }
    Ok(loaded)
}

async fn close_quietly(catalog: MssqlCatalog) {
    if let Err(e) = catalog.close().await {
        warn!("Failed to close SQL Server connection: {}", e);
    }
}

/// Filter tables based on include/exclude patterns.
///
/// Patterns match either the simple table name or `schema.table`.
pub fn filter_tables(
    tables: Vec<TableDescriptor>,
    include: &str,
    exclude: &str,
) -> Vec<TableDescriptor> {
    let include_all = include.trim() == "*" || include.trim().is_empty();
    let include_set: HashSet<String> = if include_all {
        HashSet::new()
    } else {
        include.split(',').map(|s| s.trim().to_string()).collect()
    };
    let exclude_set: HashSet<String> = exclude
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    let matches = |set: &HashSet<String>, t: &TableDescriptor| {
        set.contains(&t.table_name) || set.contains(&t.qualified_name())
    };

    tables
        .into_iter()
        .filter(|t| {
            let included = include_all || matches(&include_set, t);
            let excluded = matches(&exclude_set, t);
            included && !excluded
        })
        .collect()
}

/// Builder for configuring a generation run from code
pub struct GeneratorBuilder {
    config: GeneratorConfig,
}

impl GeneratorBuilder {
    /// Create a new builder with the given connection string
    pub fn new(connection_string: impl Into<String>) -> Self {
        Self {
            config: GeneratorConfig::default_with_connection(connection_string),
        }
    }

    /// Set the namespace of generated classes
    pub fn namespace(mut self, namespace: &str) -> Self {
        self.config.namespace = namespace.to_string();
        self
    }

    /// Set the output directory
    pub fn output_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.config.output_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Set the extension of generated files
    pub fn file_extension(mut self, extension: &str) -> Self {
        self.config.file_extension = extension.trim_start_matches('.').to_string();
        self
    }

    /// Set tables to include
    pub fn include_tables(mut self, tables: &[&str]) -> Self {
        self.config.include_tables = tables.join(",");
        self
    }

    /// Set tables to exclude
    pub fn exclude_tables(mut self, tables: &[&str]) -> Self {
        self.config.exclude_tables = tables.join(",");
        self
    }

    /// Skip tables with unmappable columns instead of failing
    pub fn skip_unsupported(mut self) -> Self {
        self.config.skip_unsupported = true;
        self
    }

    /// Enable dry run mode (preview without writing files)
    pub fn dry_run(mut self) -> Self {
        self.config.dry_run = true;
        self
    }

    /// The configuration built so far
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Run the generation
    pub async fn generate(self, cancel: &CancellationToken) -> Result<GenerationReport> {
        generate(&self.config, cancel).await
    }
}
