//! Generation loop - one class file per base table

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::catalog::SchemaReader;
use crate::config::GeneratorConfig;
use crate::error::{CodegenError, Result};
use crate::filter_tables;

use super::class_emitter::emit_class;

/// A table left out of the run because one of its columns has no mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedTable {
    pub table: String,
    pub type_name: String,
}

/// Outcome of one generation run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    /// Files written (or, in dry-run mode, that would have been written)
    pub files: Vec<PathBuf>,
    pub skipped: Vec<SkippedTable>,
    /// Set when the run stopped early on a cancellation request
    pub cancelled: bool,
}

/// Generate a class file for every selected table.
///
/// Tables are processed one at a time on the single reader. `cancel` is
/// checked before each table, so a table that has started is always
/// finished. Files already written stay on disk when a later table fails.
pub async fn generate_classes<R>(
    reader: &mut R,
    config: &GeneratorConfig,
    cancel: &CancellationToken,
) -> Result<GenerationReport>
where
    R: SchemaReader + ?Sized,
{
    let namespace = config.effective_namespace();
    let tables = reader.list_tables().await?;
    info!("Found {} tables", tables.len());

    let tables = filter_tables(tables, &config.include_tables, &config.exclude_tables);
    debug!(
        "After filtering: {} tables (include={}, exclude={})",
        tables.len(),
        config.include_tables,
        config.exclude_tables
    );

    if !config.dry_run {
        fs::create_dir_all(&config.output_dir)?;
    }

    let mut report = GenerationReport::default();
    // file path -> table that produced it
    let mut written: HashMap<PathBuf, String> = HashMap::new();
    for table in tables {
        if cancel.is_cancelled() {
            info!("Cancellation requested, stopping before {}", table);
            report.cancelled = true;
            break;
        }

        let columns = reader.list_columns(&table.object_name()?).await?;
        if columns.is_empty() {
            warn!("Catalog returned no columns for {}", table);
        }
        let source = match emit_class(namespace, &table.table_name, &columns) {
            Ok(source) => source,
            Err(CodegenError::UnsupportedType { type_name }) if config.skip_unsupported => {
                warn!(
                    "Skipping {}: do not know how to convert the {} type to a C# type",
                    table, type_name
                );
                report.skipped.push(SkippedTable {
                    table: table.qualified_name(),
                    type_name,
                });
                continue;
            }
            Err(e) => return Err(e),
        };

        let path = config.output_file(&table.table_name);
        let previous = written.insert(path.clone(), table.qualified_name());
        if let Some(previous) = &previous {
            warn!(
                "{} and {} both map to {}; the class for {} replaces the earlier one",
                previous,
                table,
                path.display(),
                table
            );
        }

        if config.dry_run {
            info!("Would write {} ({} columns)", path.display(), columns.len());
        } else {
            debug!("Generating class {} -> {}", table.table_name, path.display());
            write_class_file(&path, &source)?;
        }
        if previous.is_none() {
            report.files.push(path);
        }
    }

    info!(
        "Generated {} classes ({} skipped{})",
        report.files.len(),
        report.skipped.len(),
        if report.cancelled { ", cancelled" } else { "" }
    );
    Ok(report)
}

/// Write one generated class, replacing any existing file
pub fn write_class_file(path: &Path, source: &str) -> Result<()> {
    fs::write(path, source)?;
    Ok(())
}
