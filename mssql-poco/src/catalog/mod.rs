//! SQL Server catalog access
//!
//! [`SchemaReader`] is the only I/O seam of the crate: it lists base tables,
//! loads the columns of one table, and truncates tables. Every call re-queries
//! live metadata; nothing is cached between calls.

mod identifier;
mod metadata;
mod mssql;

pub use identifier::*;
pub use metadata::*;
pub use mssql::*;

use async_trait::async_trait;

use crate::error::Result;

/// Reads table and column metadata from a live database
#[async_trait]
pub trait SchemaReader: Send {
    /// All base tables (views excluded), in the catalog's return order.
    /// Columns are left empty.
    async fn list_tables(&mut self) -> Result<Vec<TableDescriptor>>;

    /// Columns of exactly one table, in declaration order.
    ///
    /// `qualified_table_name` is a `schema.table` identifier in any form
    /// `OBJECT_ID` accepts; callers pass [`TableDescriptor::object_name`].
    /// A table without a primary key yields `is_primary_key = false`
    /// everywhere.
    async fn list_columns(&mut self, qualified_table_name: &str) -> Result<Vec<ColumnDescriptor>>;

    /// Delete every row of one table. No confirmation, no transaction.
    async fn truncate(&mut self, table_name: &str) -> Result<()>;

    /// Truncate each table in order, stopping at the first failure
    async fn truncate_tables(&mut self, table_names: &[String]) -> Result<()> {
        for table_name in table_names {
            self.truncate(table_name).await?;
        }
        Ok(())
    }
}
