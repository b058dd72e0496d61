//! Metadata structures read from the SQL Server catalog

use std::fmt;

use serde::{Deserialize, Serialize};

use super::identifier::quote_mssql;
use crate::codegen::{format_column, TypeMapper};
use crate::error::Result;

/// A base table as listed by the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDescriptor {
    /// Owning schema (e.g. `dbo`)
    pub schema_name: String,

    /// Simple table name, used as the generated class name
    pub table_name: String,

    /// Columns in catalog declaration order (empty until loaded)
    #[serde(default)]
    pub columns: Vec<ColumnDescriptor>,
}

/// A column of a table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// Column name
    pub name: String,

    /// Catalog type name, lower-cased (e.g. "varchar", "uniqueidentifier")
    pub sql_type_name: String,

    /// Storage width in bytes as reported by `sys.columns.max_length`.
    ///
    /// A column declared `varchar(10)` reports 10, `nvarchar(10)` reports 20
    /// since every UCS-2 code unit takes two bytes. `-1` means the column was
    /// declared with `(max)`.
    pub max_length_bytes: i32,

    pub precision: i32,
    pub scale: i32,

    /// Whether the column is nullable in the table
    pub is_nullable: bool,

    /// Whether the column participates in the primary key index
    pub is_primary_key: bool,
}

impl TableDescriptor {
    pub fn new(schema_name: impl Into<String>, table_name: impl Into<String>) -> Self {
        Self {
            schema_name: schema_name.into(),
            table_name: table_name.into(),
            columns: Vec::new(),
        }
    }

    /// Readable `schema.table` name, used in logs and table filters
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.schema_name, self.table_name)
    }

    /// Bracket-quoted `[schema].[table]` name for column lookups.
    ///
    /// Quoting keeps a dot or `]` inside either part from being read as a
    /// name separator.
    pub fn object_name(&self) -> Result<String> {
        Ok(format!(
            "{}.{}",
            quote_mssql(&self.schema_name)?,
            quote_mssql(&self.table_name)?
        ))
    }

    /// Attach loaded columns
    pub fn with_columns(mut self, columns: Vec<ColumnDescriptor>) -> Self {
        self.columns = columns;
        self
    }

    /// Get a column by name
    pub fn get_column(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Names of the primary key columns, in declaration order
    pub fn primary_key_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.is_primary_key)
            .map(|c| c.name.as_str())
            .collect()
    }
}

impl fmt::Display for TableDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.schema_name, self.table_name)
    }
}

impl ColumnDescriptor {
    /// Create a column; the type name is normalized to lower case
    pub fn new(name: impl Into<String>, sql_type_name: &str, is_nullable: bool) -> Self {
        Self {
            name: name.into(),
            sql_type_name: sql_type_name.trim().to_lowercase(),
            max_length_bytes: 0,
            precision: 0,
            scale: 0,
            is_nullable,
            is_primary_key: false,
        }
    }

    pub fn with_max_length(mut self, max_length_bytes: i32) -> Self {
        self.max_length_bytes = max_length_bytes;
        self
    }

    pub fn with_precision(mut self, precision: i32, scale: i32) -> Self {
        self.precision = precision;
        self.scale = scale;
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.is_primary_key = true;
        self
    }
}

impl fmt::Display for ColumnDescriptor {
    /// One-line description: SQL signature, mapped C# type and key flag
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (data_type, csharp) = if self.sql_type_name.trim().is_empty() {
            ("Unknown".to_string(), "Unknown".to_string())
        } else {
            let csharp = TypeMapper::map_column(self)
                .map(|t| t.to_type_string())
                .unwrap_or_else(|_| "Unknown".to_string());
            (format_column(self), csharp)
        };
        write!(
            f,
            "ColumnName: {}  DataType: {} C#: {}  IsPrimaryKey: {}",
            self.name, data_type, csharp, self.is_primary_key
        )
    }
}
