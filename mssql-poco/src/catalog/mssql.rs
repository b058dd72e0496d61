//! SQL Server implementation of [`SchemaReader`] on top of Tiberius

use async_trait::async_trait;
use tiberius::{Client, Config, Query, Row};
use tokio::net::TcpStream;
use tokio_util::compat::{Compat, TokioAsyncWriteCompatExt};
use tracing::{debug, info};

use super::identifier::quote_table_name;
use super::metadata::{ColumnDescriptor, TableDescriptor};
use super::SchemaReader;
use crate::error::{CodegenError, Result};

/// Base tables only; the catalog's own order is kept.
const LIST_TABLES_SQL: &str =
    "SELECT TABLE_SCHEMA, TABLE_NAME FROM INFORMATION_SCHEMA.TABLES WHERE TABLE_TYPE = 'BASE TABLE'";

/// One row per column, in declaration order. The key flag is an EXISTS over
/// the index metadata so a column that belongs to several indexes is not
/// returned more than once.
const LIST_COLUMNS_SQL: &str = r#"
    SELECT
        c.name,
        t.name,
        CAST(c.max_length AS INT),
        CAST(c.precision AS INT),
        CAST(c.scale AS INT),
        CAST(ISNULL(c.is_nullable, 0) AS BIT),
        CAST(CASE WHEN EXISTS (
            SELECT 1
            FROM sys.index_columns ic
            INNER JOIN sys.indexes i ON ic.object_id = i.object_id AND ic.index_id = i.index_id
            WHERE ic.object_id = c.object_id
              AND ic.column_id = c.column_id
              AND i.is_primary_key = 1
        ) THEN 1 ELSE 0 END AS BIT)
    FROM sys.columns c
    INNER JOIN sys.types t ON c.user_type_id = t.user_type_id
    WHERE c.object_id = OBJECT_ID(@P1)
    ORDER BY c.column_id
"#;

/// A single open SQL Server connection.
///
/// Tiberius clients run one statement at a time, so the catalog is driven
/// sequentially through `&mut self`.
pub struct MssqlCatalog {
    client: Client<Compat<TcpStream>>,
}

impl MssqlCatalog {
    /// Open a connection from an ADO.NET style connection string, e.g.
    /// `server=tcp:localhost,1433;user=sa;password=...;TrustServerCertificate=true`
    pub async fn connect(connection_string: &str) -> Result<Self> {
        if connection_string.trim().is_empty() {
            return Err(CodegenError::InvalidInput(
                "Please provide a SQL Server connection string".into(),
            ));
        }

        let config = Config::from_ado_string(connection_string).map_err(|e| {
            CodegenError::InvalidInput(format!("Invalid connection string: {}", e))
        })?;

        let addr = config.get_addr();
        let tcp = TcpStream::connect(addr.as_str()).await.map_err(|e| {
            CodegenError::execution(
                format!("connecting to {}", addr),
                tiberius::error::Error::Io {
                    kind: e.kind(),
                    message: e.to_string(),
                },
            )
        })?;
        tcp.set_nodelay(true).ok();

        let client = Client::connect(config, tcp.compat_write())
            .await
            .map_err(|e| CodegenError::execution(format!("logging in to {}", addr), e))?;

        info!("Connected to SQL Server at {}", addr);
        Ok(Self { client })
    }

    /// Close the connection
    pub async fn close(self) -> Result<()> {
        self.client
            .close()
            .await
            .map_err(|e| CodegenError::execution("closing the connection", e))
    }
}

#[async_trait]
impl SchemaReader for MssqlCatalog {
    async fn list_tables(&mut self) -> Result<Vec<TableDescriptor>> {
        let rows = self
            .client
            .simple_query(LIST_TABLES_SQL)
            .await
            .map_err(|e| CodegenError::execution("listing tables", e))?
            .into_first_result()
            .await
            .map_err(|e| CodegenError::execution("reading table list", e))?;

        let tables = rows
            .iter()
            .map(table_from_row)
            .collect::<Result<Vec<_>>>()?;

        debug!("Catalog returned {} base tables", tables.len());
        Ok(tables)
    }

    async fn list_columns(&mut self, qualified_table_name: &str) -> Result<Vec<ColumnDescriptor>> {
        let mut query = Query::new(LIST_COLUMNS_SQL);
        query.bind(qualified_table_name);

        let rows = query
            .query(&mut self.client)
            .await
            .map_err(|e| {
                CodegenError::execution(format!("listing columns of {}", qualified_table_name), e)
            })?
            .into_first_result()
            .await
            .map_err(|e| {
                CodegenError::execution(format!("reading columns of {}", qualified_table_name), e)
            })?;

        let columns = rows
            .iter()
            .map(column_from_row)
            .collect::<Result<Vec<_>>>()?;

        debug!(
            "Loaded {} columns for {}",
            columns.len(),
            qualified_table_name
        );
        Ok(columns)
    }

    async fn truncate(&mut self, table_name: &str) -> Result<()> {
        let sql = format!("TRUNCATE TABLE {}", quote_table_name(table_name)?);
        debug!("Executing: {}", sql);

        self.client
            .execute(sql, &[])
            .await
            .map_err(|e| CodegenError::execution(format!("truncating {}", table_name), e))?;

        info!("Truncated {}", table_name);
        Ok(())
    }
}

fn decode_error(e: tiberius::error::Error) -> CodegenError {
    CodegenError::execution("decoding catalog row", e)
}

fn table_from_row(row: &Row) -> Result<TableDescriptor> {
    let schema: Option<&str> = row.try_get(0).map_err(decode_error)?;
    let name: Option<&str> = row.try_get(1).map_err(decode_error)?;
    Ok(TableDescriptor::new(
        schema.unwrap_or_default(),
        name.unwrap_or_default(),
    ))
}

fn column_from_row(row: &Row) -> Result<ColumnDescriptor> {
    let name: Option<&str> = row.try_get(0).map_err(decode_error)?;
    let type_name: Option<&str> = row.try_get(1).map_err(decode_error)?;
    let max_length: Option<i32> = row.try_get(2).map_err(decode_error)?;
    let precision: Option<i32> = row.try_get(3).map_err(decode_error)?;
    let scale: Option<i32> = row.try_get(4).map_err(decode_error)?;
    let is_nullable: Option<bool> = row.try_get(5).map_err(decode_error)?;
    let is_primary_key: Option<bool> = row.try_get(6).map_err(decode_error)?;

    let mut column = ColumnDescriptor::new(
        name.unwrap_or_default(),
        type_name.unwrap_or_default(),
        is_nullable.unwrap_or(false),
    )
    .with_max_length(max_length.unwrap_or(0))
    .with_precision(precision.unwrap_or(0), scale.unwrap_or(0));
    column.is_primary_key = is_primary_key.unwrap_or(false);

    Ok(column)
}
