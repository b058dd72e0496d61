//! Integration tests for mssql-poco with a SQL Server testcontainer
//!
//! These tests run the catalog queries, truncation and the full generation
//! loop against a real SQL Server, so a running Docker daemon is required.
//!
//! Every test starts its own container; `serial_test` keeps them from
//! running side by side.

use serial_test::serial;
use testcontainers::{runners::AsyncRunner, ContainerAsync};
use testcontainers_modules::mssql_server::MssqlServer;
use tiberius::{Client, Config};
use tokio::net::TcpStream;
use tokio_util::compat::{Compat, TokioAsyncWriteCompatExt};
use tokio_util::sync::CancellationToken;

use mssql_poco::catalog::{MssqlCatalog, SchemaReader, TableDescriptor};
use mssql_poco::{CodegenError, GeneratorConfig};

const SA_PASSWORD: &str = "yourStrong(!)Password";

const SCHEMA: &[&str] = &[
    "CREATE TABLE dbo.Customer (
        Id INT NOT NULL PRIMARY KEY,
        Name NVARCHAR(50) NULL,
        Code CHAR(1) NOT NULL,
        Price DECIMAL(18, 4) NULL,
        Stamp ROWVERSION,
        Photo VARBINARY(MAX) NULL
    )",
    // Id takes part in a second index; it must still come back once
    "CREATE INDEX IX_Customer_Id_Code ON dbo.Customer (Id, Code)",
    "CREATE TABLE dbo.NoKey (A INT NULL, B VARCHAR(10) NOT NULL)",
    "CREATE VIEW dbo.CustomerNames AS SELECT Id, Name FROM dbo.Customer",
    "CREATE SCHEMA sales",
    "CREATE TABLE sales.Place (Id INT NOT NULL PRIMARY KEY, Location GEOGRAPHY NULL)",
    "CREATE TABLE dbo.Parent (Id INT NOT NULL PRIMARY KEY)",
    "CREATE TABLE dbo.Child (Id INT NOT NULL, ParentId INT NULL REFERENCES dbo.Parent (Id))",
];

struct TestServer {
    _container: ContainerAsync<MssqlServer>,
    connection_string: String,
}

async fn start_server() -> anyhow::Result<TestServer> {
    let container = MssqlServer::default().with_accept_eula().start().await?;
    let port = container.get_host_port_ipv4(1433).await?;
    let connection_string = format!(
        "server=tcp:127.0.0.1,{};user=sa;password={};TrustServerCertificate=true",
        port, SA_PASSWORD
    );

    let mut client = raw_client(&connection_string).await?;
    for stmt in SCHEMA {
        client.execute(*stmt, &[]).await?;
    }

    Ok(TestServer {
        _container: container,
        connection_string,
    })
}

async fn raw_client(connection_string: &str) -> anyhow::Result<Client<Compat<TcpStream>>> {
    let config = Config::from_ado_string(connection_string)?;
    let tcp = TcpStream::connect(config.get_addr()).await?;
    tcp.set_nodelay(true)?;
    Ok(Client::connect(config, tcp.compat_write()).await?)
}

async fn row_count(client: &mut Client<Compat<TcpStream>>, table: &str) -> anyhow::Result<i32> {
    let row = client
        .simple_query(format!("SELECT COUNT(*) FROM {}", table))
        .await?
        .into_row()
        .await?
        .expect("count row");
    Ok(row.get::<i32, _>(0).unwrap_or_default())
}

#[tokio::test]
#[serial]
async fn test_list_tables_excludes_views() -> anyhow::Result<()> {
    let server = start_server().await?;
    let mut catalog = MssqlCatalog::connect(&server.connection_string).await?;

    let mut names: Vec<String> = catalog
        .list_tables()
        .await?
        .iter()
        .map(|t| t.qualified_name())
        .collect();
    names.sort();

    assert_eq!(
        names,
        vec![
            "dbo.Child",
            "dbo.Customer",
            "dbo.NoKey",
            "dbo.Parent",
            "sales.Place"
        ]
    );

    catalog.close().await?;
    Ok(())
}

#[tokio::test]
#[serial]
async fn test_list_columns_metadata() -> anyhow::Result<()> {
    let server = start_server().await?;
    let mut catalog = MssqlCatalog::connect(&server.connection_string).await?;

    let columns = catalog.list_columns("dbo.Customer").await?;
    let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Id", "Name", "Code", "Price", "Stamp", "Photo"]);

    let by_name = |n: &str| columns.iter().find(|c| c.name == n).unwrap();
    assert!(by_name("Id").is_primary_key);
    assert!(!by_name("Id").is_nullable);
    assert!(columns.iter().filter(|c| c.is_primary_key).count() == 1);

    assert_eq!(by_name("Name").sql_type_name, "nvarchar");
    assert_eq!(by_name("Name").max_length_bytes, 100);
    assert!(by_name("Name").is_nullable);
    assert_eq!(by_name("Code").max_length_bytes, 1);
    assert_eq!((by_name("Price").precision, by_name("Price").scale), (18, 4));
    assert_eq!(by_name("Stamp").sql_type_name, "timestamp");
    assert_eq!(by_name("Photo").max_length_bytes, -1);

    catalog.close().await?;
    Ok(())
}

#[tokio::test]
#[serial]
async fn test_table_without_primary_key() -> anyhow::Result<()> {
    let server = start_server().await?;
    let mut catalog = MssqlCatalog::connect(&server.connection_string).await?;

    let columns = catalog.list_columns("dbo.NoKey").await?;
    assert_eq!(columns.len(), 2);
    assert!(columns.iter().all(|c| !c.is_primary_key));

    catalog.close().await?;
    Ok(())
}

#[tokio::test]
#[serial]
async fn test_list_columns_of_dotted_table_name() -> anyhow::Result<()> {
    let server = start_server().await?;
    let mut client = raw_client(&server.connection_string).await?;
    client
        .execute(
            "CREATE TABLE dbo.[odd.name] (Id INT NOT NULL PRIMARY KEY, Label NVARCHAR(20) NULL)",
            &[],
        )
        .await?;

    let mut catalog = MssqlCatalog::connect(&server.connection_string).await?;
    let table = catalog
        .list_tables()
        .await?
        .into_iter()
        .find(|t| t.table_name == "odd.name")
        .expect("dotted table is listed");
    assert_eq!(table, TableDescriptor::new("dbo", "odd.name"));

    let columns = catalog.list_columns(&table.object_name()?).await?;
    let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Id", "Label"]);
    assert!(columns[0].is_primary_key);

    catalog.close().await?;
    Ok(())
}

#[tokio::test]
#[serial]
async fn test_schema_changes_are_seen_immediately() -> anyhow::Result<()> {
    let server = start_server().await?;
    let mut catalog = MssqlCatalog::connect(&server.connection_string).await?;
    let mut client = raw_client(&server.connection_string).await?;

    assert_eq!(catalog.list_columns("dbo.NoKey").await?.len(), 2);
    client
        .execute("ALTER TABLE dbo.NoKey ADD C UNIQUEIDENTIFIER NULL", &[])
        .await?;
    let columns = catalog.list_columns("dbo.NoKey").await?;
    assert_eq!(columns.len(), 3);
    assert_eq!(columns[2].sql_type_name, "uniqueidentifier");

    catalog.close().await?;
    Ok(())
}

#[tokio::test]
#[serial]
async fn test_truncate() -> anyhow::Result<()> {
    let server = start_server().await?;
    let mut client = raw_client(&server.connection_string).await?;
    client
        .execute("INSERT INTO dbo.NoKey (A, B) VALUES (1, 'x'), (2, 'y')", &[])
        .await?;
    client
        .execute("INSERT INTO dbo.Parent (Id) VALUES (1)", &[])
        .await?;
    assert_eq!(row_count(&mut client, "dbo.NoKey").await?, 2);

    let mut catalog = MssqlCatalog::connect(&server.connection_string).await?;
    catalog.truncate("dbo.NoKey").await?;
    assert_eq!(row_count(&mut client, "dbo.NoKey").await?, 0);

    // Parent is referenced by a foreign key
    let err = catalog.truncate("dbo.Parent").await.unwrap_err();
    assert!(matches!(err, CodegenError::Execution { .. }));

    let err = catalog.truncate("dbo.DoesNotExist").await.unwrap_err();
    assert!(matches!(err, CodegenError::Execution { .. }));

    catalog.close().await?;
    Ok(())
}

#[tokio::test]
#[serial]
async fn test_generate_end_to_end() -> anyhow::Result<()> {
    let server = start_server().await?;
    let dir = tempfile::tempdir()?;

    let mut config = GeneratorConfig::default_with_connection(server.connection_string.clone());
    config.output_dir = dir.path().to_path_buf();
    config.namespace = "Shop.Models".into();
    config.skip_unsupported = true;

    let report = mssql_poco::generate(&config, &CancellationToken::new()).await?;
    assert!(!report.cancelled);
    assert_eq!(report.files.len(), 4);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].table, "sales.Place");

    let customer = std::fs::read_to_string(dir.path().join("Customer.cs"))?;
    let expected = "\
using System;

namespace Shop.Models
{
    public class Customer
    {
        public int Id { get; set; }
        public string Name { get; set; }
        public char Code { get; set; }
        public decimal? Price { get; set; }
        public byte[] Stamp { get; set; }
        public byte[] Photo { get; set; }
    }
}
";
    assert_eq!(customer, expected);
    assert!(!dir.path().join("Place.cs").exists());
    Ok(())
}

#[tokio::test]
#[serial]
async fn test_generate_aborts_on_unsupported_type() -> anyhow::Result<()> {
    let server = start_server().await?;
    let dir = tempfile::tempdir()?;

    let mut config = GeneratorConfig::default_with_connection(server.connection_string.clone());
    config.output_dir = dir.path().to_path_buf();
    config.include_tables = "sales.Place".into();

    let err = mssql_poco::generate(&config, &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CodegenError::UnsupportedType { ref type_name } if type_name == "geography"
    ));
    Ok(())
}
