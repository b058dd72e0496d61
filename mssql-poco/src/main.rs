//! CLI entry point for mssql-poco

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use mssql_poco::codegen::{format_column, TypeMapper};
use mssql_poco::config::GeneratorConfig;
use mssql_poco::CodegenError;

#[derive(Parser)]
#[command(name = "mssql-poco")]
#[command(about = "Generate C# classes from the tables of a SQL Server database")]
#[command(version)]
struct Cli {
    /// Path to configuration file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// SQL Server connection string (overrides config)
    #[arg(long)]
    connection_string: Option<String>,

    /// Namespace of generated classes (overrides config)
    #[arg(short, long)]
    namespace: Option<String>,

    /// Output directory (overrides config)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Dry run - show what would be generated without writing files
    #[arg(long)]
    dry_run: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate one class file per base table
    Generate,
    /// Show tables, column types and their C# mapping
    Inspect {
        /// Print the table metadata as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete all rows of the given tables
    Truncate {
        /// Tables to truncate, e.g. dbo.Customer
        #[arg(required = true)]
        tables: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<CodegenError>() {
                Some(codegen_err) => eprintln!("{}", codegen_err.format_detailed()),
                None => eprintln!("Error: {:#}", err),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (before logging, so we can use config.log_level)
    let mut config = GeneratorConfig::load(cli.config.as_deref())?;

    // Initialize logging
    // Priority: RUST_LOG env var > config.log_level > default (debug for dev, info for release)
    let default_level = if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    };
    let log_level = config.log_level.as_deref().unwrap_or(default_level);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    // Apply CLI overrides
    if let Some(connection_string) = cli.connection_string {
        config.connection_string = connection_string;
    }
    if let Some(namespace) = cli.namespace {
        config.namespace = namespace;
    }
    if let Some(output) = cli.output {
        config.output_dir = output;
    }
    if cli.dry_run {
        config.dry_run = true;
    }

    match cli.command.unwrap_or(Commands::Generate) {
        Commands::Generate => generate(&config).await,
        Commands::Inspect { json } => inspect(&config, json).await,
        Commands::Truncate { tables } => {
            mssql_poco::truncate_tables(&config, &tables).await?;
            println!("Truncated {} tables", tables.len());
            Ok(())
        }
    }
}

async fn generate(config: &GeneratorConfig) -> Result<()> {
    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Stop requested; finishing the current table");
            on_signal.cancel();
        }
    });

    info!(
        "Generating classes in namespace {} into {}",
        config.effective_namespace(),
        config.output_dir.display()
    );
    let report = mssql_poco::generate(config, &cancel).await?;

    if config.dry_run {
        println!("Dry run mode - would generate:");
    }
    for path in &report.files {
        println!("  {}", path.display());
    }
    for skipped in &report.skipped {
        println!("  skipped {} (unsupported type {})", skipped.table, skipped.type_name);
    }
    if report.cancelled {
        println!("Cancel requested.");
    } else {
        println!("Finished");
    }
    Ok(())
}

async fn inspect(config: &GeneratorConfig, json: bool) -> Result<()> {
    let tables = mssql_poco::inspect(config).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&tables)?);
        return Ok(());
    }

    println!("Found {} tables:\n", tables.len());
    for table in &tables {
        println!("Table: {}", table);
        println!("  Columns:");
        for col in &table.columns {
            let csharp = TypeMapper::map_column(col)
                .map(|t| t.to_type_string())
                .unwrap_or_else(|e| format!("<{}>", e));
            let pk = if col.is_primary_key { " PRIMARY KEY" } else { "" };
            println!(
                "    - {} {} -> {}{}",
                col.name,
                format_column(col),
                csharp,
                pk
            );
        }
        let pk = table.primary_key_columns();
        if !pk.is_empty() {
            println!("  Primary Key: {:?}", pk);
        }
        println!();
    }

    Ok(())
}
