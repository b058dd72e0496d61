//! Default configuration values - single source of truth

/// Namespace used when none (or a blank one) is given
pub const NAMESPACE: &str = "SampleNamespace";

/// Default output directory for generated classes
pub const OUTPUT_DIR: &str = "./generated";

/// Extension of generated files
pub const FILE_EXTENSION: &str = "cs";

/// Default include tables pattern (all tables)
pub const INCLUDE_TABLES: &str = "*";

/// Default exclude tables pattern (none)
pub const EXCLUDE_TABLES: &str = "";

/// Abort the run on the first table with an unmappable column
pub const SKIP_UNSUPPORTED: bool = false;

/// Whether to run in dry-run mode by default
pub const DRY_RUN: bool = false;

/// Prefix of environment variables read by [`super::GeneratorConfig::load`]
pub const ENV_PREFIX: &str = "MSSQL_POCO";
