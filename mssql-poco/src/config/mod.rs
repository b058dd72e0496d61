//! Configuration for mssql-poco

pub mod defaults;
mod settings;

pub use settings::*;
