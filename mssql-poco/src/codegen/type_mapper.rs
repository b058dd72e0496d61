//! SQL Server to C# type mapping
//!
//! See <https://docs.microsoft.com/en-us/dotnet/framework/data/adonet/sql-server-data-type-mappings>

use std::fmt;
use std::str::FromStr;

use crate::catalog::ColumnDescriptor;
use crate::error::{CodegenError, Result};

/// The SQL Server scalar types that have a C# mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SqlType {
    BigInt,
    Binary,
    Bit,
    Char,
    Date,
    DateTime,
    DateTime2,
    DateTimeOffset,
    Decimal,
    Float,
    Image,
    Int,
    Money,
    NChar,
    NText,
    Numeric,
    NVarChar,
    Real,
    RowVersion,
    SmallDateTime,
    SmallInt,
    SmallMoney,
    Text,
    Time,
    Timestamp,
    TinyInt,
    UniqueIdentifier,
    VarBinary,
    VarChar,
}

impl SqlType {
    pub const ALL: [SqlType; 29] = [
        SqlType::BigInt,
        SqlType::Binary,
        SqlType::Bit,
        SqlType::Char,
        SqlType::Date,
        SqlType::DateTime,
        SqlType::DateTime2,
        SqlType::DateTimeOffset,
        SqlType::Decimal,
        SqlType::Float,
        SqlType::Image,
        SqlType::Int,
        SqlType::Money,
        SqlType::NChar,
        SqlType::NText,
        SqlType::Numeric,
        SqlType::NVarChar,
        SqlType::Real,
        SqlType::RowVersion,
        SqlType::SmallDateTime,
        SqlType::SmallInt,
        SqlType::SmallMoney,
        SqlType::Text,
        SqlType::Time,
        SqlType::Timestamp,
        SqlType::TinyInt,
        SqlType::UniqueIdentifier,
        SqlType::VarBinary,
        SqlType::VarChar,
    ];

    /// Catalog name of the type, lower case
    pub fn as_str(&self) -> &'static str {
        match self {
            SqlType::BigInt => "bigint",
            SqlType::Binary => "binary",
            SqlType::Bit => "bit",
            SqlType::Char => "char",
            SqlType::Date => "date",
            SqlType::DateTime => "datetime",
            SqlType::DateTime2 => "datetime2",
            SqlType::DateTimeOffset => "datetimeoffset",
            SqlType::Decimal => "decimal",
            SqlType::Float => "float",
            SqlType::Image => "image",
            SqlType::Int => "int",
            SqlType::Money => "money",
            SqlType::NChar => "nchar",
            SqlType::NText => "ntext",
            SqlType::Numeric => "numeric",
            SqlType::NVarChar => "nvarchar",
            SqlType::Real => "real",
            SqlType::RowVersion => "rowversion",
            SqlType::SmallDateTime => "smalldatetime",
            SqlType::SmallInt => "smallint",
            SqlType::SmallMoney => "smallmoney",
            SqlType::Text => "text",
            SqlType::Time => "time",
            SqlType::Timestamp => "timestamp",
            SqlType::TinyInt => "tinyint",
            SqlType::UniqueIdentifier => "uniqueidentifier",
            SqlType::VarBinary => "varbinary",
            SqlType::VarChar => "varchar",
        }
    }
}

impl FromStr for SqlType {
    type Err = CodegenError;

    /// Case-insensitive lookup; unknown names are [`CodegenError::UnsupportedType`]
    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_lowercase();
        SqlType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == lower)
            .ok_or_else(|| CodegenError::unsupported_type(s.trim()))
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A C# type used for generated properties
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CSharpType {
    Bool,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    Decimal,
    Char,
    String,
    Bytes,
    DateTime,
    DateTimeOffset,
    TimeSpan,
    Guid,
}

impl CSharpType {
    /// The name written into generated source
    pub fn type_name(&self) -> &'static str {
        match self {
            CSharpType::Bool => "bool",
            CSharpType::Byte => "byte",
            CSharpType::Short => "short",
            CSharpType::Int => "int",
            CSharpType::Long => "long",
            CSharpType::Float => "float",
            CSharpType::Double => "double",
            CSharpType::Decimal => "decimal",
            CSharpType::Char => "char",
            CSharpType::String => "string",
            CSharpType::Bytes => "byte[]",
            CSharpType::DateTime => "DateTime",
            CSharpType::DateTimeOffset => "DateTimeOffset",
            CSharpType::TimeSpan => "TimeSpan",
            CSharpType::Guid => "Guid",
        }
    }

    /// Value types need `?` to hold NULL; `string` and `byte[]` already can
    pub fn is_value_type(&self) -> bool {
        !matches!(self, CSharpType::String | CSharpType::Bytes)
    }
}

/// Result of mapping one column: a C# type plus its nullable marker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetType {
    pub base: CSharpType,
    pub nullable: bool,
}

impl TargetType {
    /// Build a target type; the nullable wrap only applies to value types
    pub fn new(base: CSharpType, is_nullable: bool) -> Self {
        Self {
            base,
            nullable: is_nullable && base.is_value_type(),
        }
    }

    /// `int`, `int?`, `string`, ...
    pub fn to_type_string(&self) -> String {
        if self.nullable {
            format!("{}?", self.base.type_name())
        } else {
            self.base.type_name().to_string()
        }
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_type_string())
    }
}

/// Maps SQL Server column types to C# types
pub struct TypeMapper;

impl TypeMapper {
    /// Map a catalog type name to a C# type.
    ///
    /// `max_length_bytes` only matters for `char`: a `char(1)` column becomes
    /// `char`, any other width becomes `string`.
    pub fn map(sql_type_name: &str, is_nullable: bool, max_length_bytes: i32) -> Result<TargetType> {
        let sql_type: SqlType = sql_type_name.parse()?;
        let base = Self::base_type(sql_type, max_length_bytes);
        Ok(TargetType::new(base, is_nullable))
    }

    /// Map a catalog column
    pub fn map_column(column: &ColumnDescriptor) -> Result<TargetType> {
        Self::map(
            &column.sql_type_name,
            column.is_nullable,
            column.max_length_bytes,
        )
    }

    /// The C# type without the nullable marker
    pub fn base_type(sql_type: SqlType, max_length_bytes: i32) -> CSharpType {
        match sql_type {
            SqlType::BigInt => CSharpType::Long,
            SqlType::Binary
            | SqlType::Image
            | SqlType::Timestamp
            | SqlType::VarBinary
            | SqlType::RowVersion => CSharpType::Bytes,
            SqlType::Bit => CSharpType::Bool,
            SqlType::Char if max_length_bytes == 1 => CSharpType::Char,
            SqlType::Char => CSharpType::String,
            SqlType::Date | SqlType::DateTime | SqlType::DateTime2 | SqlType::SmallDateTime => {
                CSharpType::DateTime
            }
            SqlType::DateTimeOffset => CSharpType::DateTimeOffset,
            SqlType::Decimal | SqlType::Numeric | SqlType::SmallMoney | SqlType::Money => {
                CSharpType::Decimal
            }
            SqlType::Float => CSharpType::Double,
            SqlType::Int => CSharpType::Int,
            SqlType::NChar
            | SqlType::NText
            | SqlType::NVarChar
            | SqlType::Text
            | SqlType::VarChar => CSharpType::String,
            SqlType::Real => CSharpType::Float,
            SqlType::SmallInt => CSharpType::Short,
            SqlType::Time => CSharpType::TimeSpan,
            SqlType::TinyInt => CSharpType::Byte,
            SqlType::UniqueIdentifier => CSharpType::Guid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REFERENCE_TYPES: [&str; 10] = [
        "binary",
        "image",
        "timestamp",
        "varbinary",
        "rowversion",
        "nchar",
        "ntext",
        "nvarchar",
        "text",
        "varchar",
    ];

    #[test]
    fn test_nullable_wraps_value_types_only() {
        for sql_type in SqlType::ALL {
            // char(1) keeps the value-type branch of char
            let mapped = TypeMapper::map(sql_type.as_str(), true, 1).unwrap();
            let expect_wrap = !REFERENCE_TYPES.contains(&sql_type.as_str());
            assert_eq!(mapped.nullable, expect_wrap, "type {}", sql_type);
        }
    }

    #[test]
    fn test_not_nullable_never_wraps() {
        for sql_type in SqlType::ALL {
            let mapped = TypeMapper::map(sql_type.as_str(), false, 1).unwrap();
            assert!(!mapped.nullable, "type {}", sql_type);
        }
    }

    #[test]
    fn test_integer_types() {
        assert_eq!(TypeMapper::map("bigint", false, 8).unwrap().to_type_string(), "long");
        assert_eq!(TypeMapper::map("int", true, 4).unwrap().to_type_string(), "int?");
        assert_eq!(TypeMapper::map("smallint", false, 2).unwrap().to_type_string(), "short");
        assert_eq!(TypeMapper::map("tinyint", true, 1).unwrap().to_type_string(), "byte?");
    }

    #[test]
    fn test_char_width_asymmetry() {
        let single = TypeMapper::map("char", false, 1).unwrap();
        assert_eq!(single.base, CSharpType::Char);
        assert!(!single.nullable);

        let single_nullable = TypeMapper::map("char", true, 1).unwrap();
        assert_eq!(single_nullable.to_type_string(), "char?");

        let wide = TypeMapper::map("char", true, 5).unwrap();
        assert_eq!(wide.base, CSharpType::String);
        assert!(!wide.nullable);
        assert_eq!(wide.to_type_string(), "string");

        let max = TypeMapper::map("char", false, -1).unwrap();
        assert_eq!(max.base, CSharpType::String);
    }

    #[test]
    fn test_string_types_ignore_width() {
        for width in [-1, 2, 100, 8000] {
            assert_eq!(
                TypeMapper::map("nvarchar", true, width).unwrap(),
                TargetType::new(CSharpType::String, false)
            );
        }
    }

    #[test]
    fn test_decimal_family() {
        let col = ColumnDescriptor::new("Price", "decimal", true).with_precision(18, 4);
        let mapped = TypeMapper::map_column(&col).unwrap();
        assert_eq!(mapped.base, CSharpType::Decimal);
        assert!(mapped.nullable);
        assert_eq!(mapped.to_type_string(), "decimal?");

        for name in ["numeric", "money", "smallmoney"] {
            assert_eq!(TypeMapper::map(name, false, 8).unwrap().base, CSharpType::Decimal);
        }
    }

    #[test]
    fn test_binary_family() {
        for name in ["binary", "image", "timestamp", "varbinary", "rowversion"] {
            let mapped = TypeMapper::map(name, true, -1).unwrap();
            assert_eq!(mapped.to_type_string(), "byte[]", "type {}", name);
        }
    }

    #[test]
    fn test_temporal_and_misc_types() {
        for name in ["date", "datetime", "datetime2", "smalldatetime"] {
            assert_eq!(TypeMapper::map(name, false, 8).unwrap().to_type_string(), "DateTime");
        }
        assert_eq!(
            TypeMapper::map("datetimeoffset", true, 10).unwrap().to_type_string(),
            "DateTimeOffset?"
        );
        assert_eq!(TypeMapper::map("time", true, 5).unwrap().to_type_string(), "TimeSpan?");
        assert_eq!(
            TypeMapper::map("uniqueidentifier", false, 16).unwrap().to_type_string(),
            "Guid"
        );
        assert_eq!(TypeMapper::map("bit", true, 1).unwrap().to_type_string(), "bool?");
        assert_eq!(TypeMapper::map("float", false, 8).unwrap().to_type_string(), "double");
        assert_eq!(TypeMapper::map("real", false, 4).unwrap().to_type_string(), "float");
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(
            TypeMapper::map("UniqueIdentifier", false, 16).unwrap().base,
            CSharpType::Guid
        );
        assert_eq!("NVARCHAR".parse::<SqlType>().unwrap(), SqlType::NVarChar);
    }

    #[test]
    fn test_unsupported_type() {
        let err = TypeMapper::map("geography", false, 0).unwrap_err();
        match err {
            CodegenError::UnsupportedType { type_name } => assert_eq!(type_name, "geography"),
            other => panic!("unexpected error: {other:?}"),
        }

        for name in ["xml", "sql_variant", "hierarchyid", "sysname"] {
            assert!(matches!(
                TypeMapper::map(name, true, 0),
                Err(CodegenError::UnsupportedType { .. })
            ));
        }
    }

    #[test]
    fn test_blank_type_name() {
        match TypeMapper::map("  ", false, 0).unwrap_err() {
            CodegenError::UnsupportedType { type_name } => assert_eq!(type_name, ""),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
