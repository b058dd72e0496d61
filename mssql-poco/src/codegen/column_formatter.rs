//! SQL type signatures as they appear in SQL Server Management Studio

use crate::catalog::ColumnDescriptor;

/// Render the column type with its size qualifier and `NULL` / `NOT NULL`,
/// e.g. `nvarchar(50) NULL` or `decimal(18, 4) NOT NULL`.
///
/// `nchar`, `nvarchar` and `varchar` report their width halved. For `varchar`
/// this under-reports the declared length (its catalog width is one byte per
/// character). Display only; type mapping never reads this.
pub fn format_column(column: &ColumnDescriptor) -> String {
    let mut result = column.sql_type_name.to_lowercase();

    match result.as_str() {
        "binary" | "char" | "varbinary" => {
            result.push_str(&format!("({})", width(column.max_length_bytes, 1)));
        }
        "nchar" | "nvarchar" | "varchar" => {
            result.push_str(&format!("({})", width(column.max_length_bytes, 2)));
        }
        "decimal" | "numeric" => {
            result.push_str(&format!("({}, {})", column.precision, column.scale));
        }
        _ => {}
    }

    if column.is_nullable {
        result.push_str(" NULL");
    } else {
        result.push_str(" NOT NULL");
    }

    result
}

fn width(max_length_bytes: i32, bytes_per_char: i32) -> String {
    if max_length_bytes < 0 {
        "max".to_string()
    } else {
        (max_length_bytes / bytes_per_char).to_string()
    }
}
