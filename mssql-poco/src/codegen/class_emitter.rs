//! Class emitter - renders a C# class from table columns

use crate::catalog::ColumnDescriptor;
use crate::error::Result;

use super::type_mapper::{TargetType, TypeMapper};

const INDENT: &str = "    ";

/// Produce the source of one C# class.
///
/// Properties follow `columns` order exactly and use the column names
/// verbatim. Every column is mapped before any text is produced, so one
/// unmappable column fails the whole class.
pub fn emit_class(namespace: &str, class_name: &str, columns: &[ColumnDescriptor]) -> Result<String> {
    let fields = columns
        .iter()
        .map(|col| TypeMapper::map_column(col).map(|ty| (col.name.as_str(), ty)))
        .collect::<Result<Vec<(&str, TargetType)>>>()?;

    let mut code = String::new();
    code.push_str("using System;\n");
    code.push('\n');
    code.push_str(&format!("namespace {}\n", namespace));
    code.push_str("{\n");

    code.push_str(&format!("{}public class {}\n", INDENT, class_name));
    code.push_str(&format!("{}{{\n", INDENT));
    for (name, ty) in &fields {
        code.push_str(&format!(
            "{0}{0}public {1} {2} {{ get; set; }}\n",
            INDENT,
            ty.to_type_string(),
            name
        ));
    }
    code.push_str(&format!("{}}}\n", INDENT));

    code.push_str("}\n");
    Ok(code)
}
