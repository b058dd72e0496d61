//! SQL Server identifier validation and quoting
//!
//! Identifiers cannot be bound as statement parameters, so statements that
//! name a table directly (such as `TRUNCATE TABLE`) quote every part of the
//! name with brackets instead.

use crate::error::{CodegenError, Result};

/// SQL Server `sysname` limit
const MAX_IDENTIFIER_LENGTH: usize = 128;

/// Reject empty, oversized, or NUL-containing identifiers
pub fn validate_identifier(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(CodegenError::InvalidInput(
            "Identifier cannot be empty".to_string(),
        ));
    }

    if name.contains('\0') {
        return Err(CodegenError::InvalidInput(format!(
            "Identifier contains a null byte: {:?}",
            name
        )));
    }

    if name.chars().count() > MAX_IDENTIFIER_LENGTH {
        return Err(CodegenError::InvalidInput(format!(
            "Identifier exceeds maximum length of {} characters: {:?}",
            MAX_IDENTIFIER_LENGTH, name
        )));
    }

    Ok(())
}

/// Quote one identifier part: `users` -> `[users]`, `a]b` -> `[a]]b]`
pub fn quote_mssql(name: &str) -> Result<String> {
    validate_identifier(name)?;
    Ok(format!("[{}]", name.replace(']', "]]")))
}

/// Quote a possibly schema-qualified table name.
///
/// Accepts `table`, `schema.table`, and already bracketed parts such as
/// `[dbo].[Order Details]`. Dots inside brackets belong to the part.
pub fn quote_table_name(name: &str) -> Result<String> {
    let parts = split_qualified(name.trim())?;
    if parts.len() > 3 {
        return Err(CodegenError::InvalidInput(format!(
            "Too many name parts in table identifier: {:?}",
            name
        )));
    }

    let quoted = parts
        .iter()
        .map(|p| quote_mssql(p))
        .collect::<Result<Vec<_>>>()?;
    Ok(quoted.join("."))
}

/// Split `a.[b.c].d` into unquoted parts `a`, `b.c`, `d`
fn split_qualified(name: &str) -> Result<Vec<String>> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut chars = name.chars().peekable();
    let mut in_brackets = false;

    while let Some(c) = chars.next() {
        match c {
            '[' if !in_brackets && current.is_empty() => in_brackets = true,
            ']' if in_brackets => {
                if chars.peek() == Some(&']') {
                    chars.next();
                    current.push(']');
                } else {
                    in_brackets = false;
                }
            }
            '.' if !in_brackets => parts.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }

    if in_brackets {
        return Err(CodegenError::InvalidInput(format!(
            "Unterminated bracket in table identifier: {:?}",
            name
        )));
    }
    parts.push(current);

    Ok(parts)
}
