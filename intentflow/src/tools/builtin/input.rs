//! Parsing helpers for tool input strings.

use crate::errors::ToolError;

/// Separator between the fields of a composite input.
pub(crate) const FIELD_SEPARATOR: char = ';';

/// Splits a composite input into exactly `N` fields.
///
/// The last field keeps any further separators, so free text can go there.
pub(crate) fn split_fields<'a, const N: usize>(
    tool: &str,
    input: &'a str,
    format: &str,
) -> Result<[&'a str; N], ToolError> {
    let parts: Vec<&'a str> = input.splitn(N, FIELD_SEPARATOR).collect();
    parts.try_into().map_err(|parts: Vec<&'a str>| {
        ToolError::invalid_input(
            tool,
            format!(
                "expected {N} fields in the form '{format}', got {}",
                parts.len()
            ),
        )
    })
}

/// Trims the input and rejects it if nothing is left.
pub(crate) fn require_non_empty<'a>(tool: &str, input: &'a str) -> Result<&'a str, ToolError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ToolError::invalid_input(tool, "input is empty"));
    }
    Ok(trimmed)
}

/// Splits `name.ext` into its stem and extension.
pub(crate) fn split_extension(path: &str) -> (&str, Option<&str>) {
    let file_start = path.rfind('/').map_or(0, |i| i + 1);
    match path[file_start..].rfind('.') {
        Some(dot) if dot > 0 => {
            let dot = file_start + dot;
            (&path[..dot], Some(&path[dot + 1..]))
        }
        _ => (path, None),
    }
}
