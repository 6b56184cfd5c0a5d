//! JSON rendering for outline records.

use std::path::Path;

use crate::error::{Error, Result};
use crate::model::OutlineResult;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert an outline to JSON.
pub fn to_json(outline: &OutlineResult, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(outline),
        JsonFormat::Compact => serde_json::to_string(outline),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

/// Serialize an outline and write it to `path`.
///
/// Serialization happens before the file is touched, so a failure never
/// leaves a truncated record behind.
pub fn write_json<P: AsRef<Path>>(outline: &OutlineResult, path: P, format: JsonFormat) -> Result<()> {
    let mut json = to_json(outline, format)?;
    json.push('\n');
    std::fs::write(path, json)?;
    Ok(())
}
