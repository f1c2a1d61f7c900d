use super::types::Spec;
use crate::error::{Error, Result};
use std::path::Path;

/// Maximum size for a spec file (10 MB).
pub const MAX_SPEC_FILE_BYTES: u64 = 10 * 1024 * 1024;

/// Read a compiled spec from a JSON or YAML file, chosen by extension.
pub fn read_spec(path: &Path) -> Result<Spec> {
    let content = read_to_string_bounded(path, MAX_SPEC_FILE_BYTES)?;
    parse_spec(path, &content)
}

/// Read a UTF-8 file, refusing anything larger than `limit` bytes.
pub(crate) fn read_to_string_bounded(path: &Path, limit: u64) -> Result<String> {
    let metadata = std::fs::metadata(path).map_err(|e| Error::io(path, e))?;
    if metadata.len() > limit {
        return Err(Error::FileTooLarge {
            path: path.to_path_buf(),
            len: metadata.len(),
            limit,
        });
    }
    std::fs::read_to_string(path).map_err(|e| Error::io(path, e))
}

fn parse_spec(path: &Path, content: &str) -> Result<Spec> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("yaml") | Some("yml") => {
            serde_yaml::from_str(content).map_err(|e| Error::parse(path, e))
        }
        _ => serde_json::from_str(content).map_err(|e| Error::parse(path, e)),
    }
}

/// Write a spec to disk; YAML for `.yaml`/`.yml`, pretty JSON otherwise.
pub fn write_spec(path: &Path, spec: &Spec) -> Result<()> {
    let content = render_spec(path, spec)?;
    std::fs::write(path, content).map_err(|e| Error::io(path, e))
}

/// Render a spec in the format implied by `path`.
pub fn render_spec(path: &Path, spec: &Spec) -> Result<String> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("yaml") | Some("yml") => {
            serde_yaml::to_string(spec).map_err(|e| Error::parse(path, e))
        }
        _ => serde_json::to_string_pretty(spec).map_err(|e| Error::parse(path, e)),
    }
}
