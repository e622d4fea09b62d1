//! Upload path normalization
//!
//! Turns a "/"-separated storage path (from a folder upload, or a bare
//! file name for a single-file upload) into the ordered hierarchy segment
//! names the reconciler walks.

use thiserror::Error;

/// Workbook file extensions stripped from the final path segment
const WORKBOOK_EXTENSIONS: &[&str] = &[".xlsx", ".xls"];

/// Errors that can occur when normalizing upload paths
#[derive(Debug, Error)]
pub enum PathError {
    #[error("invalid upload path: '{0}' contains no usable segments")]
    InvalidPath(String),
}

/// Normalize an upload path into non-empty segment names.
///
/// Empty segments (leading, trailing or doubled separators) are dropped and
/// the final segment loses its workbook extension, case-insensitively.
pub fn normalize(path: &str) -> Result<Vec<String>, PathError> {
    let mut segments: Vec<String> = path
        .split('/')
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();

    if let Some(last) = segments.last_mut() {
        *last = strip_workbook_extension(last).to_string();
    }
    segments.retain(|s| !s.is_empty());

    if segments.is_empty() {
        return Err(PathError::InvalidPath(path.to_string()));
    }
    Ok(segments)
}

/// Strip a trailing workbook extension, if present
pub fn strip_workbook_extension(name: &str) -> &str {
    let lower = name.to_lowercase();
    for ext in WORKBOOK_EXTENSIONS {
        if lower.ends_with(ext) {
            return &name[..name.len() - ext.len()];
        }
    }
    name
}
