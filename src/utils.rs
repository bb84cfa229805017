// ABOUTME: Utility functions for the pptx2png application
// ABOUTME: Provides helpers for source validation and path handling

use crate::errors::{ConvertError, Result};
use std::path::{Path, PathBuf};

/// Validate that a file exists
pub fn validate_file_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(ConvertError::SourceNotFound(path.to_path_buf()));
    }
    if !path.is_file() {
        return Err(ConvertError::InvalidSource(format!(
            "Path is not a file: {:?}",
            path
        )));
    }
    Ok(())
}

/// Validate that a source path names an existing .pptx file
pub fn validate_pptx_source(path: &Path) -> Result<()> {
    validate_file_exists(path)?;
    let is_pptx = path
        .extension()
        .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case("pptx"))
        .unwrap_or(false);
    if !is_pptx {
        return Err(ConvertError::InvalidSource(format!(
            "Source must be a valid .pptx file: {:?}",
            path
        )));
    }
    Ok(())
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_directory_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path).map_err(|source| ConvertError::DestinationError {
            path: path.to_path_buf(),
            source,
        })?;
    } else if !path.is_dir() {
        return Err(ConvertError::ValidationError(format!(
            "Path exists but is not a directory: {:?}",
            path
        )));
    }
    Ok(())
}

/// File name of `path` without its extension
pub fn base_name(path: &Path) -> Result<String> {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.is_empty())
        .ok_or_else(|| ConvertError::InvalidSource(format!("Path has no file name: {:?}", path)))
}

/// Directory containing `path`, `.` for bare file names
pub fn parent_directory(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
