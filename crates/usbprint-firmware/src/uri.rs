//! File name normalization
//!
//! File dialogs hand over `file://` URIs; firmware updates need a local path.

use std::path::PathBuf;

use url::Url;

use crate::error::FirmwareError;

const FILE_SCHEME_PREFIX: &str = "file://";

/// Convert a `file://` URI to a local path; other names pass through
pub fn normalize_file_name(file_name: &str) -> Result<PathBuf, FirmwareError> {
    if !file_name.starts_with(FILE_SCHEME_PREFIX) {
        return Ok(PathBuf::from(file_name));
    }

    Url::parse(file_name)
        .ok()
        .and_then(|url| url.to_file_path().ok())
        .ok_or_else(|| FirmwareError::InvalidUri(file_name.to_string()))
}
