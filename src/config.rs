//! Backend location and on-disk paths.

use reqwest::Url;
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3001";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid base URL '{0}': {1}")]
    InvalidUrl(String, String),

    #[error("base URL '{0}' must use http or https")]
    UnsupportedScheme(String),

    #[error("could not determine the data directory")]
    NoDataDir,
}

/// Validates a base URL and returns it without a trailing slash.
pub fn parse_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim();
    let url = Url::parse(trimmed)
        .map_err(|e| ConfigError::InvalidUrl(trimmed.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::UnsupportedScheme(trimmed.to_string()));
    }
    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(
            trimmed.to_string(),
            "missing host".to_string(),
        ));
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}

pub fn get_data_dir() -> Result<PathBuf, ConfigError> {
    let project_dirs = directories::ProjectDirs::from("com", "gallery", "gallery-tui")
        .ok_or(ConfigError::NoDataDir)?;
    Ok(project_dirs.data_dir().to_path_buf())
}

pub fn log_file_path() -> Result<PathBuf, ConfigError> {
    Ok(get_data_dir()?.join("gallery-tui.log"))
}
