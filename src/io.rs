//! Asset loading and saving
//!
//! Meshes and render configs are stored as RON (Rusty Object Notation),
//! framebuffer snapshots as PNG.

use std::fs;
use std::path::Path;
use serde::{de::DeserializeOwned, Serialize};

/// Error type for asset I/O
#[derive(Debug)]
pub enum AssetError {
    IoError(std::io::Error),
    ParseError(ron::error::SpannedError),
    SerializeError(ron::Error),
    ImageError(image::ImageError),
    /// Loaded data violates a structural invariant
    InvalidGeometry(String),
}

impl From<std::io::Error> for AssetError {
    fn from(e: std::io::Error) -> Self {
        AssetError::IoError(e)
    }
}

impl From<ron::error::SpannedError> for AssetError {
    fn from(e: ron::error::SpannedError) -> Self {
        AssetError::ParseError(e)
    }
}

impl From<ron::Error> for AssetError {
    fn from(e: ron::Error) -> Self {
        AssetError::SerializeError(e)
    }
}

impl From<image::ImageError> for AssetError {
    fn from(e: image::ImageError) -> Self {
        AssetError::ImageError(e)
    }
}

impl std::fmt::Display for AssetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetError::IoError(e) => write!(f, "IO error: {}", e),
            AssetError::ParseError(e) => write!(f, "Parse error: {}", e),
            AssetError::SerializeError(e) => write!(f, "Serialize error: {}", e),
            AssetError::ImageError(e) => write!(f, "Image error: {}", e),
            AssetError::InvalidGeometry(msg) => write!(f, "Invalid geometry: {}", msg),
        }
    }
}

impl std::error::Error for AssetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AssetError::IoError(e) => Some(e),
            AssetError::ParseError(e) => Some(e),
            AssetError::SerializeError(e) => Some(e),
            AssetError::ImageError(e) => Some(e),
            AssetError::InvalidGeometry(_) => None,
        }
    }
}

/// Read and parse a RON file
pub fn load_ron<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T, AssetError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let value = from_ron_str(&contents)?;
    log::debug!("loaded {}", path.display());
    Ok(value)
}

/// Parse RON from a string (for embedded assets or testing)
pub fn from_ron_str<T: DeserializeOwned>(s: &str) -> Result<T, AssetError> {
    Ok(ron::from_str(s)?)
}

/// Serialize a value as pretty RON
pub fn to_ron_string<T: Serialize>(value: &T) -> Result<String, AssetError> {
    let config = ron::ser::PrettyConfig::new()
        .depth_limit(4)
        .indentor("  ".to_string());

    Ok(ron::ser::to_string_pretty(value, config)?)
}

/// Serialize a value and write it to a RON file
pub fn save_ron<T: Serialize, P: AsRef<Path>>(value: &T, path: P) -> Result<(), AssetError> {
    let path = path.as_ref();
    let contents = to_ron_string(value)?;
    fs::write(path, contents)?;
    log::info!("saved {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_is_reported() {
        let result: Result<Vec<u32>, _> = from_ron_str("[1, 2,");
        let err = result.unwrap_err();
        assert!(matches!(err, AssetError::ParseError(_)));
        assert!(err.to_string().starts_with("Parse error"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let path = std::env::temp_dir().join("softpipe-does-not-exist.ron");
        let result: Result<Vec<u32>, _> = load_ron(&path);
        assert!(matches!(result, Err(AssetError::IoError(_))));
    }
}
