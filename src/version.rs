//! Current version of the distributed software
//!
//! Read from a small TOML file:
//!
//! ```toml
//! [version]
//! current = "9.5"
//! ```

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::error::ConfigError;

#[derive(Debug, Error)]
pub enum VersionError {
    #[error("failed to parse version file: {0}")]
    Config(#[from] ConfigError),

    #[error("version file {origin} has no [version] current entry")]
    Missing { origin: String },
}

#[derive(Deserialize)]
struct VersionFile {
    version: Option<VersionSection>,
}

#[derive(Deserialize)]
struct VersionSection {
    current: Option<toml::Value>,
}

/// Read the current version from a file
pub fn load_version(path: &Path) -> Result<String, VersionError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::read(path, e))?;
    parse_version(&content, &path.display().to_string())
}

/// Read the current version from TOML text
///
/// The value must be a string: a bare `current = 9.0` would lose its
/// trailing zero once parsed as a float, so it is rejected.
pub fn parse_version(content: &str, origin: &str) -> Result<String, VersionError> {
    let file: VersionFile = toml::from_str(content).map_err(|e| ConfigError::syntax(origin, e))?;
    let missing = || VersionError::Missing {
        origin: origin.to_string(),
    };

    match file.version.and_then(|v| v.current).ok_or_else(missing)? {
        toml::Value::String(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        toml::Value::String(_) => Err(missing()),
        other => Err(ConfigError::invalid(
            origin,
            format!(
                "version.current must be a quoted string, found {} {}",
                other.type_str(),
                other
            ),
        )
        .into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_version() {
        let v = parse_version("[version]\ncurrent = \"9.5.1\"\n", "v.cfg").unwrap();
        assert_eq!(v, "9.5.1");
    }

    #[test]
    fn test_trailing_zero_is_kept() {
        assert_eq!(parse_version("[version]\ncurrent = \"9.0\"", "v.cfg").unwrap(), "9.0");
        assert_eq!(parse_version("[version]\ncurrent = \"9.10\"", "v.cfg").unwrap(), "9.10");
    }

    #[test]
    fn test_bare_number_is_rejected() {
        for src in ["[version]\ncurrent = 9.0", "[version]\ncurrent = 10"] {
            let err = parse_version(src, "v.cfg").unwrap_err();
            assert!(matches!(err, VersionError::Config(ConfigError::Invalid { .. })));
            assert!(err.to_string().contains("quoted string"));
        }
    }

    #[test]
    fn test_missing_section() {
        let err = parse_version("[other]\nx = 1", "v.cfg").unwrap_err();
        assert!(matches!(err, VersionError::Missing { .. }));
        assert_eq!(
            err.to_string(),
            "version file v.cfg has no [version] current entry"
        );
    }

    #[test]
    fn test_empty_version_is_missing() {
        let err = parse_version("[version]\ncurrent = \"  \"", "v.cfg").unwrap_err();
        assert!(matches!(err, VersionError::Missing { .. }));
    }

    #[test]
    fn test_wrong_type() {
        let err = parse_version("[version]\ncurrent = [1, 2]", "v.cfg").unwrap_err();
        assert!(matches!(err, VersionError::Config(ConfigError::Invalid { .. })));
    }

    #[test]
    fn test_missing_file() {
        let err = load_version(Path::new("/nonexistent/latest_torbrowser.cfg")).unwrap_err();
        assert!(matches!(err, VersionError::Config(ConfigError::Read { .. })));
    }
}
