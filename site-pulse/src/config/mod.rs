//! Site configuration loading.
//!
//! The configuration is a single JSON document listing the sites to monitor.
//! It is loaded once at the start of a run; a load failure is fatal to the
//! whole run, unlike any per-site failure later on.

mod error;
mod site;

pub use error::ConfigError;
pub use site::Site;

use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

/// The full site configuration document.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Sites to monitor, in the order records are emitted.
    pub sites: Vec<Site>,
}

/// Loads and validates the configuration from a JSON file.
///
/// Expected shape:
/// ```json
/// { "sites": [ { "name": "...", "url": "...", "desc": "...", "pkgname": "..." } ] }
/// ```
///
/// # Errors
///
/// Returns [`ConfigError`] if the file is missing, unreadable, not valid
/// JSON, or contains duplicate site names.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::MissingFile {
            path: path.display().to_string(),
        });
    }

    let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
        path: path.display().to_string(),
        source: e,
    })?;

    let config: Config = serde_json::from_str(&raw).map_err(|e| ConfigError::JsonError {
        path: path.display().to_string(),
        source: e,
    })?;

    let mut seen = HashSet::new();
    for site in &config.sites {
        if !seen.insert(site.name.as_str()) {
            return Err(ConfigError::ValidationError {
                path: path.display().to_string(),
                message: format!("duplicate site name '{}'", site.name),
            });
        }
    }

    info!(count = config.sites.len(), "Loaded site configuration");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join("config.json");
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_valid_config() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"{
                "sites": [
                    { "name": "one", "url": "https://github.com/o/r" },
                    { "name": "two", "url": "https://hub.docker.com/r/o/p", "desc": "an image", "pkgname": "p" }
                ]
            }"#,
        );

        let config = load_config(&path).unwrap();
        assert_eq!(config.sites.len(), 2);
        assert_eq!(config.sites[0].name, "one");
        assert_eq!(config.sites[0].desc, None);
        assert_eq!(config.sites[1].desc.as_deref(), Some("an image"));
        assert_eq!(config.sites[1].pkgname.as_deref(), Some("p"));
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let result = load_config(&dir.path().join("nope.json"));
        assert!(matches!(result, Err(ConfigError::MissingFile { .. })));
    }

    #[test]
    fn test_invalid_json() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "not json");
        assert!(matches!(
            load_config(&path),
            Err(ConfigError::JsonError { .. })
        ));
    }

    #[test]
    fn test_duplicate_site_names_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"{ "sites": [
                { "name": "same", "url": "https://github.com/o/r" },
                { "name": "same", "url": "https://github.com/o/r2" }
            ] }"#,
        );
        assert!(matches!(
            load_config(&path),
            Err(ConfigError::ValidationError { .. })
        ));
    }
}
