//! Configured site entries.

use serde::Deserialize;

/// One external project or image to monitor.
#[derive(Debug, Clone, Deserialize)]
pub struct Site {
    /// Display label, unique within a run.
    pub name: String,

    /// Repository, package, or registry image URL.
    pub url: String,

    /// Optional human-readable description, passed through to the snapshot.
    #[serde(default)]
    pub desc: Option<String>,

    /// Optional container-package name override.
    ///
    /// When set, package lookup tries this exact name before any
    /// discovered or guessed candidates.
    #[serde(default)]
    pub pkgname: Option<String>,
}
