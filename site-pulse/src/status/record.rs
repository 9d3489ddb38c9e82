//! Per-site status records.

use crate::config::Site;
use serde::{Deserialize, Serialize};

/// Type label used when a site fails before its provider is known.
pub(crate) const UNKNOWN_LABEL: &str = "unknown";

/// Terminal outcome of resolving one site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Core fields were resolved (package fields may still be absent).
    Success,

    /// Resolution failed; `errorMessage` carries the reason.
    Error,
}

/// One site's resolved freshness facts, as written into the snapshot.
///
/// Exactly one of the following holds: `status` is [`Status::Success`] with
/// the core fields populated, or `status` is [`Status::Error`] with
/// `error_message` set. Absent optional fields are omitted from the JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusRecord {
    /// Display label from the configuration.
    pub name: String,

    /// Configured URL.
    pub url: String,

    /// Optional description from the configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,

    /// Resolved provider label (e.g. "GitHub repository").
    #[serde(rename = "type")]
    pub kind: String,

    /// Most recent commit/push timestamp.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_commit_time: Option<String>,

    /// Latest release tag or registry tag name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_version: Option<String>,

    /// Release publish or tag update timestamp.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_update_time: Option<String>,

    /// Latest container-package version, when a package was found.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_version: Option<String>,

    /// Container-package update timestamp, when a package was found.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_update_time: Option<String>,

    /// Terminal outcome.
    pub status: Status,

    /// Failure reason, only present on error records.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl StatusRecord {
    /// Creates an error record for a site whose resolution failed.
    #[must_use]
    pub fn failure(site: &Site, message: String) -> Self {
        Self {
            name: site.name.clone(),
            url: site.url.clone(),
            desc: site.desc.clone(),
            kind: UNKNOWN_LABEL.to_string(),
            last_commit_time: None,
            latest_version: None,
            last_update_time: None,
            package_version: None,
            package_update_time: None,
            status: Status::Error,
            error_message: Some(message),
        }
    }

    /// Creates an error record for a site whose resolution timed out.
    #[must_use]
    pub fn timeout(site: &Site, timeout_secs: u64) -> Self {
        Self::failure(
            site,
            format!("resolution timed out after {timeout_secs}s"),
        )
    }
}
