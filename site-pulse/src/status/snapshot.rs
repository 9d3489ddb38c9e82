//! The persisted snapshot artifact.

use super::record::{Status, StatusRecord};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Run-level metadata written alongside the records.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotMetadata {
    /// Generation timestamp, RFC 3339.
    pub generated_at: String,

    /// Number of configured sites (one record each).
    pub total_sites: usize,

    /// Records with status "success".
    pub success_count: usize,

    /// Records with status "error".
    pub error_count: usize,
}

/// The full output artifact for one run.
///
/// Created fresh each run and fully overwrites the previous artifact;
/// record order matches configuration order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub metadata: SnapshotMetadata,
    pub sites: Vec<StatusRecord>,
}

impl Snapshot {
    /// Builds a snapshot from resolved records, tallying outcome counts.
    #[must_use]
    pub fn new(sites: Vec<StatusRecord>) -> Self {
        let success_count = sites
            .iter()
            .filter(|record| record.status == Status::Success)
            .count();

        Self {
            metadata: SnapshotMetadata {
                generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
                total_sites: sites.len(),
                success_count,
                error_count: sites.len() - success_count,
            },
            sites,
        }
    }
}
