//! Snapshot output types.

mod record;
mod snapshot;

pub use record::{Status, StatusRecord};
pub use snapshot::{Snapshot, SnapshotMetadata};
