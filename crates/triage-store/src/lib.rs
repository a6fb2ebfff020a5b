//! triage-store
//!
//! File-backed hospital and cluster snapshots. Implements the engine's
//! repository traits over an in-memory copy guarded by a `tokio` RwLock.

pub mod error;
pub mod snapshot;

pub use error::StoreError;
pub use snapshot::SnapshotStore;
