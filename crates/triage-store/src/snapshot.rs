use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info, warn};

use triage_core::models::cluster::HospitalCapabilityCluster;
use triage_core::models::hospital::HospitalRecord;
use triage_engine::repository::{BoxFuture, ClusterRepository, HospitalRepository, RepositoryError};

use crate::error::StoreError;

pub const HOSPITALS_FILE: &str = "hospitals.json";
pub const CLUSTERS_FILE: &str = "clusters.json";

/// Hospital and cluster snapshot shared by the decision engine and the
/// maintenance jobs that refresh capacity and cluster assignments.
///
/// The handle is opened and closed explicitly. Changes stay in memory until
/// [`SnapshotStore::close`], which writes modified files back atomically.
/// Every call after `close` fails with [`StoreError::Closed`].
pub struct SnapshotStore {
    dir: Option<PathBuf>,
    inner: RwLock<Snapshot>,
}

struct Snapshot {
    hospitals: Vec<HospitalRecord>,
    clusters: BTreeMap<u32, HospitalCapabilityCluster>,
    hospitals_dirty: bool,
    clusters_dirty: bool,
    closed: bool,
}

impl SnapshotStore {
    /// Load `hospitals.json` and, if present, `clusters.json` from `dir`.
    pub async fn open(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = dir.as_ref().to_path_buf();

        let hospitals_path = dir.join(HOSPITALS_FILE);
        let hospitals: Vec<HospitalRecord> = read_json(&hospitals_path)
            .await?
            .ok_or_else(|| StoreError::NotFound {
                path: hospitals_path.display().to_string(),
            })?;

        let clusters: Vec<HospitalCapabilityCluster> =
            match read_json(&dir.join(CLUSTERS_FILE)).await? {
                Some(clusters) => clusters,
                None => {
                    debug!(dir = %dir.display(), "no cluster snapshot, starting without clusters");
                    Vec::new()
                }
            };

        info!(
            dir = %dir.display(),
            hospitals = hospitals.len(),
            clusters = clusters.len(),
            "snapshot store opened"
        );
        Ok(Self::with_snapshot(Some(dir), hospitals, clusters))
    }

    /// A store with no backing files. `close` only marks it closed.
    pub fn in_memory(
        hospitals: Vec<HospitalRecord>,
        clusters: impl IntoIterator<Item = HospitalCapabilityCluster>,
    ) -> Self {
        Self::with_snapshot(None, hospitals, clusters)
    }

    fn with_snapshot(
        dir: Option<PathBuf>,
        hospitals: Vec<HospitalRecord>,
        clusters: impl IntoIterator<Item = HospitalCapabilityCluster>,
    ) -> Self {
        Self {
            dir,
            inner: RwLock::new(Snapshot {
                hospitals,
                clusters: clusters.into_iter().map(|c| (c.id, c)).collect(),
                hospitals_dirty: false,
                clusters_dirty: false,
                closed: false,
            }),
        }
    }

    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    /// Write modified snapshots back and release the handle.
    pub async fn close(&self) -> Result<(), StoreError> {
        let mut snapshot = self.write().await?;

        if let Some(dir) = &self.dir {
            if snapshot.hospitals_dirty {
                write_json_atomic(&dir.join(HOSPITALS_FILE), &snapshot.hospitals).await?;
                snapshot.hospitals_dirty = false;
            }
            if snapshot.clusters_dirty {
                let clusters: Vec<_> = snapshot.clusters.values().collect();
                write_json_atomic(&dir.join(CLUSTERS_FILE), &clusters).await?;
                snapshot.clusters_dirty = false;
            }
        } else if snapshot.hospitals_dirty || snapshot.clusters_dirty {
            debug!("in-memory store closed with unsaved changes");
        }

        snapshot.closed = true;
        info!("snapshot store closed");
        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<HospitalRecord>, StoreError> {
        let snapshot = self.read().await?;
        Ok(snapshot.hospitals.iter().find(|h| h.id == id).cloned())
    }

    /// Assign one hospital to a cluster. Returns false for an unknown id.
    pub async fn update_cluster(&self, id: &str, cluster: u32) -> Result<bool, StoreError> {
        let mut snapshot = self.write().await?;
        let Some(hospital) = snapshot.hospitals.iter_mut().find(|h| h.id == id) else {
            warn!(hospital = id, "cluster update for unknown hospital");
            return Ok(false);
        };
        hospital.cluster = Some(cluster);
        snapshot.hospitals_dirty = true;
        Ok(true)
    }

    /// Bulk cluster assignment keyed by hospital id. Returns the number of
    /// hospitals updated; unknown ids are skipped.
    pub async fn update_clusters(
        &self,
        assignments: &BTreeMap<String, u32>,
    ) -> Result<usize, StoreError> {
        let mut snapshot = self.write().await?;
        let updated = assign_clusters(&mut snapshot.hospitals, assignments);
        if updated > 0 {
            snapshot.hospitals_dirty = true;
        }
        debug!(
            requested = assignments.len(),
            updated, "cluster assignments applied"
        );
        Ok(updated)
    }

    /// Replace the cluster set after retraining. Member hospitals move to
    /// their new cluster and every other hospital becomes unassigned.
    /// Returns the number of hospitals whose assignment changed. A running
    /// orchestrator keeps the clusters it loaded at build.
    pub async fn replace_clusters(
        &self,
        clusters: Vec<HospitalCapabilityCluster>,
    ) -> Result<usize, StoreError> {
        let mut snapshot = self.write().await?;
        let assignments: BTreeMap<String, u32> = clusters
            .iter()
            .flat_map(|c| c.member_hospital_ids.iter().map(|id| (id.clone(), c.id)))
            .collect();
        let mut updated = 0;
        for hospital in snapshot.hospitals.iter_mut() {
            let cluster = assignments.get(&hospital.id).copied();
            if hospital.cluster != cluster {
                hospital.cluster = cluster;
                updated += 1;
            }
        }
        snapshot.clusters = clusters.into_iter().map(|c| (c.id, c)).collect();
        snapshot.clusters_dirty = true;
        snapshot.hospitals_dirty |= updated > 0;
        info!(
            clusters = snapshot.clusters.len(),
            hospitals = updated,
            "cluster set replaced"
        );
        Ok(updated)
    }

    /// Record a new bed count. Returns false for an unknown id.
    pub async fn update_capacity(&self, id: &str, current: u32) -> Result<bool, StoreError> {
        let mut snapshot = self.write().await?;
        let Some(hospital) = snapshot.hospitals.iter_mut().find(|h| h.id == id) else {
            warn!(hospital = id, "capacity update for unknown hospital");
            return Ok(false);
        };
        hospital.capacity.current = current;
        snapshot.hospitals_dirty = true;
        Ok(true)
    }

    /// Hospital count per cluster. Unassigned hospitals are counted under
    /// `None`.
    pub async fn count_by_cluster(&self) -> Result<BTreeMap<Option<u32>, usize>, StoreError> {
        let snapshot = self.read().await?;
        let mut counts = BTreeMap::new();
        for hospital in &snapshot.hospitals {
            *counts.entry(hospital.cluster).or_insert(0) += 1;
        }
        Ok(counts)
    }

    async fn read(&self) -> Result<RwLockReadGuard<'_, Snapshot>, StoreError> {
        let snapshot = self.inner.read().await;
        if snapshot.closed {
            return Err(StoreError::Closed);
        }
        Ok(snapshot)
    }

    async fn write(&self) -> Result<RwLockWriteGuard<'_, Snapshot>, StoreError> {
        let snapshot = self.inner.write().await;
        if snapshot.closed {
            return Err(StoreError::Closed);
        }
        Ok(snapshot)
    }

    async fn select(
        &self,
        keep: impl Fn(&HospitalRecord) -> bool,
    ) -> Result<Vec<HospitalRecord>, StoreError> {
        let snapshot = self.read().await?;
        Ok(snapshot.hospitals.iter().filter(|h| keep(h)).cloned().collect())
    }
}

impl ClusterRepository for SnapshotStore {
    fn get_all_clusters(
        &self,
    ) -> BoxFuture<'_, Result<BTreeMap<u32, HospitalCapabilityCluster>, RepositoryError>> {
        Box::pin(async move {
            let snapshot = self.read().await?;
            Ok(snapshot.clusters.clone())
        })
    }
}

impl HospitalRepository for SnapshotStore {
    fn find_by_cluster(
        &self,
        cluster_id: u32,
        only_with_capacity: bool,
    ) -> BoxFuture<'_, Result<Vec<HospitalRecord>, RepositoryError>> {
        Box::pin(async move {
            let found = self
                .select(|h| h.cluster == Some(cluster_id) && (!only_with_capacity || h.has_room()))
                .await?;
            Ok(found)
        })
    }

    fn find_with_capacity(&self) -> BoxFuture<'_, Result<Vec<HospitalRecord>, RepositoryError>> {
        Box::pin(async move { Ok(self.select(HospitalRecord::has_room).await?) })
    }

    fn find_all(&self) -> BoxFuture<'_, Result<Vec<HospitalRecord>, RepositoryError>> {
        Box::pin(async move { Ok(self.select(|_| true).await?) })
    }
}

fn assign_clusters(hospitals: &mut [HospitalRecord], assignments: &BTreeMap<String, u32>) -> usize {
    let mut updated = 0;
    for hospital in hospitals.iter_mut() {
        if let Some(&cluster) = assignments.get(&hospital.id) {
            hospital.cluster = Some(cluster);
            updated += 1;
        }
    }
    updated
}

/// `Ok(None)` when the file does not exist.
async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StoreError> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Atomic write: tmp + rename.
async fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StoreError> {
    let json = serde_json::to_vec_pretty(value)?;
    let tmp_path = path.with_extension("json.tmp");
    tokio::fs::write(&tmp_path, &json).await?;
    tokio::fs::rename(&tmp_path, path).await?;
    debug!(path = %path.display(), "snapshot flushed to disk");
    Ok(())
}
