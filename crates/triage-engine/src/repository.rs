use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

use triage_core::models::cluster::HospitalCapabilityCluster;
use triage_core::models::hospital::HospitalRecord;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("repository unavailable: {0}")]
    Unavailable(String),

    #[error("query failed: {0}")]
    Query(String),
}

/// Source of the capability clusters produced by the offline clusterer.
///
/// Methods return boxed futures for dyn compatibility.
pub trait ClusterRepository: Send + Sync {
    fn get_all_clusters(
        &self,
    ) -> BoxFuture<'_, Result<BTreeMap<u32, HospitalCapabilityCluster>, RepositoryError>>;
}

/// Read access to hospital snapshots. A hospital has capacity when
/// `current < max`.
pub trait HospitalRepository: Send + Sync {
    fn find_by_cluster(
        &self,
        cluster_id: u32,
        only_with_capacity: bool,
    ) -> BoxFuture<'_, Result<Vec<HospitalRecord>, RepositoryError>>;

    fn find_with_capacity(&self) -> BoxFuture<'_, Result<Vec<HospitalRecord>, RepositoryError>>;

    fn find_all(&self) -> BoxFuture<'_, Result<Vec<HospitalRecord>, RepositoryError>>;
}
