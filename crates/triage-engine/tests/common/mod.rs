#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use triage_core::models::cluster::HospitalCapabilityCluster;
use triage_core::models::hospital::{Capacity, HospitalRecord, Location, Specialty};
use triage_core::models::image::ImagePayload;
use triage_core::models::severity::{ClassProbabilities, SeverityLevel};
use triage_core::models::vitals::{IncidentType, Sex, VitalsRecord};
use triage_engine::classifier::{ClassifierError, ImageClassifier, Prediction, VitalsClassifier};
use triage_engine::repository::{BoxFuture, ClusterRepository, HospitalRepository, RepositoryError};

pub const LIMA: Location = Location {
    latitude: -12.0464,
    longitude: -77.0428,
};

pub fn vitals(incident: &str) -> VitalsRecord {
    VitalsRecord {
        age: 65,
        sex: Sex::Male,
        systolic_pressure: 180.0,
        diastolic_pressure: 110.0,
        heart_rate: 120,
        respiratory_rate: 28,
        temperature: 38.5,
        oxygen_saturation: 88.0,
        pain_level: 9,
        incident_type: IncidentType::from(incident),
        minutes_since_incident: 15,
    }
}

pub fn prediction(level: SeverityLevel, probs: [f64; 4]) -> Prediction {
    Prediction::new(
        level,
        ClassProbabilities::new(probs[0], probs[1], probs[2], probs[3]),
    )
}

pub fn certain(level: SeverityLevel) -> Prediction {
    Prediction::new(level, ClassProbabilities::certain(level))
}

/// Vitals classifier that always returns the same prediction and counts calls.
pub struct FixedVitals {
    pub prediction: Prediction,
    pub calls: AtomicUsize,
}

impl FixedVitals {
    pub fn new(prediction: Prediction) -> Arc<Self> {
        Arc::new(Self {
            prediction,
            calls: AtomicUsize::new(0),
        })
    }
}

impl VitalsClassifier for FixedVitals {
    fn predict(&self, _vitals: &VitalsRecord) -> Result<Prediction, ClassifierError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.prediction)
    }
}

pub struct FixedImage(pub Prediction);

impl ImageClassifier for FixedImage {
    fn predict(&self, _image: &ImagePayload) -> Result<Prediction, ClassifierError> {
        Ok(self.0)
    }
}

pub struct FailingImage;

impl ImageClassifier for FailingImage {
    fn predict(&self, _image: &ImagePayload) -> Result<Prediction, ClassifierError> {
        Err(ClassifierError::InvalidInput("cannot decode image".to_string()))
    }
}

pub fn cluster(id: u32, specialties: &[Specialty], members: &[&str]) -> HospitalCapabilityCluster {
    HospitalCapabilityCluster {
        id,
        dominant_specialties: specialties.to_vec(),
        member_hospital_ids: members.iter().map(|m| m.to_string()).collect::<BTreeSet<_>>(),
    }
}

pub fn standard_clusters() -> BTreeMap<u32, HospitalCapabilityCluster> {
    [
        cluster(0, &[Specialty::Trauma, Specialty::Orthopedics], &["H001", "H005"]),
        cluster(1, &[Specialty::Pediatrics, Specialty::General], &["H002"]),
        cluster(2, &[Specialty::Cardiology, Specialty::Neurology], &["H003", "H004"]),
        cluster(
            3,
            &[Specialty::Burns, Specialty::General, Specialty::Trauma],
            &["H006"],
        ),
    ]
    .into_iter()
    .map(|c| (c.id, c))
    .collect()
}

/// Hospital north of Lima at roughly `km_north` kilometres.
pub fn hospital(id: &str, cluster: Option<u32>, km_north: f64, current: u32, max: u32) -> HospitalRecord {
    HospitalRecord {
        id: id.to_string(),
        name: format!("Hospital {id}"),
        location: Location::new(LIMA.latitude + km_north / 111.195, LIMA.longitude),
        capacity: Capacity { current, max },
        level: "III-1".to_string(),
        specialties: BTreeMap::from([(Specialty::Cardiology, true), (Specialty::Trauma, false)]),
        cluster,
        metrics: None,
    }
}

pub struct StaticClusters(pub BTreeMap<u32, HospitalCapabilityCluster>);

impl ClusterRepository for StaticClusters {
    fn get_all_clusters(
        &self,
    ) -> BoxFuture<'_, Result<BTreeMap<u32, HospitalCapabilityCluster>, RepositoryError>> {
        let clusters = self.0.clone();
        Box::pin(async move { Ok(clusters) })
    }
}

pub struct BrokenClusters;

impl ClusterRepository for BrokenClusters {
    fn get_all_clusters(
        &self,
    ) -> BoxFuture<'_, Result<BTreeMap<u32, HospitalCapabilityCluster>, RepositoryError>> {
        Box::pin(async { Err(RepositoryError::Unavailable("model file missing".to_string())) })
    }
}

/// In-memory hospital list with the repository's capacity predicate.
pub struct StaticHospitals {
    pub hospitals: Vec<HospitalRecord>,
    pub cluster_queries: AtomicUsize,
}

impl StaticHospitals {
    pub fn new(hospitals: Vec<HospitalRecord>) -> Arc<Self> {
        Arc::new(Self {
            hospitals,
            cluster_queries: AtomicUsize::new(0),
        })
    }
}

impl HospitalRepository for StaticHospitals {
    fn find_by_cluster(
        &self,
        cluster_id: u32,
        only_with_capacity: bool,
    ) -> BoxFuture<'_, Result<Vec<HospitalRecord>, RepositoryError>> {
        self.cluster_queries.fetch_add(1, Ordering::SeqCst);
        let found = self
            .hospitals
            .iter()
            .filter(|h| h.cluster == Some(cluster_id))
            .filter(|h| !only_with_capacity || h.has_room())
            .cloned()
            .collect();
        Box::pin(async move { Ok(found) })
    }

    fn find_with_capacity(&self) -> BoxFuture<'_, Result<Vec<HospitalRecord>, RepositoryError>> {
        let found = self.hospitals.iter().filter(|h| h.has_room()).cloned().collect();
        Box::pin(async move { Ok(found) })
    }

    fn find_all(&self) -> BoxFuture<'_, Result<Vec<HospitalRecord>, RepositoryError>> {
        let found = self.hospitals.clone();
        Box::pin(async move { Ok(found) })
    }
}

/// Cluster queries either fail or hang; system-wide queries answer.
pub struct FlakyHospitals {
    pub hospitals: Vec<HospitalRecord>,
    pub hang: bool,
}

impl HospitalRepository for FlakyHospitals {
    fn find_by_cluster(
        &self,
        _cluster_id: u32,
        _only_with_capacity: bool,
    ) -> BoxFuture<'_, Result<Vec<HospitalRecord>, RepositoryError>> {
        let hang = self.hang;
        Box::pin(async move {
            if hang {
                tokio::time::sleep(Duration::from_secs(30)).await;
            }
            Err(RepositoryError::Query("connection reset".to_string()))
        })
    }

    fn find_with_capacity(&self) -> BoxFuture<'_, Result<Vec<HospitalRecord>, RepositoryError>> {
        let found = self.hospitals.iter().filter(|h| h.has_room()).cloned().collect();
        Box::pin(async move { Ok(found) })
    }

    fn find_all(&self) -> BoxFuture<'_, Result<Vec<HospitalRecord>, RepositoryError>> {
        let found = self.hospitals.clone();
        Box::pin(async move { Ok(found) })
    }
}

/// Every query fails.
pub struct DownHospitals;

impl HospitalRepository for DownHospitals {
    fn find_by_cluster(
        &self,
        _cluster_id: u32,
        _only_with_capacity: bool,
    ) -> BoxFuture<'_, Result<Vec<HospitalRecord>, RepositoryError>> {
        Box::pin(async { Err(RepositoryError::Unavailable("cluster query".to_string())) })
    }

    fn find_with_capacity(&self) -> BoxFuture<'_, Result<Vec<HospitalRecord>, RepositoryError>> {
        Box::pin(async { Err(RepositoryError::Unavailable("capacity query".to_string())) })
    }

    fn find_all(&self) -> BoxFuture<'_, Result<Vec<HospitalRecord>, RepositoryError>> {
        Box::pin(async { Err(RepositoryError::Unavailable("full scan".to_string())) })
    }
}
