//! Request-scoped decision flow.
//!
//! ```text
//! Start → VitalsEvaluated → [ImageEvaluated] → Fused → TransferDecision
//!       → [ClusterSelected → HospitalsFetched → Ranked] → Done
//! ```
//!
//! Severity evaluation failures are hard errors. Everything after the
//! transfer decision degrades instead: an empty, failed or timed-out cluster
//! query broadens the search to every hospital with free beds and reports
//! `cluster_used = None`.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use triage_core::models::cluster::{ClusterSummary, HospitalCapabilityCluster};
use triage_core::models::decision::Decision;
use triage_core::models::evaluation::{EvaluationMethod, EvaluationResult};
use triage_core::models::hospital::{HospitalRecord, Location, Specialty};
use triage_core::models::image::ImagePayload;
use triage_core::models::recommendation::{RecommendationResult, SystemStats};
use triage_core::models::severity::SeverityVerdict;
use triage_core::models::vitals::VitalsRecord;

use crate::audit::DecisionEvent;
use crate::classifier::{ImageClassifier, VitalsClassifier};
use crate::cluster::{cluster_specialties, select_cluster};
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::fusion::fuse;
use crate::rank::rank;
use crate::repository::{BoxFuture, ClusterRepository, HospitalRepository, RepositoryError};

pub const ON_SITE_MESSAGE: &str = "low/medium severity; on-site care recommended";

/// Collects collaborators and loads the cluster snapshot.
#[derive(Default)]
pub struct OrchestratorBuilder {
    vitals: Option<Arc<dyn VitalsClassifier>>,
    image: Option<Arc<dyn ImageClassifier>>,
    clusters: Option<Arc<dyn ClusterRepository>>,
    hospitals: Option<Arc<dyn HospitalRepository>>,
    config: EngineConfig,
}

impl OrchestratorBuilder {
    pub fn vitals_classifier(mut self, classifier: Arc<dyn VitalsClassifier>) -> Self {
        self.vitals = Some(classifier);
        self
    }

    pub fn image_classifier(mut self, classifier: Arc<dyn ImageClassifier>) -> Self {
        self.image = Some(classifier);
        self
    }

    /// Set the image classifier only if the deployment has one.
    pub fn maybe_image_classifier(mut self, classifier: Option<Arc<dyn ImageClassifier>>) -> Self {
        self.image = classifier;
        self
    }

    pub fn cluster_repository(mut self, repository: Arc<dyn ClusterRepository>) -> Self {
        self.clusters = Some(repository);
        self
    }

    pub fn hospital_repository(mut self, repository: Arc<dyn HospitalRepository>) -> Self {
        self.hospitals = Some(repository);
        self
    }

    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Validate collaborators and load the cluster snapshot once.
    pub async fn build(self) -> Result<DecisionOrchestrator, EngineError> {
        self.config.validate()?;

        let vitals = self
            .vitals
            .ok_or(EngineError::MissingCollaborator("vitals classifier"))?;
        let cluster_repository = self
            .clusters
            .ok_or(EngineError::MissingCollaborator("cluster repository"))?;
        let hospitals = self
            .hospitals
            .ok_or(EngineError::MissingCollaborator("hospital repository"))?;

        let timeout = self.config.repository_timeout();
        let clusters = match tokio::time::timeout(timeout, cluster_repository.get_all_clusters()).await
        {
            Ok(Ok(clusters)) => clusters,
            Ok(Err(e)) => return Err(EngineError::ClusterLoad(e.to_string())),
            Err(_) => {
                return Err(EngineError::ClusterLoad(format!(
                    "timed out after {timeout:?}"
                )));
            }
        };

        info!(
            clusters = clusters.len(),
            image_classifier = self.image.is_some(),
            "decision orchestrator ready"
        );

        Ok(DecisionOrchestrator {
            vitals,
            image: self.image,
            hospitals,
            clusters: Arc::new(clusters),
            config: self.config,
        })
    }
}

/// Façade over the classifiers, the cluster snapshot and the hospital
/// repository. Holds no per-request state; share it behind an `Arc`.
pub struct DecisionOrchestrator {
    vitals: Arc<dyn VitalsClassifier>,
    image: Option<Arc<dyn ImageClassifier>>,
    hospitals: Arc<dyn HospitalRepository>,
    clusters: Arc<BTreeMap<u32, HospitalCapabilityCluster>>,
    config: EngineConfig,
}

impl DecisionOrchestrator {
    pub fn builder() -> OrchestratorBuilder {
        OrchestratorBuilder::default()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn has_image_classifier(&self) -> bool {
        self.image.is_some()
    }

    pub fn clusters(&self) -> &BTreeMap<u32, HospitalCapabilityCluster> {
        &self.clusters
    }

    /// Severity from vitals alone. Never touches hospitals or images.
    pub fn evaluate(&self, vitals: &VitalsRecord) -> Result<EvaluationResult, EngineError> {
        let verdict = self.evaluate_vitals(vitals)?;
        Ok(EvaluationResult::vitals_only(verdict, vitals.incident_type.clone()))
    }

    /// Severity from vitals, fused with the image verdict when an image is
    /// supplied and an image classifier is loaded. Image failures fall back
    /// to the vitals-only verdict and are reported in `image_error`.
    pub fn evaluate_with_image(
        &self,
        vitals: &VitalsRecord,
        image: Option<&ImagePayload>,
    ) -> Result<EvaluationResult, EngineError> {
        let vitals_verdict = self.evaluate_vitals(vitals)?;
        let mut result = EvaluationResult::vitals_only(vitals_verdict, vitals.incident_type.clone());

        let image = image.filter(|i| !i.is_empty());
        let (Some(image), Some(classifier)) = (image, self.image.as_ref()) else {
            debug!(
                image_supplied = image.is_some(),
                image_classifier = self.image.is_some(),
                "vitals-only evaluation"
            );
            return Ok(result);
        };

        match classifier.predict(image).and_then(|p| p.ensure_normalized()) {
            Ok(prediction) => {
                let image_verdict = prediction.into_verdict();
                let fused = fuse(
                    &vitals_verdict,
                    self.config.vitals_weight,
                    &image_verdict,
                    self.config.image_weight,
                );
                debug!(
                    vitals = %vitals_verdict.level,
                    image = %image_verdict.level,
                    fused = %fused.level,
                    "hybrid evaluation"
                );
                result.verdict = fused;
                result.requires_transfer = fused.requires_transfer();
                result.method = EvaluationMethod::Hybrid;
                result.image_verdict = Some(image_verdict);
            }
            Err(e) => {
                warn!(error = %e, "image classifier failed, using vitals-only verdict");
                result.image_error = Some(e.to_string());
            }
        }

        Ok(result)
    }

    /// Evaluate the patient and, if a transfer is needed, rank hospitals near
    /// `location`. `top_n` defaults to the configured count.
    pub async fn recommend(
        &self,
        vitals: &VitalsRecord,
        image: Option<&ImagePayload>,
        location: &Location,
        top_n: Option<usize>,
    ) -> Result<RecommendationResult, EngineError> {
        let evaluation = self.evaluate_with_image(vitals, image)?;

        if !evaluation.requires_transfer {
            debug!(severity = %evaluation.verdict.level, "no transfer required");
            let result = RecommendationResult {
                evaluation,
                cluster_used: None,
                cluster_specialties: Vec::new(),
                ranked_hospitals: Vec::new(),
                total_candidates: 0,
                message: ON_SITE_MESSAGE.to_string(),
                repository_error: None,
            };
            DecisionEvent::from(&Decision::from_recommendation(&result)).emit();
            return Ok(result);
        }

        let target = select_cluster(&evaluation.incident_type, &self.clusters);
        let specialties = cluster_specialties(target, &self.clusters);
        let candidates = self.fetch_candidates(target).await;

        let top_n = top_n.unwrap_or(self.config.default_top_n);
        let ranking = rank(candidates.hospitals, location, top_n);

        info!(
            severity = %evaluation.verdict.level,
            target_cluster = target,
            cluster_used = ?candidates.cluster_used,
            candidates = ranking.total_candidates,
            returned = ranking.hospitals.len(),
            "hospitals ranked"
        );

        let result = RecommendationResult {
            evaluation,
            cluster_used: candidates.cluster_used,
            cluster_specialties: specialties,
            message: format!("found {} suitable hospitals", ranking.hospitals.len()),
            ranked_hospitals: ranking.hospitals,
            total_candidates: ranking.total_candidates,
            repository_error: candidates.error,
        };
        DecisionEvent::from(&Decision::from_recommendation(&result)).emit();
        Ok(result)
    }

    /// Every cluster in ascending id order.
    pub fn clusters_overview(&self) -> Vec<ClusterSummary> {
        self.clusters.values().map(ClusterSummary::from).collect()
    }

    pub async fn system_stats(&self) -> Result<SystemStats, EngineError> {
        let all = self.bounded(self.hospitals.find_all()).await?;
        let available = self.bounded(self.hospitals.find_with_capacity()).await?;
        Ok(SystemStats {
            total_hospitals: all.len(),
            available_hospitals: available.len(),
            active_clusters: self.clusters.len(),
            image_classifier_loaded: self.image.is_some(),
        })
    }

    pub async fn hospitals_with_specialty(
        &self,
        specialty: Specialty,
    ) -> Result<Vec<HospitalRecord>, EngineError> {
        let all = self.bounded(self.hospitals.find_all()).await?;
        Ok(all.into_iter().filter(|h| h.has_specialty(specialty)).collect())
    }

    fn evaluate_vitals(&self, vitals: &VitalsRecord) -> Result<SeverityVerdict, EngineError> {
        vitals.validate().map_err(EngineError::InvalidVitals)?;
        let prediction = self.vitals.predict(vitals)?.ensure_normalized()?;
        let verdict = prediction.into_verdict();
        debug!(
            severity = %verdict.level,
            confidence = verdict.confidence,
            "vitals evaluated"
        );
        Ok(verdict)
    }

    /// Hospitals with free beds in the target cluster, else every hospital
    /// with free beds.
    async fn fetch_candidates(&self, target: u32) -> Candidates {
        let cluster_error = match self.bounded(self.hospitals.find_by_cluster(target, true)).await {
            Ok(hospitals) if !hospitals.is_empty() => {
                return Candidates {
                    hospitals,
                    cluster_used: Some(target),
                    error: None,
                };
            }
            Ok(_) => {
                debug!(cluster = target, "no hospitals with capacity in cluster, broadening search");
                None
            }
            Err(e) => {
                warn!(cluster = target, error = %e, "cluster query failed, broadening search");
                Some(e.to_string())
            }
        };

        match self.bounded(self.hospitals.find_with_capacity()).await {
            Ok(hospitals) => Candidates {
                hospitals,
                cluster_used: None,
                error: cluster_error,
            },
            Err(e) => {
                warn!(error = %e, "system-wide capacity query failed, no candidates");
                let error = match cluster_error {
                    Some(first) => format!("{first}; {e}"),
                    None => e.to_string(),
                };
                Candidates {
                    hospitals: Vec::new(),
                    cluster_used: None,
                    error: Some(error),
                }
            }
        }
    }

    async fn bounded<T>(
        &self,
        call: BoxFuture<'_, Result<T, RepositoryError>>,
    ) -> Result<T, EngineError> {
        let timeout = self.config.repository_timeout();
        match tokio::time::timeout(timeout, call).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(EngineError::Timeout(timeout)),
        }
    }
}

struct Candidates {
    hospitals: Vec<HospitalRecord>,
    cluster_used: Option<u32>,
    error: Option<String>,
}
