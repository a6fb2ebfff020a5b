use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::evaluation::EvaluationResult;
use super::hospital::{RankedHospital, Specialty};
use super::severity::SeverityVerdict;

/// Hospital recommendation for one patient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RecommendationResult {
    pub evaluation: EvaluationResult,
    /// `None` when no transfer was needed or when the search had to be
    /// broadened to every hospital with free beds.
    pub cluster_used: Option<u32>,
    pub cluster_specialties: Vec<Specialty>,
    pub ranked_hospitals: Vec<RankedHospital>,
    /// Candidates before truncation to top-N.
    pub total_candidates: usize,
    pub message: String,
    /// Repository failure that forced a broader search.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository_error: Option<String>,
}

impl RecommendationResult {
    pub fn verdict(&self) -> &SeverityVerdict {
        &self.evaluation.verdict
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SystemStats {
    pub total_hospitals: usize,
    pub available_hospitals: usize,
    pub active_clusters: usize,
    pub image_classifier_loaded: bool,
}
