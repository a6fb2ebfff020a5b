use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::severity::SeverityVerdict;
use super::vitals::IncidentType;
use crate::numeric::round_to;

/// Which classifiers contributed to the final verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum EvaluationMethod {
    VitalsOnly,
    Hybrid,
}

/// Outcome of a severity evaluation.
///
/// `verdict` is the final (possibly fused) verdict. The component verdicts
/// are kept so callers can check the fusion arithmetic themselves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct EvaluationResult {
    pub verdict: SeverityVerdict,
    pub requires_transfer: bool,
    pub incident_type: IncidentType,
    pub method: EvaluationMethod,
    pub vitals_verdict: SeverityVerdict,
    pub image_verdict: Option<SeverityVerdict>,
    /// Why an image that was supplied did not contribute.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_error: Option<String>,
}

impl EvaluationResult {
    pub fn vitals_only(vitals_verdict: SeverityVerdict, incident_type: IncidentType) -> Self {
        Self {
            verdict: vitals_verdict,
            requires_transfer: vitals_verdict.requires_transfer(),
            incident_type,
            method: EvaluationMethod::VitalsOnly,
            vitals_verdict,
            image_verdict: None,
            image_error: None,
        }
    }

    pub fn confidence(&self) -> f64 {
        self.verdict.confidence
    }

    /// Confidence as a percentage rounded to 2 decimals.
    pub fn confidence_pct(&self) -> f64 {
        round_to(self.verdict.confidence * 100.0, 2)
    }
}
