use serde::Serialize;
use tracing::info;

use triage_core::models::decision::{CareType, Decision};

/// A structured record of a care decision, logged via `tracing` so it lands
/// next to the request logs. Nothing is persisted.
#[derive(Debug, Clone, Serialize)]
pub struct DecisionEvent {
    pub decision_id: String,
    pub care_type: CareType,
    pub severity: String,
    pub hospital_id: Option<String>,
    pub distance_km: Option<f64>,
    pub reason: String,
}

impl From<&Decision> for DecisionEvent {
    fn from(decision: &Decision) -> Self {
        Self {
            decision_id: decision.id.to_string(),
            care_type: decision.care_type,
            severity: decision.severity.to_string(),
            hospital_id: decision.hospital.as_ref().map(|h| h.id.clone()),
            distance_km: decision.hospital.as_ref().map(|h| h.distance_km),
            reason: decision.reason.clone(),
        }
    }
}

impl DecisionEvent {
    /// Emit this event via tracing.
    pub fn emit(&self) {
        info!(
            audit.decision_id = %self.decision_id,
            audit.care_type = ?self.care_type,
            audit.severity = %self.severity,
            audit.hospital_id = self.hospital_id.as_deref().unwrap_or("none"),
            audit.distance_km = self.distance_km,
            audit.reason = %self.reason,
            "decision event"
        );
    }
}
