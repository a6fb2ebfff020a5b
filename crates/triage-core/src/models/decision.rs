use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use super::recommendation::RecommendationResult;
use super::severity::SeverityLevel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum CareType {
    OnSite,
    Transfer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DecisionHospital {
    pub id: String,
    pub name: String,
    pub distance_km: f64,
}

/// The care decision derived from a recommendation, suitable for handing to
/// a dispatch system. The engine itself does not store it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Decision {
    pub id: Uuid,
    pub care_type: CareType,
    pub severity: SeverityLevel,
    pub hospital: Option<DecisionHospital>,
    pub reason: String,
    pub decided_at: jiff::Timestamp,
}

impl Decision {
    /// The nearest ranked hospital is the destination. A transfer with no
    /// candidates still records `Transfer` with no hospital.
    pub fn from_recommendation(result: &RecommendationResult) -> Self {
        let care_type = if result.evaluation.requires_transfer {
            CareType::Transfer
        } else {
            CareType::OnSite
        };
        let hospital = result.ranked_hospitals.first().map(|h| DecisionHospital {
            id: h.hospital.id.clone(),
            name: h.hospital.name.clone(),
            distance_km: h.distance_km,
        });

        Self {
            id: Uuid::new_v4(),
            care_type,
            severity: result.evaluation.verdict.level,
            hospital,
            reason: result.message.clone(),
            decided_at: jiff::Timestamp::now(),
        }
    }
}
