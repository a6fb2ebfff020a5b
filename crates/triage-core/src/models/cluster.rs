use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::hospital::Specialty;

/// A group of hospitals with a similar specialty profile, produced offline by
/// the unsupervised clusterer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct HospitalCapabilityCluster {
    pub id: u32,
    /// Most represented specialties, strongest first.
    pub dominant_specialties: Vec<Specialty>,
    #[serde(default)]
    pub member_hospital_ids: BTreeSet<String>,
}

impl HospitalCapabilityCluster {
    pub fn primary_specialty(&self) -> Option<Specialty> {
        self.dominant_specialties.first().copied()
    }

    pub fn offers(&self, specialty: Specialty) -> bool {
        self.dominant_specialties.contains(&specialty)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ClusterSummary {
    pub cluster_id: u32,
    pub hospital_count: usize,
    pub specialties: Vec<Specialty>,
    pub hospital_ids: Vec<String>,
}

impl From<&HospitalCapabilityCluster> for ClusterSummary {
    fn from(cluster: &HospitalCapabilityCluster) -> Self {
        Self {
            cluster_id: cluster.id,
            hospital_count: cluster.member_hospital_ids.len(),
            specialties: cluster.dominant_specialties.clone(),
            hospital_ids: cluster.member_hospital_ids.iter().cloned().collect(),
        }
    }
}
