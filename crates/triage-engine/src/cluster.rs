//! Capability cluster selection.
//!
//! Each incident type needs one specialty. Among the clusters that list that
//! specialty, broader clusters score higher and a cluster whose primary
//! specialty is the one needed gets a large bonus. Clusters are visited in
//! ascending id order and only a strictly higher score replaces the current
//! best, so equal scores resolve to the lowest id.

use std::collections::BTreeMap;

use triage_core::models::cluster::HospitalCapabilityCluster;
use triage_core::models::hospital::Specialty;
use triage_core::models::vitals::IncidentType;

/// Returned when no cluster offers the required specialty.
pub const FALLBACK_CLUSTER: u32 = 0;

pub const PRIMARY_SPECIALTY_BONUS: usize = 10;

/// Specialty needed to treat an incident. Unknown incidents are general.
pub fn required_specialty(incident: &IncidentType) -> Specialty {
    match incident.as_str() {
        "problema_cardiaco" => Specialty::Cardiology,
        "quemadura" => Specialty::Burns,
        "fractura" | "caida" => Specialty::Orthopedics,
        "herida_punzante" | "accidente_auto" => Specialty::Trauma,
        "intoxicacion" => Specialty::Toxicology,
        _ => Specialty::General,
    }
}

fn score(cluster: &HospitalCapabilityCluster, specialty: Specialty) -> Option<usize> {
    if !cluster.offers(specialty) {
        return None;
    }
    let mut score = cluster.dominant_specialties.len();
    if cluster.primary_specialty() == Some(specialty) {
        score += PRIMARY_SPECIALTY_BONUS;
    }
    Some(score)
}

/// Pick the cluster best suited to an incident. Never fails: falls back to
/// [`FALLBACK_CLUSTER`] when nothing matches.
pub fn select_cluster(
    incident: &IncidentType,
    clusters: &BTreeMap<u32, HospitalCapabilityCluster>,
) -> u32 {
    let specialty = required_specialty(incident);

    let mut best = FALLBACK_CLUSTER;
    let mut best_score = 0;
    for (id, cluster) in clusters {
        if let Some(s) = score(cluster, specialty)
            && s > best_score
        {
            best = *id;
            best_score = s;
        }
    }

    tracing::debug!(
        incident = %incident,
        specialty = %specialty,
        cluster = best,
        score = best_score,
        "cluster selected"
    );
    best
}

/// Dominant specialties of a cluster, or an empty list for an unknown id.
pub fn cluster_specialties(
    cluster_id: u32,
    clusters: &BTreeMap<u32, HospitalCapabilityCluster>,
) -> Vec<Specialty> {
    clusters
        .get(&cluster_id)
        .map(|c| c.dominant_specialties.clone())
        .unwrap_or_default()
}
