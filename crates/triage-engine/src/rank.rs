use triage_core::models::hospital::{HospitalRecord, Location, RankedHospital};
use triage_core::numeric::round_to;

use crate::geo::distance_between;

/// Ranked hospitals plus the number of candidates before truncation, so a
/// caller can tell "5 of 5" from "5 of 40".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ranking {
    pub hospitals: Vec<RankedHospital>,
    pub total_candidates: usize,
}

/// Annotate each candidate with distance and availability, order nearest
/// first and keep the first `top_n`.
///
/// Candidates are expected to be filtered already. Availability is
/// informational only. The sort is stable, so hospitals at the same rounded
/// distance keep their input order. Unknown (NaN) distances sort last.
pub fn rank(hospitals: Vec<HospitalRecord>, origin: &Location, top_n: usize) -> Ranking {
    let total_candidates = hospitals.len();

    let mut ranked: Vec<RankedHospital> = hospitals
        .into_iter()
        .map(|hospital| RankedHospital {
            distance_km: round_to(distance_between(origin, &hospital.location), 2),
            availability_pct: round_to(hospital.capacity.availability_pct(), 1),
            hospital,
        })
        .collect();

    ranked.sort_by(|a, b| sort_key(a).total_cmp(&sort_key(b)));
    ranked.truncate(top_n);

    Ranking {
        hospitals: ranked,
        total_candidates,
    }
}

fn sort_key(hospital: &RankedHospital) -> f64 {
    if hospital.distance_km.is_nan() {
        f64::INFINITY
    } else {
        hospital.distance_km
    }
}
