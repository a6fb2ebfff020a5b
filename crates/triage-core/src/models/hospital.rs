use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Clinical specialty a hospital can offer. Serialized with the tags used by
/// the hospital data set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Specialty {
    #[serde(rename = "cardiologia")]
    Cardiology,
    #[serde(rename = "trauma")]
    Trauma,
    #[serde(rename = "pediatria")]
    Pediatrics,
    #[serde(rename = "ortopedia")]
    Orthopedics,
    #[serde(rename = "neurologia")]
    Neurology,
    #[serde(rename = "quemados")]
    Burns,
    #[serde(rename = "toxicologia")]
    Toxicology,
    #[serde(rename = "general")]
    General,
}

impl Specialty {
    pub const ALL: [Specialty; 8] = [
        Specialty::Cardiology,
        Specialty::Trauma,
        Specialty::Pediatrics,
        Specialty::Orthopedics,
        Specialty::Neurology,
        Specialty::Burns,
        Specialty::Toxicology,
        Specialty::General,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            Specialty::Cardiology => "cardiologia",
            Specialty::Trauma => "trauma",
            Specialty::Pediatrics => "pediatria",
            Specialty::Orthopedics => "ortopedia",
            Specialty::Neurology => "neurologia",
            Specialty::Burns => "quemados",
            Specialty::Toxicology => "toxicologia",
            Specialty::General => "general",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.tag() == tag)
    }
}

impl fmt::Display for Specialty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A point on Earth, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Bed occupancy. `current` may exceed `max` in source data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Capacity {
    pub current: u32,
    pub max: u32,
}

impl Capacity {
    pub fn has_room(&self) -> bool {
        self.current < self.max
    }

    /// Unused share of beds, in percent. Not clamped: an over-full hospital
    /// reports a negative value. A zero-bed hospital reports 0.
    pub fn availability_pct(&self) -> f64 {
        if self.max == 0 {
            return 0.0;
        }
        (f64::from(self.max) - f64::from(self.current)) / f64::from(self.max) * 100.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct HospitalMetrics {
    pub average_attention_minutes: f64,
    /// Fraction of successful outcomes, 0–1.
    pub success_rate: f64,
}

/// Snapshot of a hospital as held by the repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct HospitalRecord {
    pub id: String,
    pub name: String,
    pub location: Location,
    pub capacity: Capacity,
    /// Care level tag (e.g. "III-1").
    pub level: String,
    #[serde(default)]
    pub specialties: BTreeMap<Specialty, bool>,
    /// Capability cluster; `None` until the clusterer has assigned one.
    #[serde(default)]
    pub cluster: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<HospitalMetrics>,
}

impl HospitalRecord {
    pub fn has_specialty(&self, specialty: Specialty) -> bool {
        self.specialties.get(&specialty).copied().unwrap_or(false)
    }

    pub fn has_room(&self) -> bool {
        self.capacity.has_room()
    }
}

/// A hospital annotated for one patient location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RankedHospital {
    #[serde(flatten)]
    pub hospital: HospitalRecord,
    /// Great-circle distance from the patient, rounded to 2 decimals.
    pub distance_km: f64,
    /// Free beds in percent, rounded to 1 decimal.
    pub availability_pct: f64,
}
