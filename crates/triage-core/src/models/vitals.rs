use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Sex {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
}

/// Incident category reported by the dispatcher (e.g. `problema_cardiaco`).
///
/// Values outside [`IncidentType::KNOWN`] are accepted; they are treated as
/// general emergencies downstream.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct IncidentType(String);

impl IncidentType {
    pub const KNOWN: [&'static str; 10] = [
        "problema_cardiaco",
        "problema_respiratorio",
        "quemadura",
        "fractura",
        "alergia_severa",
        "dolor_abdominal",
        "caida",
        "herida_punzante",
        "accidente_auto",
        "intoxicacion",
    ];

    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_known(&self) -> bool {
        Self::KNOWN.contains(&self.0.as_str())
    }
}

impl From<&str> for IncidentType {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for IncidentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Patient vitals captured at the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct VitalsRecord {
    pub age: u32,
    pub sex: Sex,
    /// mmHg
    pub systolic_pressure: f64,
    /// mmHg
    pub diastolic_pressure: f64,
    /// Beats per minute.
    pub heart_rate: u32,
    /// Breaths per minute.
    pub respiratory_rate: u32,
    /// Degrees Celsius.
    pub temperature: f64,
    /// Percent.
    pub oxygen_saturation: f64,
    /// 0–10.
    pub pain_level: u8,
    pub incident_type: IncidentType,
    pub minutes_since_incident: u32,
}

impl VitalsRecord {
    pub const REQUIRED_FIELDS: [&'static str; 11] = [
        "age",
        "sex",
        "systolic_pressure",
        "diastolic_pressure",
        "heart_rate",
        "respiratory_rate",
        "temperature",
        "oxygen_saturation",
        "pain_level",
        "incident_type",
        "minutes_since_incident",
    ];

    /// Parse a raw JSON payload, reporting every missing field at once.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, CoreError> {
        let obj = value.as_object().ok_or_else(|| CoreError::InvalidField {
            field: "vitals".to_string(),
            reason: "expected a JSON object".to_string(),
        })?;

        let missing: Vec<&str> = Self::REQUIRED_FIELDS
            .iter()
            .copied()
            .filter(|field| obj.get(*field).is_none_or(|v| v.is_null()))
            .collect();
        if !missing.is_empty() {
            return Err(CoreError::MissingField(missing.join(", ")));
        }

        Ok(serde_json::from_value(value.clone())?)
    }

    /// Range checks the type system cannot express.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.pain_level > 10 {
            return Err(invalid("pain_level", format!("{} is outside 0-10", self.pain_level)));
        }
        if !(0.0..=100.0).contains(&self.oxygen_saturation) {
            return Err(invalid(
                "oxygen_saturation",
                format!("{} is outside 0-100", self.oxygen_saturation),
            ));
        }
        for (field, value) in [
            ("systolic_pressure", self.systolic_pressure),
            ("diastolic_pressure", self.diastolic_pressure),
            ("temperature", self.temperature),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(invalid(field, format!("{value} must be a positive number")));
            }
        }
        Ok(())
    }
}

fn invalid(field: &str, reason: String) -> CoreError {
    CoreError::InvalidField {
        field: field.to_string(),
        reason,
    }
}
