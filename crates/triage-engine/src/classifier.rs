//! Severity classifier seams.
//!
//! Models are trained and loaded elsewhere; the engine only calls `predict`
//! on handles that are already in memory. Implementations must be safe to
//! share across threads.

use thiserror::Error;

use triage_core::models::image::ImagePayload;
use triage_core::models::severity::{ClassProbabilities, SeverityLevel, SeverityVerdict};
use triage_core::models::vitals::VitalsRecord;

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("model not loaded: {0}")]
    NotLoaded(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("inference failed: {0}")]
    Inference(String),

    #[error("unknown class label: {0}")]
    UnknownLabel(String),

    #[error("probabilities do not form a distribution (sum {0})")]
    InvalidDistribution(f64),
}

/// Raw classifier output: the predicted class and the per-class scores.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub level: SeverityLevel,
    pub probabilities: ClassProbabilities,
}

impl Prediction {
    pub fn new(level: SeverityLevel, probabilities: ClassProbabilities) -> Self {
        Self {
            level,
            probabilities,
        }
    }

    /// Build a prediction from string class labels, as emitted by models
    /// trained on the legacy data set. Accented and unaccented labels map to
    /// the same level.
    pub fn from_labels<'a>(
        label: &str,
        scores: impl IntoIterator<Item = (&'a str, f64)>,
    ) -> Result<Self, ClassifierError> {
        let level = parse_label(label)?;
        let pairs = scores
            .into_iter()
            .map(|(l, p)| parse_label(l).map(|level| (level, p)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(level, ClassProbabilities::from_pairs(pairs)))
    }

    pub fn ensure_normalized(self) -> Result<Self, ClassifierError> {
        if self.probabilities.is_normalized() {
            Ok(self)
        } else {
            Err(ClassifierError::InvalidDistribution(self.probabilities.sum()))
        }
    }

    pub fn into_verdict(self) -> SeverityVerdict {
        SeverityVerdict::new(self.level, self.probabilities)
    }
}

fn parse_label(label: &str) -> Result<SeverityLevel, ClassifierError> {
    SeverityLevel::from_label(label).ok_or_else(|| ClassifierError::UnknownLabel(label.to_string()))
}

/// Tabular classifier over patient vitals. Mandatory.
pub trait VitalsClassifier: Send + Sync {
    fn predict(&self, vitals: &VitalsRecord) -> Result<Prediction, ClassifierError>;
}

/// Classifier over a wound or burn photograph. Optional; failures are
/// recovered by the orchestrator.
pub trait ImageClassifier: Send + Sync {
    fn predict(&self, image: &ImagePayload) -> Result<Prediction, ClassifierError>;
}
