use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Tolerance used when checking that a distribution sums to one.
pub const PROBABILITY_TOLERANCE: f64 = 1e-6;

/// Urgency of an emergency.
///
/// Ordered `Critical > High > Medium > Low`. The legacy data-set labels
/// (`critico`, `crítico`, `alto`, `medio`, `bajo`) are accepted on input
/// but never produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum SeverityLevel {
    #[serde(alias = "critico", alias = "crítico")]
    Critical,
    #[serde(alias = "alto")]
    High,
    #[serde(alias = "medio")]
    Medium,
    #[serde(alias = "bajo")]
    Low,
}

impl SeverityLevel {
    /// Vocabulary order. Ties during argmax resolve to the earliest entry.
    pub const ALL: [SeverityLevel; 4] = [
        SeverityLevel::Critical,
        SeverityLevel::High,
        SeverityLevel::Medium,
        SeverityLevel::Low,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SeverityLevel::Critical => "critical",
            SeverityLevel::High => "high",
            SeverityLevel::Medium => "medium",
            SeverityLevel::Low => "low",
        }
    }

    /// Parse a class label emitted by a classifier, in either the canonical
    /// or the legacy vocabulary.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "critical" | "critico" | "crítico" => Some(SeverityLevel::Critical),
            "high" | "alto" => Some(SeverityLevel::High),
            "medium" | "medio" => Some(SeverityLevel::Medium),
            "low" | "bajo" => Some(SeverityLevel::Low),
            _ => None,
        }
    }

    /// Critical and high severities mandate moving the patient to a hospital.
    pub fn requires_transfer(self) -> bool {
        matches!(self, SeverityLevel::Critical | SeverityLevel::High)
    }

    fn rank(self) -> u8 {
        match self {
            SeverityLevel::Critical => 3,
            SeverityLevel::High => 2,
            SeverityLevel::Medium => 1,
            SeverityLevel::Low => 0,
        }
    }
}

impl PartialOrd for SeverityLevel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SeverityLevel {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl fmt::Display for SeverityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Probability per severity level. Missing entries deserialize as 0.0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ClassProbabilities {
    #[serde(default)]
    pub critical: f64,
    #[serde(default)]
    pub high: f64,
    #[serde(default)]
    pub medium: f64,
    #[serde(default)]
    pub low: f64,
}

impl ClassProbabilities {
    pub fn new(critical: f64, high: f64, medium: f64, low: f64) -> Self {
        Self {
            critical,
            high,
            medium,
            low,
        }
    }

    /// All mass on a single level.
    pub fn certain(level: SeverityLevel) -> Self {
        let mut probs = Self::default();
        *probs.slot_mut(level) = 1.0;
        probs
    }

    /// Build from `(level, probability)` pairs. Repeated levels accumulate.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (SeverityLevel, f64)>) -> Self {
        let mut probs = Self::default();
        for (level, p) in pairs {
            *probs.slot_mut(level) += p;
        }
        probs
    }

    pub fn get(&self, level: SeverityLevel) -> f64 {
        match level {
            SeverityLevel::Critical => self.critical,
            SeverityLevel::High => self.high,
            SeverityLevel::Medium => self.medium,
            SeverityLevel::Low => self.low,
        }
    }

    fn slot_mut(&mut self, level: SeverityLevel) -> &mut f64 {
        match level {
            SeverityLevel::Critical => &mut self.critical,
            SeverityLevel::High => &mut self.high,
            SeverityLevel::Medium => &mut self.medium,
            SeverityLevel::Low => &mut self.low,
        }
    }

    /// Entries in vocabulary order.
    pub fn iter(&self) -> impl Iterator<Item = (SeverityLevel, f64)> + '_ {
        SeverityLevel::ALL.into_iter().map(|level| (level, self.get(level)))
    }

    /// Most probable level; the first maximum in vocabulary order wins.
    pub fn argmax(&self) -> SeverityLevel {
        let mut best = SeverityLevel::Critical;
        let mut best_p = self.critical;
        for (level, p) in self.iter().skip(1) {
            if p > best_p {
                best = level;
                best_p = p;
            }
        }
        best
    }

    pub fn max(&self) -> f64 {
        self.get(self.argmax())
    }

    pub fn sum(&self) -> f64 {
        self.critical + self.high + self.medium + self.low
    }

    /// Every entry lies in [0, 1] and the entries sum to one.
    pub fn is_normalized(&self) -> bool {
        let in_range = self
            .iter()
            .all(|(_, p)| (-PROBABILITY_TOLERANCE..=1.0 + PROBABILITY_TOLERANCE).contains(&p));
        in_range && (self.sum() - 1.0).abs() <= PROBABILITY_TOLERANCE
    }
}

/// A classified severity plus its distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SeverityVerdict {
    pub level: SeverityLevel,
    pub probabilities: ClassProbabilities,
    /// Highest probability in the distribution.
    pub confidence: f64,
}

impl SeverityVerdict {
    /// Verdict for a level chosen by a classifier.
    pub fn new(level: SeverityLevel, probabilities: ClassProbabilities) -> Self {
        Self {
            level,
            probabilities,
            confidence: probabilities.max(),
        }
    }

    /// Verdict whose level is the argmax of the distribution.
    pub fn from_probabilities(probabilities: ClassProbabilities) -> Self {
        Self::new(probabilities.argmax(), probabilities)
    }

    pub fn requires_transfer(&self) -> bool {
        self.level.requires_transfer()
    }
}
