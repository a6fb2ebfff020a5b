use triage_core::models::severity::{ClassProbabilities, SeverityLevel, SeverityVerdict};

/// Weighted linear combination of two independent verdicts.
///
/// Each level's fused probability is `p_a * weight_a + p_b * weight_b`. The
/// fused level is the argmax, ties going to the more severe level. Weights
/// need not sum to one, but the result is only a distribution when they do.
pub fn fuse(
    a: &SeverityVerdict,
    weight_a: f64,
    b: &SeverityVerdict,
    weight_b: f64,
) -> SeverityVerdict {
    let fused = ClassProbabilities::from_pairs(SeverityLevel::ALL.into_iter().map(|level| {
        let p = a.probabilities.get(level) * weight_a + b.probabilities.get(level) * weight_b;
        (level, p)
    }));
    SeverityVerdict::from_probabilities(fused)
}
