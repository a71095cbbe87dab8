use super::framework::{bucket_for, PillarScores, ThreePillarFramework};
use super::pillar::aggregate;
use super::{Answers, Rubric, ScoringResult, ThreePillarRubric};

/// Capacity/tolerance/need model.
///
/// Need never raises the final score; it only drives warnings.
pub fn score(framework: &ThreePillarFramework, answers: &Answers) -> ScoringResult {
    let pillars = &framework.pillars;
    let scores = PillarScores {
        capacity: aggregate(&pillars.capacity, answers).score,
        tolerance: aggregate(&pillars.tolerance, answers).score,
        need: aggregate(&pillars.need, answers).score,
    };

    let decision = &framework.decision;
    let final_score = decision.formula.apply(scores.capacity, scores.tolerance);

    let warnings = decision
        .warnings
        .iter()
        .filter(|rule| rule.guard.triggered(&scores))
        .map(|rule| rule.message.clone())
        .collect();

    let bucket = bucket_for(&decision.bucket_bands, final_score);

    ScoringResult {
        score: Some(final_score),
        bucket,
        rubric: Rubric::ThreePillar(ThreePillarRubric {
            capacity: scores.capacity,
            tolerance: scores.tolerance,
            need: scores.need,
            final_score,
            warnings,
            bucket_bands: decision.bucket_bands.clone(),
        }),
    }
}
