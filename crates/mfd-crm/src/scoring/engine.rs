use serde_json::Value;
use tracing::{debug, warn};

use super::framework::FrameworkConfig;
use super::{three_pillar, weighted_sum, Answers, Rubric, ScoringError, ScoringResult};

/// Rubric message recorded when scoring falls back to the null result.
pub const SCORING_FAILED: &str = "Scoring failed";

/// Parse and validate a stored framework definition.
pub fn parse_framework(raw: &Value) -> Result<FrameworkConfig, ScoringError> {
    match raw.get("engine").and_then(Value::as_str) {
        Some(engine) if FrameworkConfig::ENGINES.contains(&engine) => {}
        other => return Err(ScoringError::UnsupportedEngine(other.map(str::to_string))),
    }

    let framework: FrameworkConfig = serde_json::from_value(raw.clone())?;
    framework.validate()?;
    Ok(framework)
}

/// Score answers against a typed framework, surfacing every failure.
pub fn try_score(
    framework: &FrameworkConfig,
    answers: &Answers,
) -> Result<ScoringResult, ScoringError> {
    framework.validate()?;

    let result = match framework {
        FrameworkConfig::WeightedSum(framework) => weighted_sum::score(framework, answers),
        FrameworkConfig::ThreePillar(framework) => three_pillar::score(framework, answers),
    };

    match first_non_finite(&result) {
        Some(value) => Err(ScoringError::NonFiniteScore(value)),
        None => {
            debug!(
                engine = framework.engine(),
                score = ?result.score,
                bucket = ?result.bucket,
                "submission scored"
            );
            Ok(result)
        }
    }
}

/// Score or rubric figure that overflowed; `f64::min` would otherwise hide a NaN pillar.
fn first_non_finite(result: &ScoringResult) -> Option<f64> {
    let rubric_values = match &result.rubric {
        Rubric::WeightedSum(rubric) => vec![rubric.total_score],
        Rubric::ThreePillar(rubric) => vec![
            rubric.capacity,
            rubric.tolerance,
            rubric.need,
            rubric.final_score,
        ],
        Rubric::Failed { .. } => Vec::new(),
    };

    result
        .score
        .into_iter()
        .chain(rubric_values)
        .find(|value| !value.is_finite())
}

/// Best-effort scoring: any failure becomes the null result instead of an error.
pub fn score_submission(config: &Value, answers: &Answers) -> ScoringResult {
    match parse_framework(config).and_then(|framework| try_score(&framework, answers)) {
        Ok(result) => result,
        Err(err) => {
            warn!(
                kind = err.kind(),
                configuration_error = err.is_configuration_error(),
                error = %err,
                "scoring failed; recording null result"
            );
            ScoringResult::failed()
        }
    }
}
