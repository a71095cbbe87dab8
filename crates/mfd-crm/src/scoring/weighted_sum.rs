use std::collections::BTreeMap;

use super::framework::{bucket_for, WeightedSumFramework};
use super::transform::resolve;
use super::{answer_for, Answers, Rubric, ScoredQuestion, ScoringResult, WeightedSumRubric};

/// Flat model: sums each answered question's sub-score and bands the total.
pub fn score(framework: &WeightedSumFramework, answers: &Answers) -> ScoringResult {
    let mut total = 0.0;
    let mut scored_questions = BTreeMap::new();

    for question in &framework.questions {
        let Some(answer) = answer_for(answers, &question.qkey) else {
            continue;
        };

        let score = resolve(question, answer);
        total += score;
        scored_questions.insert(
            question.qkey.clone(),
            ScoredQuestion {
                answer: answer.clone(),
                score,
            },
        );
    }

    let bucket = bucket_for(&framework.bands, total);

    ScoringResult {
        score: Some(total),
        bucket,
        rubric: Rubric::WeightedSum(WeightedSumRubric {
            total_score: total,
            scored_questions,
            bands: framework.bands.clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::framework::{Band, InputKind, InputSpec};
    use serde_json::json;

    fn band(min: f64, max: f64, bucket: &str) -> Band {
        Band {
            min,
            max,
            bucket: bucket.to_string(),
        }
    }

    fn framework() -> WeightedSumFramework {
        let mut map = BTreeMap::new();
        map.insert("Low".to_string(), 10.0);
        map.insert("High".to_string(), 50.0);
        WeightedSumFramework {
            questions: vec![
                InputSpec {
                    map: Some(map),
                    ..InputSpec::new("risk")
                },
                InputSpec {
                    kind: Some(InputKind::Percent),
                    max: Some(20.0),
                    ..InputSpec::new("equity")
                },
            ],
            bands: vec![band(0.0, 20.0, "low"), band(21.0, 80.0, "high")],
        }
    }

    #[test]
    fn sums_scores_and_records_breakdown() {
        let mut answers = Answers::new();
        answers.insert("risk".to_string(), json!("High"));
        answers.insert("equity".to_string(), json!("35"));
        answers.insert("ignored".to_string(), json!("not configured"));

        let result = score(&framework(), &answers);

        assert_eq!(result.score, Some(70.0));
        assert_eq!(result.bucket.as_deref(), Some("high"));
        let Rubric::WeightedSum(rubric) = result.rubric else {
            panic!("expected weighted sum rubric");
        };
        assert_eq!(rubric.total_score, 70.0);
        assert_eq!(rubric.scored_questions.len(), 2);
        assert_eq!(rubric.scored_questions["equity"].score, 20.0);
        assert_eq!(rubric.scored_questions["risk"].answer, json!("High"));
    }

    #[test]
    fn missing_answers_are_skipped() {
        let mut answers = Answers::new();
        answers.insert("risk".to_string(), json!("Low"));

        let result = score(&framework(), &answers);

        assert_eq!(result.score, Some(10.0));
        assert_eq!(result.bucket.as_deref(), Some("low"));
        let Rubric::WeightedSum(rubric) = result.rubric else {
            panic!("expected weighted sum rubric");
        };
        assert!(!rubric.scored_questions.contains_key("equity"));
    }

    #[test]
    fn total_outside_bands_has_no_bucket() {
        let mut answers = Answers::new();
        answers.insert("equity".to_string(), json!("20.5"));
        let mut framework = framework();
        framework.questions[1].max = None;

        let result = score(&framework, &answers);

        assert_eq!(result.score, Some(20.5));
        assert_eq!(result.bucket, None);
    }
}
