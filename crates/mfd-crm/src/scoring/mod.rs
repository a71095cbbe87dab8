//! Risk-profiling score engine.
//!
//! A framework configuration (weighted-sum or three-pillar) is applied to a map
//! of questionnaire answers, producing a score, a risk bucket, and a rubric
//! explaining how both were reached.

mod engine;
pub mod framework;
pub mod pillar;
pub mod tables;
pub mod three_pillar;
pub mod transform;
pub mod weighted_sum;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use engine::{parse_framework, score_submission, try_score, SCORING_FAILED};
pub use framework::{
    Band, Decision, DecisionFormula, FrameworkConfig, InputKind, InputSpec, PillarSpec, Pillars,
    ThreePillarFramework, WarningGuard, WarningRule, WeightedSumFramework,
};

/// Raw answers keyed by question key.
pub type Answers = BTreeMap<String, Value>;

/// Present, non-null answer for a question.
pub(crate) fn answer_for<'a>(answers: &'a Answers, qkey: &str) -> Option<&'a Value> {
    answers.get(qkey).filter(|value| !value.is_null())
}

/// Score, bucket, and diagnostic breakdown for one submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringResult {
    pub score: Option<f64>,
    pub bucket: Option<String>,
    pub rubric: Rubric,
}

impl ScoringResult {
    /// Null result recorded when scoring could not complete.
    pub fn failed() -> Self {
        Self {
            score: None,
            bucket: None,
            rubric: Rubric::Failed {
                error: SCORING_FAILED.to_string(),
            },
        }
    }

    pub fn is_scored(&self) -> bool {
        self.score.is_some()
    }

    pub fn warnings(&self) -> &[String] {
        match &self.rubric {
            Rubric::ThreePillar(rubric) => &rubric.warnings,
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Rubric {
    WeightedSum(WeightedSumRubric),
    ThreePillar(ThreePillarRubric),
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedSumRubric {
    #[serde(rename = "totalScore")]
    pub total_score: f64,
    #[serde(rename = "scoredQuestions")]
    pub scored_questions: BTreeMap<String, ScoredQuestion>,
    pub bands: Vec<Band>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredQuestion {
    pub answer: Value,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreePillarRubric {
    pub capacity: f64,
    pub tolerance: f64,
    pub need: f64,
    #[serde(rename = "finalScore")]
    pub final_score: f64,
    pub warnings: Vec<String>,
    pub bucket_bands: Vec<Band>,
}

/// Reasons a framework could not be applied.
#[derive(Debug, thiserror::Error)]
pub enum ScoringError {
    #[error("unsupported scoring engine {0:?}")]
    UnsupportedEngine(Option<String>),
    #[error("malformed framework configuration: {0}")]
    InvalidConfig(#[from] serde_json::Error),
    #[error("band {index} is invalid (min {min}, max {max})")]
    InvalidBand { index: usize, min: f64, max: f64 },
    #[error("weight {weight} for '{qkey}' in the {pillar} pillar must be finite and non-negative")]
    InvalidWeight {
        pillar: &'static str,
        qkey: String,
        weight: f64,
    },
    #[error("framework question keys must not be empty")]
    EmptyQuestionKey,
    #[error("computed score {0} is not a finite number")]
    NonFiniteScore(f64),
}

impl ScoringError {
    pub fn kind(&self) -> &'static str {
        match self {
            ScoringError::UnsupportedEngine(_) => "unsupported_engine",
            ScoringError::InvalidConfig(_) => "invalid_config",
            ScoringError::InvalidBand { .. } => "invalid_band",
            ScoringError::InvalidWeight { .. } => "invalid_weight",
            ScoringError::EmptyQuestionKey => "empty_question_key",
            ScoringError::NonFiniteScore(_) => "non_finite_score",
        }
    }

    /// Whether an operator must repair the framework before scoring can succeed.
    pub fn is_configuration_error(&self) -> bool {
        !matches!(self, ScoringError::NonFiniteScore(_))
    }
}
