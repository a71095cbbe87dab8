use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ScoringError;

/// Versioned risk-profiling framework, discriminated by its `engine` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "engine", rename_all = "snake_case")]
pub enum FrameworkConfig {
    WeightedSum(WeightedSumFramework),
    ThreePillar(ThreePillarFramework),
}

impl FrameworkConfig {
    pub const ENGINES: [&'static str; 2] = ["weighted_sum", "three_pillar"];

    pub fn engine(&self) -> &'static str {
        match self {
            FrameworkConfig::WeightedSum(_) => "weighted_sum",
            FrameworkConfig::ThreePillar(_) => "three_pillar",
        }
    }

    /// Structural checks that must hold before any answers are scored.
    pub fn validate(&self) -> Result<(), ScoringError> {
        match self {
            FrameworkConfig::WeightedSum(framework) => {
                validate_inputs(&framework.questions)?;
                validate_bands(&framework.bands)
            }
            FrameworkConfig::ThreePillar(framework) => {
                for (name, pillar) in framework.pillars.iter() {
                    validate_inputs(&pillar.inputs)?;
                    for (qkey, weight) in &pillar.weights {
                        if !weight.is_finite() || *weight < 0.0 {
                            return Err(ScoringError::InvalidWeight {
                                pillar: name,
                                qkey: qkey.clone(),
                                weight: *weight,
                            });
                        }
                    }
                }
                validate_bands(&framework.decision.bucket_bands)
            }
        }
    }
}

fn validate_inputs(inputs: &[InputSpec]) -> Result<(), ScoringError> {
    if inputs.iter().any(|input| input.qkey.trim().is_empty()) {
        return Err(ScoringError::EmptyQuestionKey);
    }
    Ok(())
}

fn validate_bands(bands: &[Band]) -> Result<(), ScoringError> {
    for (index, band) in bands.iter().enumerate() {
        if band.min > band.max || band.bucket.trim().is_empty() {
            return Err(ScoringError::InvalidBand {
                index,
                min: band.min,
                max: band.max,
            });
        }
    }
    Ok(())
}

/// Flat model: per-question scores are summed into one total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedSumFramework {
    pub questions: Vec<InputSpec>,
    pub bands: Vec<Band>,
}

/// Capacity/tolerance/need model with a decision block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreePillarFramework {
    pub pillars: Pillars,
    pub decision: Decision,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pillars {
    pub capacity: PillarSpec,
    pub tolerance: PillarSpec,
    pub need: PillarSpec,
}

impl Pillars {
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &PillarSpec)> {
        [
            ("capacity", &self.capacity),
            ("tolerance", &self.tolerance),
            ("need", &self.need),
        ]
        .into_iter()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PillarSpec {
    pub inputs: Vec<InputSpec>,
    #[serde(default)]
    pub weights: BTreeMap<String, f64>,
}

impl PillarSpec {
    /// Configured weight for a question, defaulting to 1 when unlisted.
    pub fn weight_for(&self, qkey: &str) -> f64 {
        self.weights.get(qkey).copied().unwrap_or(1.0)
    }
}

/// One configured question and the hints used to turn its answer into a number.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputSpec {
    pub qkey: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map: Option<BTreeMap<String, f64>>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<InputKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scores: Option<Vec<f64>>,
}

impl InputSpec {
    pub fn new(qkey: impl Into<String>) -> Self {
        Self {
            qkey: qkey.into(),
            ..Self::default()
        }
    }

    pub fn is_kind(&self, kind: InputKind) -> bool {
        self.kind == Some(kind)
    }

    fn transform_compact(&self) -> Option<String> {
        self.transform.as_deref().map(|raw| {
            raw.chars()
                .filter(|ch| !ch.is_whitespace())
                .collect::<String>()
                .to_ascii_lowercase()
        })
    }

    pub fn inverts_percent(&self) -> bool {
        self.transform_compact().as_deref() == Some("100-value")
    }

    pub fn wants_goal_complexity(&self) -> bool {
        self.transform_compact()
            .is_some_and(|transform| transform.contains("complexity"))
    }

    pub fn wants_amount_parsing(&self) -> bool {
        self.transform_compact()
            .is_some_and(|transform| transform.contains("amount") || transform.contains("parse"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    Percent,
    Scale,
    Multiple,
    Text,
    #[serde(other)]
    Unrecognized,
}

/// Inclusive score range mapped to a bucket label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub min: f64,
    pub max: f64,
    pub bucket: String,
}

impl Band {
    pub fn contains(&self, score: f64) -> bool {
        self.min <= score && score <= self.max
    }
}

/// First band in list order containing the score.
pub fn bucket_for(bands: &[Band], score: f64) -> Option<String> {
    bands
        .iter()
        .find(|band| band.contains(score))
        .map(|band| band.bucket.clone())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    #[serde(default)]
    pub formula: DecisionFormula,
    #[serde(default)]
    pub warnings: Vec<WarningRule>,
    pub bucket_bands: Vec<Band>,
}

/// How the final score is derived from the pillar scores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DecisionFormula {
    #[default]
    MinCapacityTolerance,
}

impl DecisionFormula {
    pub fn apply(&self, capacity: f64, tolerance: f64) -> f64 {
        match self {
            DecisionFormula::MinCapacityTolerance => capacity.min(tolerance),
        }
    }
}

impl fmt::Display for DecisionFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecisionFormula::MinCapacityTolerance => write!(f, "min(capacity, tolerance)"),
        }
    }
}

impl TryFrom<String> for DecisionFormula {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let compact: String = value.chars().filter(|ch| !ch.is_whitespace()).collect();
        match compact.as_str() {
            "min(capacity,tolerance)" | "min(tolerance,capacity)" => {
                Ok(DecisionFormula::MinCapacityTolerance)
            }
            _ => Err(format!("unsupported decision formula '{value}'")),
        }
    }
}

impl From<DecisionFormula> for String {
    fn from(value: DecisionFormula) -> Self {
        value.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarningRule {
    #[serde(rename = "if")]
    pub guard: WarningGuard,
    pub message: String,
}

/// Closed set of cross-pillar predicates a framework may attach warnings to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum WarningGuard {
    /// Need exceeds capacity by strictly more than `margin` points.
    NeedExceedsCapacity { margin: f64 },
}

impl WarningGuard {
    pub fn triggered(&self, scores: &PillarScores) -> bool {
        match self {
            WarningGuard::NeedExceedsCapacity { margin } => {
                scores.need > scores.capacity + margin
            }
        }
    }
}

impl fmt::Display for WarningGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WarningGuard::NeedExceedsCapacity { margin } => {
                write!(f, "need > capacity + {margin}")
            }
        }
    }
}

impl FromStr for WarningGuard {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let compact: String = raw.chars().filter(|ch| !ch.is_whitespace()).collect();
        let margin = compact
            .strip_prefix("need>capacity+")
            .and_then(|margin| margin.parse::<f64>().ok())
            .filter(|margin| margin.is_finite());

        match margin {
            Some(margin) => Ok(WarningGuard::NeedExceedsCapacity { margin }),
            None => Err(format!("unsupported warning guard '{raw}'")),
        }
    }
}

impl TryFrom<String> for WarningGuard {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<WarningGuard> for String {
    fn from(value: WarningGuard) -> Self {
        value.to_string()
    }
}

/// Pillar scores evaluated by warning guards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PillarScores {
    pub capacity: f64,
    pub tolerance: f64,
    pub need: f64,
}
