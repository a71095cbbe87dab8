//! Converts one raw questionnaire answer into a numeric sub-score.
//!
//! Rules are evaluated in a fixed order and the first rule whose precondition
//! holds produces the score. A rule that matches but cannot read the answer
//! scores zero rather than failing the whole run.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tracing::debug;

use super::framework::{InputKind, InputSpec};
use super::tables::{amount_tier, goal_complexity};

static LEADING_FLOAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?").expect("valid float regex")
});

static AMOUNT_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d[\d,]*(?:\.\d+)?").expect("valid amount regex"));

/// Transform strategies in dispatch order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformRule {
    DirectMap,
    GoalComplexity,
    AmountTier,
    Percent,
    ScaleBucket,
}

impl TransformRule {
    pub const ORDERED: [TransformRule; 5] = [
        TransformRule::DirectMap,
        TransformRule::GoalComplexity,
        TransformRule::AmountTier,
        TransformRule::Percent,
        TransformRule::ScaleBucket,
    ];

    pub fn matches(&self, spec: &InputSpec, answer: &Value) -> bool {
        match self {
            TransformRule::DirectMap => match (&spec.map, answer_key(answer)) {
                (Some(map), Some(key)) => map.contains_key(&key),
                _ => false,
            },
            TransformRule::GoalComplexity => {
                spec.is_kind(InputKind::Multiple) && spec.wants_goal_complexity()
            }
            TransformRule::AmountTier => {
                spec.is_kind(InputKind::Text) && spec.wants_amount_parsing()
            }
            TransformRule::Percent => spec.is_kind(InputKind::Percent),
            TransformRule::ScaleBucket => {
                spec.is_kind(InputKind::Scale) && spec.scale.is_some() && spec.scores.is_some()
            }
        }
    }

    /// Score for an answer this rule matched.
    pub fn apply(&self, spec: &InputSpec, answer: &Value) -> f64 {
        match self {
            TransformRule::DirectMap => spec
                .map
                .as_ref()
                .zip(answer_key(answer))
                .and_then(|(map, key)| map.get(&key).copied())
                .unwrap_or(0.0),
            TransformRule::GoalComplexity => mean_goal_complexity(answer),
            TransformRule::AmountTier => match parse_amount(answer) {
                Some(amount) => amount_tier(amount),
                None => 0.0,
            },
            TransformRule::Percent => {
                let Some(value) = parse_leading_float(answer) else {
                    return 0.0;
                };
                let value = if spec.inverts_percent() {
                    100.0 - value
                } else {
                    value
                };
                match spec.max {
                    Some(cap) => value.min(cap),
                    None => value,
                }
            }
            TransformRule::ScaleBucket => {
                let (Some(scale), Some(scores)) = (&spec.scale, &spec.scores) else {
                    return 0.0;
                };
                let Some(value) = parse_leading_float(answer) else {
                    return 0.0;
                };
                scale
                    .iter()
                    .position(|threshold| value <= *threshold)
                    .and_then(|index| scores.get(index).copied())
                    .unwrap_or(0.0)
            }
        }
    }
}

/// Resolve an answer through the first matching rule, or 0 when nothing applies.
pub fn resolve(spec: &InputSpec, answer: &Value) -> f64 {
    for rule in TransformRule::ORDERED {
        if rule.matches(spec, answer) {
            return rule.apply(spec, answer);
        }
    }

    debug!(qkey = %spec.qkey, "no transform matched answer; contributing zero");
    0.0
}

/// Renders an answer the way it would be used as an object key.
fn answer_key(answer: &Value) -> Option<String> {
    match answer {
        Value::String(raw) => Some(raw.clone()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Number(number) => Some(render_number(number)),
        _ => None,
    }
}

fn render_number(number: &serde_json::Number) -> String {
    if let Some(int) = number.as_i64() {
        return int.to_string();
    }
    if let Some(uint) = number.as_u64() {
        return uint.to_string();
    }
    match number.as_f64() {
        Some(float) if float.fract() == 0.0 && float.abs() < 1e15 => {
            format!("{}", float as i64)
        }
        Some(float) => float.to_string(),
        None => number.to_string(),
    }
}

/// Reads a leading decimal number, ignoring trailing text such as `%`.
pub(crate) fn parse_leading_float(answer: &Value) -> Option<f64> {
    match answer {
        Value::Number(number) => number.as_f64(),
        Value::String(raw) => LEADING_FLOAT
            .find(raw)
            .and_then(|found| found.as_str().trim().parse::<f64>().ok())
            .filter(|value| value.is_finite()),
        _ => None,
    }
}

/// First numeric token in free text, with thousands separators removed.
pub(crate) fn parse_amount(answer: &Value) -> Option<f64> {
    let text = match answer {
        Value::String(raw) => raw.clone(),
        Value::Number(number) => number.to_string(),
        _ => return None,
    };

    AMOUNT_TOKEN
        .find(&text)
        .map(|token| token.as_str().replace(',', ""))
        .and_then(|digits| digits.parse::<f64>().ok())
}

fn mean_goal_complexity(answer: &Value) -> f64 {
    let Value::Array(goals) = answer else {
        return 0.0;
    };
    if goals.is_empty() {
        return 0.0;
    }

    let total: f64 = goals
        .iter()
        .map(|goal| match goal {
            Value::String(label) => goal_complexity(label),
            other => goal_complexity(&other.to_string()),
        })
        .sum();
    total / goals.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::BTreeMap;

    fn percent(transform: Option<&str>, max: Option<f64>) -> InputSpec {
        InputSpec {
            kind: Some(InputKind::Percent),
            transform: transform.map(str::to_string),
            max,
            ..InputSpec::new("equity_share")
        }
    }

    fn scale() -> InputSpec {
        InputSpec {
            kind: Some(InputKind::Scale),
            scale: Some(vec![10.0, 20.0, 30.0]),
            scores: Some(vec![90.0, 60.0, 30.0]),
            ..InputSpec::new("horizon")
        }
    }

    fn amount() -> InputSpec {
        InputSpec {
            kind: Some(InputKind::Text),
            transform: Some("parse_amount".to_string()),
            ..InputSpec::new("monthly_surplus")
        }
    }

    #[test]
    fn direct_map_wins_over_type_specific_rules() {
        let mut map = BTreeMap::new();
        map.insert("30".to_string(), 5.0);
        let spec = InputSpec {
            map: Some(map),
            ..percent(None, None)
        };

        assert_eq!(resolve(&spec, &json!("30")), 5.0);
        assert_eq!(resolve(&spec, &json!(30)), 5.0);
        assert_eq!(resolve(&spec, &json!("45")), 45.0);
    }

    #[test]
    fn percent_supports_inversion_and_cap() {
        assert_eq!(resolve(&percent(Some("100 - value"), None), &json!("30")), 70.0);
        assert_eq!(resolve(&percent(None, Some(40.0)), &json!("55%")), 40.0);
        assert_eq!(resolve(&percent(None, None), &json!("not a number")), 0.0);
        assert_eq!(resolve(&percent(None, None), &json!(12.5)), 12.5);
    }

    #[test]
    fn scale_returns_first_threshold_at_or_above_value() {
        assert_eq!(resolve(&scale(), &json!("15")), 60.0);
        assert_eq!(resolve(&scale(), &json!("10")), 90.0);
        assert_eq!(resolve(&scale(), &json!("30")), 30.0);
        assert_eq!(resolve(&scale(), &json!("31")), 0.0);
        assert_eq!(resolve(&scale(), &json!("soon")), 0.0);
    }

    #[test]
    fn scale_without_scores_falls_through() {
        let spec = InputSpec {
            scores: None,
            ..scale()
        };
        assert!(!TransformRule::ScaleBucket.matches(&spec, &json!("15")));
        assert_eq!(resolve(&spec, &json!("15")), 0.0);
    }

    #[test]
    fn amount_parsing_reads_first_token() {
        assert_eq!(resolve(&amount(), &json!("₹75,000 per month")), 60.0);
        assert_eq!(resolve(&amount(), &json!("50000")), 60.0);
        assert_eq!(resolve(&amount(), &json!("about 99,999.50")), 60.0);
        assert_eq!(resolve(&amount(), &json!("49,999")), 50.0);
        assert_eq!(resolve(&amount(), &json!("10,00,000 saved")), 90.0);
        assert_eq!(resolve(&amount(), &json!("nothing yet")), 0.0);
        assert_eq!(parse_amount(&json!("₹75,000 per month")), Some(75_000.0));
    }

    #[test]
    fn goal_complexity_averages_labels() {
        let spec = InputSpec {
            kind: Some(InputKind::Multiple),
            transform: Some("goal_complexity".to_string()),
            ..InputSpec::new("goals")
        };

        assert_eq!(resolve(&spec, &json!(["Retirement", "Emergency Fund"])), 50.0);
        assert_eq!(resolve(&spec, &json!(["Unknown goal"])), 50.0);
        assert_eq!(resolve(&spec, &json!([])), 0.0);
        assert_eq!(resolve(&spec, &json!("Retirement")), 0.0);
    }

    #[test]
    fn unmatched_specs_contribute_zero() {
        let spec = InputSpec {
            kind: Some(InputKind::Unrecognized),
            ..InputSpec::new("mystery")
        };
        assert_eq!(resolve(&spec, &json!("anything")), 0.0);
        assert_eq!(resolve(&InputSpec::new("bare"), &json!({"nested": true})), 0.0);
    }

    #[test]
    fn leading_float_matches_parse_float_prefix() {
        assert_eq!(parse_leading_float(&json!("  -12.5kg")), Some(-12.5));
        assert_eq!(parse_leading_float(&json!(".5")), Some(0.5));
        assert_eq!(parse_leading_float(&json!("abc")), None);
        assert_eq!(parse_leading_float(&json!(true)), None);
    }
}
