use super::framework::PillarSpec;
use super::transform::resolve;
use super::{answer_for, Answers};

/// Weighted average of one pillar's answered inputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PillarScore {
    pub score: f64,
    pub total_weight: f64,
    pub answered: usize,
}

pub fn aggregate(pillar: &PillarSpec, answers: &Answers) -> PillarScore {
    let mut weighted_sum = 0.0;
    let mut total_weight = 0.0;
    let mut answered = 0;

    for input in &pillar.inputs {
        let Some(answer) = answer_for(answers, &input.qkey) else {
            continue;
        };

        let weight = pillar.weight_for(&input.qkey);
        weighted_sum += resolve(input, answer) * weight;
        total_weight += weight;
        answered += 1;
    }

    let score = if total_weight == 0.0 {
        0.0
    } else {
        weighted_sum / total_weight
    };

    PillarScore {
        score,
        total_weight,
        answered,
    }
}
