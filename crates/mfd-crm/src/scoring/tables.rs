//! Fixed business lookup tables used by the answer transforms.

/// Score assigned to a goal label missing from [`GOAL_COMPLEXITY`].
pub const DEFAULT_GOAL_COMPLEXITY: f64 = 50.0;

/// Relative planning complexity of common investment goals.
pub const GOAL_COMPLEXITY: &[(&str, f64)] = &[
    ("retirement", 80.0),
    ("wealth creation", 75.0),
    ("child education", 70.0),
    ("home purchase", 65.0),
    ("business expansion", 60.0),
    ("marriage", 55.0),
    ("vehicle purchase", 40.0),
    ("tax saving", 35.0),
    ("vacation", 30.0),
    ("emergency fund", 20.0),
];

/// Descending `(threshold, score)` tiers for parsed rupee amounts.
pub const AMOUNT_TIERS: &[(f64, f64)] = &[
    (1_000_000.0, 90.0),
    (500_000.0, 80.0),
    (100_000.0, 70.0),
    (50_000.0, 60.0),
    (25_000.0, 50.0),
    (10_000.0, 40.0),
    (5_000.0, 30.0),
    (1_000.0, 20.0),
];

/// Score for amounts below the lowest tier.
pub const AMOUNT_FLOOR_SCORE: f64 = 10.0;

pub fn goal_complexity(label: &str) -> f64 {
    let needle = label.trim();
    GOAL_COMPLEXITY
        .iter()
        .find(|(goal, _)| goal.eq_ignore_ascii_case(needle))
        .map(|(_, score)| *score)
        .unwrap_or(DEFAULT_GOAL_COMPLEXITY)
}

pub fn amount_tier(amount: f64) -> f64 {
    AMOUNT_TIERS
        .iter()
        .find(|(threshold, _)| amount >= *threshold)
        .map(|(_, score)| *score)
        .unwrap_or(AMOUNT_FLOOR_SCORE)
}
