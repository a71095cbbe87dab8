use serde::{Deserialize, Serialize};

use crate::scoring::Answers;

/// Identifier wrapper for stored risk assessments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssessmentId(pub String);

/// Completed risk-profiling questionnaire as received from the intake form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentSubmission {
    /// Distributor that owns the lead.
    pub distributor_id: String,
    pub lead_id: String,
    /// Code of the framework the questionnaire was built from.
    pub framework_code: String,
    #[serde(default)]
    pub answers: Answers,
}

/// Workflow state of a stored assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    Scored,
    /// Scoring was unavailable; an advisor must review or rescore.
    ManualReview,
}

impl SubmissionStatus {
    pub const fn label(self) -> &'static str {
        match self {
            SubmissionStatus::Scored => "scored",
            SubmissionStatus::ManualReview => "manual_review",
        }
    }
}
