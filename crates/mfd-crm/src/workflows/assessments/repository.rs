use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::domain::{AssessmentId, AssessmentSubmission, SubmissionStatus};
use crate::scoring::ScoringResult;

/// Repository record holding the submission and the score persisted verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub id: AssessmentId,
    pub submission: AssessmentSubmission,
    pub status: SubmissionStatus,
    pub result: ScoringResult,
    pub submitted_at: DateTime<Utc>,
    pub scored_at: DateTime<Utc>,
}

impl SubmissionRecord {
    pub fn status_view(&self) -> SubmissionStatusView {
        SubmissionStatusView {
            assessment_id: self.id.clone(),
            lead_id: self.submission.lead_id.clone(),
            framework_code: self.submission.framework_code.clone(),
            status: self.status.label(),
            score: self.result.score,
            bucket: self.result.bucket.clone(),
            warnings: self.result.warnings().to_vec(),
        }
    }
}

/// Source of versioned framework definitions, keyed by framework code.
pub trait FrameworkStore: Send + Sync {
    fn framework(&self, code: &str) -> Result<Option<Value>, RepositoryError>;
}

/// Storage abstraction for scored submissions.
pub trait SubmissionRepository: Send + Sync {
    fn insert(&self, record: SubmissionRecord) -> Result<SubmissionRecord, RepositoryError>;
    fn update(&self, record: SubmissionRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &AssessmentId) -> Result<Option<SubmissionRecord>, RepositoryError>;
    fn list_for_lead(
        &self,
        distributor_id: &str,
        lead_id: &str,
    ) -> Result<Vec<SubmissionRecord>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Client-facing projection of a stored assessment.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionStatusView {
    pub assessment_id: AssessmentId,
    pub lead_id: String,
    pub framework_code: String,
    pub status: &'static str,
    pub score: Option<f64>,
    pub bucket: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}
