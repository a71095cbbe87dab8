use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::{info, warn};

use super::domain::{AssessmentId, AssessmentSubmission, SubmissionStatus};
use super::guard::{IntakeGuard, SubmissionViolation};
use super::repository::{FrameworkStore, RepositoryError, SubmissionRecord, SubmissionRepository};
use crate::scoring::{
    parse_framework, score_submission, try_score, Answers, ScoringError, ScoringResult,
};

/// Service composing intake validation, the framework store, and the scoring engine.
pub struct RiskAssessmentService<F, R> {
    guard: Arc<IntakeGuard>,
    frameworks: Arc<F>,
    repository: Arc<R>,
    sequence: AtomicU64,
}

fn status_for(result: &ScoringResult) -> SubmissionStatus {
    if result.is_scored() {
        SubmissionStatus::Scored
    } else {
        SubmissionStatus::ManualReview
    }
}

impl<F, R> RiskAssessmentService<F, R>
where
    F: FrameworkStore + 'static,
    R: SubmissionRepository + 'static,
{
    pub fn new(frameworks: Arc<F>, repository: Arc<R>) -> Self {
        Self::with_guard(IntakeGuard::default(), frameworks, repository)
    }

    pub fn with_guard(guard: IntakeGuard, frameworks: Arc<F>, repository: Arc<R>) -> Self {
        Self {
            guard: Arc::new(guard),
            frameworks,
            repository,
            sequence: AtomicU64::new(1),
        }
    }

    fn next_assessment_id(&self) -> AssessmentId {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed);
        AssessmentId(format!("asm-{id:06}"))
    }

    fn load_framework(&self, code: &str) -> Result<Value, AssessmentServiceError> {
        self.frameworks
            .framework(code)?
            .ok_or_else(|| AssessmentServiceError::FrameworkNotFound(code.to_string()))
    }

    /// Score and persist a questionnaire.
    ///
    /// A scoring failure does not reject the submission; it is stored for manual review.
    pub fn submit(
        &self,
        submission: AssessmentSubmission,
    ) -> Result<SubmissionRecord, AssessmentServiceError> {
        let submission = self.guard.sanitize(submission)?;
        let config = self.load_framework(&submission.framework_code)?;

        let result = score_submission(&config, &submission.answers);
        let status = status_for(&result);
        let now = Utc::now();

        let record = SubmissionRecord {
            id: self.next_assessment_id(),
            submission,
            status,
            result,
            submitted_at: now,
            scored_at: now,
        };

        let stored = self.repository.insert(record)?;
        if stored.status == SubmissionStatus::ManualReview {
            warn!(
                assessment_id = %stored.id.0,
                framework = %stored.submission.framework_code,
                "assessment stored without a score; flagged for manual review"
            );
        } else {
            info!(
                assessment_id = %stored.id.0,
                framework = %stored.submission.framework_code,
                bucket = ?stored.result.bucket,
                "assessment scored"
            );
        }

        Ok(stored)
    }

    /// Re-run scoring for a stored submission against the current framework.
    pub fn rescore(
        &self,
        assessment_id: &AssessmentId,
    ) -> Result<SubmissionRecord, AssessmentServiceError> {
        let mut record = self
            .repository
            .fetch(assessment_id)?
            .ok_or(RepositoryError::NotFound)?;

        let config = self.load_framework(&record.submission.framework_code)?;
        record.result = score_submission(&config, &record.submission.answers);
        record.status = status_for(&record.result);
        record.scored_at = Utc::now();

        self.repository.update(record.clone())?;
        info!(
            assessment_id = %record.id.0,
            status = record.status.label(),
            "assessment rescored"
        );

        Ok(record)
    }

    /// Fetch a stored assessment.
    pub fn get(
        &self,
        assessment_id: &AssessmentId,
    ) -> Result<SubmissionRecord, AssessmentServiceError> {
        let record = self
            .repository
            .fetch(assessment_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    /// Assessments recorded for one lead of one distributor.
    pub fn history(
        &self,
        distributor_id: &str,
        lead_id: &str,
    ) -> Result<Vec<SubmissionRecord>, AssessmentServiceError> {
        let mut records = self.repository.list_for_lead(distributor_id, lead_id)?;
        records.sort_by(|left, right| {
            left.submitted_at
                .cmp(&right.submitted_at)
                .then_with(|| left.id.cmp(&right.id))
        });
        Ok(records)
    }

    /// Score ad-hoc answers against an unsaved framework, surfacing configuration errors.
    pub fn preview(
        &self,
        config: &Value,
        answers: &Answers,
    ) -> Result<ScoringResult, AssessmentServiceError> {
        let framework = parse_framework(config)?;
        Ok(try_score(&framework, answers)?)
    }
}

/// Error raised by the assessment service.
#[derive(Debug, thiserror::Error)]
pub enum AssessmentServiceError {
    #[error(transparent)]
    Intake(#[from] SubmissionViolation),
    #[error("framework '{0}' is not configured")]
    FrameworkNotFound(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Scoring(#[from] ScoringError),
}
