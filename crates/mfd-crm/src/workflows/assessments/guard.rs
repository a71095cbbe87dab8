use super::domain::AssessmentSubmission;

/// Validation errors raised before a submission is scored.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionViolation {
    #[error("distributor_id is required")]
    MissingDistributor,
    #[error("lead_id is required")]
    MissingLead,
    #[error("framework_code is required")]
    MissingFramework,
    #[error("submission contains no answers")]
    EmptyAnswers,
    #[error("answer keys must not be blank")]
    BlankQuestionKey,
    #[error("submission carries {found} answers (limit {max})")]
    TooManyAnswers { max: usize, found: usize },
}

const DEFAULT_MAX_ANSWERS: usize = 200;

/// Intake limits applied to every questionnaire.
#[derive(Debug, Clone)]
pub struct IntakePolicy {
    max_answers: usize,
}

impl IntakePolicy {
    pub fn new(max_answers: usize) -> Self {
        let max_answers = if max_answers == 0 {
            DEFAULT_MAX_ANSWERS
        } else {
            max_answers
        };
        Self { max_answers }
    }

    pub fn max_answers(&self) -> usize {
        self.max_answers
    }
}

impl Default for IntakePolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ANSWERS)
    }
}

/// Guard responsible for producing sanitized submissions.
#[derive(Debug, Clone, Default)]
pub struct IntakeGuard {
    policy: IntakePolicy,
}

impl IntakeGuard {
    pub fn with_policy(policy: IntakePolicy) -> Self {
        Self { policy }
    }

    /// Trim identifiers and reject submissions that cannot be attributed or scored.
    pub fn sanitize(
        &self,
        submission: AssessmentSubmission,
    ) -> Result<AssessmentSubmission, SubmissionViolation> {
        let distributor_id = submission.distributor_id.trim().to_string();
        if distributor_id.is_empty() {
            return Err(SubmissionViolation::MissingDistributor);
        }

        let lead_id = submission.lead_id.trim().to_string();
        if lead_id.is_empty() {
            return Err(SubmissionViolation::MissingLead);
        }

        let framework_code = submission.framework_code.trim().to_string();
        if framework_code.is_empty() {
            return Err(SubmissionViolation::MissingFramework);
        }

        if submission.answers.is_empty() {
            return Err(SubmissionViolation::EmptyAnswers);
        }

        if submission.answers.len() > self.policy.max_answers {
            return Err(SubmissionViolation::TooManyAnswers {
                max: self.policy.max_answers,
                found: submission.answers.len(),
            });
        }

        if submission.answers.keys().any(|key| key.trim().is_empty()) {
            return Err(SubmissionViolation::BlankQuestionKey);
        }

        Ok(AssessmentSubmission {
            distributor_id,
            lead_id,
            framework_code,
            answers: submission.answers,
        })
    }
}
