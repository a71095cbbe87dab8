//! Risk-profile assessment intake: validate the questionnaire, score it against the
//! distributor's framework, and persist the result even when scoring is unavailable.

pub mod domain;
pub(crate) mod guard;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{AssessmentId, AssessmentSubmission, SubmissionStatus};
pub use guard::{IntakeGuard, IntakePolicy, SubmissionViolation};
pub use repository::{
    FrameworkStore, RepositoryError, SubmissionRecord, SubmissionRepository,
    SubmissionStatusView,
};
pub use router::{assessment_router, PreviewRequest};
pub use service::{AssessmentServiceError, RiskAssessmentService};
