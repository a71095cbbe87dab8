use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::{json, Value};

use crate::scoring::Answers;
use crate::workflows::assessments::domain::{AssessmentId, AssessmentSubmission};
use crate::workflows::assessments::repository::{
    FrameworkStore, RepositoryError, SubmissionRecord, SubmissionRepository,
};
use crate::workflows::assessments::{assessment_router, RiskAssessmentService};

pub(super) const WEIGHTED_CODE: &str = "quick-risk-v1";
pub(super) const PILLAR_CODE: &str = "cfa-three-pillar-v2";

pub(super) fn weighted_framework() -> Value {
    json!({
        "engine": "weighted_sum",
        "questions": [
            { "qkey": "risk", "map": { "Low": 10, "High": 50 } },
            { "qkey": "horizon", "type": "scale", "scale": [3, 7, 15], "scores": [5, 10, 20] }
        ],
        "bands": [
            { "min": 0, "max": 20, "bucket": "low" },
            { "min": 20, "max": 60, "bucket": "medium" },
            { "min": 60, "max": 100, "bucket": "high" }
        ]
    })
}

pub(super) fn pillar_framework() -> Value {
    json!({
        "engine": "three_pillar",
        "pillars": {
            "capacity": {
                "inputs": [
                    { "qkey": "monthly_surplus", "type": "text", "transform": "parse_amount" },
                    { "qkey": "emergency_cover", "map": { "none": 10, "3 months": 50, "6+ months": 90 } }
                ],
                "weights": { "monthly_surplus": 2 }
            },
            "tolerance": {
                "inputs": [
                    { "qkey": "market_drop", "map": { "Sell everything": 10, "Hold": 50, "Buy more": 90 } }
                ]
            },
            "need": {
                "inputs": [
                    { "qkey": "goals", "type": "multiple", "transform": "goal_complexity" },
                    { "qkey": "fd_share", "type": "percent", "transform": "100 - value" }
                ]
            }
        },
        "decision": {
            "formula": "min(capacity, tolerance)",
            "warnings": [
                { "if": "need > capacity + 10", "message": "Return need exceeds risk capacity" }
            ],
            "bucket_bands": [
                { "min": 0, "max": 40, "bucket": "low" },
                { "min": 40, "max": 70, "bucket": "medium" },
                { "min": 70, "max": 100, "bucket": "high" }
            ]
        }
    })
}

pub(super) fn weighted_answers() -> Answers {
    let mut answers = Answers::new();
    answers.insert("risk".to_string(), json!("High"));
    answers.insert("horizon".to_string(), json!("5"));
    answers
}

pub(super) fn submission() -> AssessmentSubmission {
    AssessmentSubmission {
        distributor_id: "mfd-ravi-advisory".to_string(),
        lead_id: "lead-0042".to_string(),
        framework_code: WEIGHTED_CODE.to_string(),
        answers: weighted_answers(),
    }
}

pub(super) fn pillar_submission() -> AssessmentSubmission {
    let mut answers = Answers::new();
    answers.insert("monthly_surplus".to_string(), json!("₹75,000 per month"));
    answers.insert("emergency_cover".to_string(), json!("3 months"));
    answers.insert("market_drop".to_string(), json!("Buy more"));
    answers.insert("goals".to_string(), json!(["Retirement", "Child Education"]));
    answers.insert("fd_share".to_string(), json!("20"));

    AssessmentSubmission {
        distributor_id: "mfd-ravi-advisory".to_string(),
        lead_id: "lead-0042".to_string(),
        framework_code: PILLAR_CODE.to_string(),
        answers,
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryFrameworks {
    pub(super) frameworks: Arc<Mutex<HashMap<String, Value>>>,
}

impl MemoryFrameworks {
    pub(super) fn seeded() -> Self {
        let store = Self::default();
        store.put(WEIGHTED_CODE, weighted_framework());
        store.put(PILLAR_CODE, pillar_framework());
        store
    }

    pub(super) fn put(&self, code: &str, framework: Value) {
        self.frameworks
            .lock()
            .expect("framework mutex poisoned")
            .insert(code.to_string(), framework);
    }
}

impl FrameworkStore for MemoryFrameworks {
    fn framework(&self, code: &str) -> Result<Option<Value>, RepositoryError> {
        let guard = self.frameworks.lock().expect("framework mutex poisoned");
        Ok(guard.get(code).cloned())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<AssessmentId, SubmissionRecord>>>,
}

impl SubmissionRepository for MemoryRepository {
    fn insert(&self, record: SubmissionRecord) -> Result<SubmissionRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: SubmissionRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.insert(record.id.clone(), record);
        Ok(())
    }

    fn fetch(&self, id: &AssessmentId) -> Result<Option<SubmissionRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list_for_lead(
        &self,
        distributor_id: &str,
        lead_id: &str,
    ) -> Result<Vec<SubmissionRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|record| {
                record.submission.distributor_id == distributor_id
                    && record.submission.lead_id == lead_id
            })
            .cloned()
            .collect())
    }
}

pub(super) struct ConflictRepository;

impl SubmissionRepository for ConflictRepository {
    fn insert(&self, _record: SubmissionRecord) -> Result<SubmissionRecord, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn update(&self, _record: SubmissionRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    fn fetch(&self, _id: &AssessmentId) -> Result<Option<SubmissionRecord>, RepositoryError> {
        Ok(None)
    }

    fn list_for_lead(
        &self,
        _distributor_id: &str,
        _lead_id: &str,
    ) -> Result<Vec<SubmissionRecord>, RepositoryError> {
        Ok(Vec::new())
    }
}

pub(super) struct UnavailableRepository;

impl SubmissionRepository for UnavailableRepository {
    fn insert(&self, _record: SubmissionRecord) -> Result<SubmissionRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _record: SubmissionRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &AssessmentId) -> Result<Option<SubmissionRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list_for_lead(
        &self,
        _distributor_id: &str,
        _lead_id: &str,
    ) -> Result<Vec<SubmissionRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn build_service() -> (
    RiskAssessmentService<MemoryFrameworks, MemoryRepository>,
    Arc<MemoryFrameworks>,
    Arc<MemoryRepository>,
) {
    let frameworks = Arc::new(MemoryFrameworks::seeded());
    let repository = Arc::new(MemoryRepository::default());
    let service = RiskAssessmentService::new(frameworks.clone(), repository.clone());
    (service, frameworks, repository)
}

pub(super) fn router_with_service(
    service: RiskAssessmentService<MemoryFrameworks, MemoryRepository>,
) -> axum::Router {
    assessment_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
