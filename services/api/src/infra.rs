use metrics_exporter_prometheus::PrometheusHandle;
use mfd_crm::error::AppError;
use mfd_crm::scoring::parse_framework;
use mfd_crm::workflows::assessments::{
    AssessmentId, FrameworkStore, RepositoryError, SubmissionRecord, SubmissionRepository,
};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

const BUILTIN_FRAMEWORKS: &str = include_str!("../frameworks.json");

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Framework configurations keyed by code, validated once at startup.
#[derive(Default, Clone)]
pub(crate) struct InMemoryFrameworkStore {
    frameworks: Arc<BTreeMap<String, Value>>,
}

impl InMemoryFrameworkStore {
    pub(crate) fn load(path: Option<&Path>) -> Result<Self, AppError> {
        match path {
            Some(path) => Self::from_path(path),
            None => Self::builtin(),
        }
    }

    pub(crate) fn builtin() -> Result<Self, AppError> {
        Self::from_json(BUILTIN_FRAMEWORKS)
    }

    pub(crate) fn from_path(path: &Path) -> Result<Self, AppError> {
        let raw = fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    fn from_json(raw: &str) -> Result<Self, AppError> {
        let frameworks: BTreeMap<String, Value> = serde_json::from_str(raw)?;

        for (code, config) in &frameworks {
            let framework = parse_framework(config).map_err(|err| {
                warn!(framework_code = %code, error = %err, "framework rejected");
                err
            })?;
            info!(framework_code = %code, engine = framework.engine(), "framework loaded");
        }

        Ok(Self {
            frameworks: Arc::new(frameworks),
        })
    }

    pub(crate) fn codes(&self) -> Vec<&str> {
        self.frameworks.keys().map(String::as_str).collect()
    }
}

impl FrameworkStore for InMemoryFrameworkStore {
    fn framework(&self, code: &str) -> Result<Option<Value>, RepositoryError> {
        Ok(self.frameworks.get(code).cloned())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemorySubmissionRepository {
    records: Arc<Mutex<HashMap<AssessmentId, SubmissionRecord>>>,
}

impl SubmissionRepository for InMemorySubmissionRepository {
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
        if guard.contains_key(&record.id) {
            guard.insert(record.id.clone(), record);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
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
