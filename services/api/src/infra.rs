use async_trait::async_trait;
use awesome_applicant::applicants::{
    Applicant, ApplicantConnection, ApplicantDraft, ApplicantId, ApplicantStore, StoreError,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::BTreeMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default)]
struct InMemoryTable {
    rows: BTreeMap<ApplicantId, Applicant>,
    last_id: ApplicantId,
}

impl InMemoryTable {
    fn row_from(draft: &ApplicantDraft, id: ApplicantId) -> Result<Applicant, StoreError> {
        draft.clone().into_applicant(id).ok_or_else(|| {
            StoreError::Rejected(format!(
                "null value in column \"{}\" violates not-null constraint",
                draft.missing_field().unwrap_or("unknown")
            ))
        })
    }
}

/// Process-local applicant table for demos without PostgreSQL. Rows vanish on exit.
#[derive(Default, Clone)]
pub(crate) struct InMemoryApplicantStore {
    table: Arc<Mutex<InMemoryTable>>,
}

#[async_trait]
impl ApplicantStore for InMemoryApplicantStore {
    type Connection = InMemoryConnection;

    async fn acquire(&self) -> Result<Self::Connection, StoreError> {
        Ok(InMemoryConnection {
            table: self.table.clone(),
        })
    }
}

pub(crate) struct InMemoryConnection {
    table: Arc<Mutex<InMemoryTable>>,
}

impl InMemoryConnection {
    fn with_table<T>(&self, f: impl FnOnce(&mut InMemoryTable) -> T) -> T {
        let mut guard = self.table.lock().expect("applicant table mutex poisoned");
        f(&mut guard)
    }
}

#[async_trait]
impl ApplicantConnection for InMemoryConnection {
    async fn select_all(&mut self) -> Result<Vec<Applicant>, StoreError> {
        Ok(self.with_table(|table| table.rows.values().cloned().collect()))
    }

    async fn insert(&mut self, draft: &ApplicantDraft) -> Result<Applicant, StoreError> {
        self.with_table(|table| {
            let id = table.last_id.checked_add(1).ok_or_else(|| {
                StoreError::Rejected("applicant id sequence exhausted".to_string())
            })?;
            let applicant = InMemoryTable::row_from(draft, id)?;
            table.last_id = id;
            table.rows.insert(id, applicant.clone());
            Ok(applicant)
        })
    }

    async fn select_by_id(&mut self, id: ApplicantId) -> Result<Option<Applicant>, StoreError> {
        Ok(self.with_table(|table| table.rows.get(&id).cloned()))
    }

    async fn update_by_id(
        &mut self,
        id: ApplicantId,
        draft: &ApplicantDraft,
    ) -> Result<Option<Applicant>, StoreError> {
        self.with_table(|table| {
            if !table.rows.contains_key(&id) {
                return Ok(None);
            }
            let applicant = InMemoryTable::row_from(draft, id)?;
            table.rows.insert(id, applicant.clone());
            Ok(Some(applicant))
        })
    }

    async fn delete_by_id(&mut self, id: ApplicantId) -> Result<u64, StoreError> {
        Ok(self.with_table(|table| u64::from(table.rows.remove(&id).is_some())))
    }
}
