use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use serde_json::Value;

use crate::applicants::domain::{Applicant, ApplicantDraft, ApplicantId};
use crate::applicants::store::{ApplicantConnection, ApplicantStore, StoreError};
use crate::applicants::{applicant_router, ApplicantService};

/// Where a [`CountingStore`] injects a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Failure {
    None,
    Acquire,
    Query,
}

type Rows = Arc<Mutex<BTreeMap<ApplicantId, Applicant>>>;

/// In-memory store that counts connection leases and releases.
#[derive(Clone)]
pub(super) struct CountingStore {
    rows: Rows,
    next_id: Arc<AtomicI32>,
    acquired: Arc<AtomicUsize>,
    released: Arc<AtomicUsize>,
    failure: Failure,
}

impl Default for CountingStore {
    fn default() -> Self {
        Self::failing(Failure::None)
    }
}

impl CountingStore {
    pub(super) fn failing(failure: Failure) -> Self {
        Self {
            rows: Arc::new(Mutex::new(BTreeMap::new())),
            next_id: Arc::new(AtomicI32::new(1)),
            acquired: Arc::new(AtomicUsize::new(0)),
            released: Arc::new(AtomicUsize::new(0)),
            failure,
        }
    }

    pub(super) fn seed(&self, applicant: Applicant) {
        let mut rows = self.rows.lock().expect("rows mutex poisoned");
        let next = applicant.id.saturating_add(1);
        self.next_id.fetch_max(next, Ordering::SeqCst);
        rows.insert(applicant.id, applicant);
    }

    pub(super) fn row(&self, id: ApplicantId) -> Option<Applicant> {
        self.rows.lock().expect("rows mutex poisoned").get(&id).cloned()
    }

    pub(super) fn row_count(&self) -> usize {
        self.rows.lock().expect("rows mutex poisoned").len()
    }

    pub(super) fn acquired(&self) -> usize {
        self.acquired.load(Ordering::SeqCst)
    }

    pub(super) fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ApplicantStore for CountingStore {
    type Connection = CountingConnection;

    async fn acquire(&self) -> Result<Self::Connection, StoreError> {
        if self.failure == Failure::Acquire {
            return Err(StoreError::Unavailable("connection refused".to_string()));
        }
        self.acquired.fetch_add(1, Ordering::SeqCst);
        Ok(CountingConnection {
            rows: self.rows.clone(),
            next_id: self.next_id.clone(),
            released: self.released.clone(),
            fail_queries: self.failure == Failure::Query,
        })
    }
}

pub(super) struct CountingConnection {
    rows: Rows,
    next_id: Arc<AtomicI32>,
    released: Arc<AtomicUsize>,
    fail_queries: bool,
}

impl CountingConnection {
    fn check(&self) -> Result<(), StoreError> {
        if self.fail_queries {
            Err(StoreError::Unavailable("connection reset by peer".to_string()))
        } else {
            Ok(())
        }
    }
}

impl Drop for CountingConnection {
    fn drop(&mut self) {
        self.released.fetch_add(1, Ordering::SeqCst);
    }
}

fn not_null_violation(draft: &ApplicantDraft) -> StoreError {
    let column = draft.missing_field().unwrap_or("unknown");
    StoreError::Rejected(format!(
        "null value in column \"{column}\" violates not-null constraint"
    ))
}

#[async_trait]
impl ApplicantConnection for CountingConnection {
    async fn select_all(&mut self) -> Result<Vec<Applicant>, StoreError> {
        self.check()?;
        let rows = self.rows.lock().expect("rows mutex poisoned");
        Ok(rows.values().cloned().collect())
    }

    async fn insert(&mut self, draft: &ApplicantDraft) -> Result<Applicant, StoreError> {
        self.check()?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let applicant = draft
            .clone()
            .into_applicant(id)
            .ok_or_else(|| not_null_violation(draft))?;
        self.rows
            .lock()
            .expect("rows mutex poisoned")
            .insert(id, applicant.clone());
        Ok(applicant)
    }

    async fn select_by_id(&mut self, id: ApplicantId) -> Result<Option<Applicant>, StoreError> {
        self.check()?;
        Ok(self.rows.lock().expect("rows mutex poisoned").get(&id).cloned())
    }

    async fn update_by_id(
        &mut self,
        id: ApplicantId,
        draft: &ApplicantDraft,
    ) -> Result<Option<Applicant>, StoreError> {
        self.check()?;
        let mut rows = self.rows.lock().expect("rows mutex poisoned");
        if !rows.contains_key(&id) {
            return Ok(None);
        }
        let applicant = draft
            .clone()
            .into_applicant(id)
            .ok_or_else(|| not_null_violation(draft))?;
        rows.insert(id, applicant.clone());
        Ok(Some(applicant))
    }

    async fn delete_by_id(&mut self, id: ApplicantId) -> Result<u64, StoreError> {
        self.check()?;
        let removed = self.rows.lock().expect("rows mutex poisoned").remove(&id);
        Ok(u64::from(removed.is_some()))
    }
}

pub(super) fn john_doe() -> Applicant {
    Applicant {
        id: 1,
        name: "John Doe".to_string(),
        email: "john.doe@example.com".to_string(),
        profile: "Developer".to_string(),
    }
}

pub(super) fn draft() -> ApplicantDraft {
    ApplicantDraft::new("Grace Hopper", "grace@example.com", "Compiler engineer")
}

pub(super) fn seeded_store() -> CountingStore {
    let store = CountingStore::default();
    store.seed(john_doe());
    store
}

pub(super) fn service_for(store: &CountingStore) -> Arc<ApplicantService<CountingStore>> {
    Arc::new(ApplicantService::new(Arc::new(store.clone())))
}

pub(super) fn router_for(store: &CountingStore) -> axum::Router {
    applicant_router(service_for(store))
}

pub(super) fn assert_released_once(store: &CountingStore) {
    assert_eq!(store.acquired(), 1, "exactly one lease expected");
    assert_eq!(store.released(), 1, "lease must be released exactly once");
}

pub(super) async fn read_body(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body")
        .to_vec()
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = read_body(response).await;
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) async fn read_text_body(response: Response) -> String {
    String::from_utf8(read_body(response).await).expect("utf-8 body")
}
