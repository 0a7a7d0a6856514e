use std::sync::Arc;

use tracing::debug;

use super::domain::{Applicant, ApplicantDraft, ApplicantId};
use super::store::{ApplicantConnection, ApplicantStore, StoreError};

/// Service running the applicant statements against an injected store.
///
/// Every operation leases exactly one connection and issues exactly one statement. The lease
/// lives in a local binding, so it is returned to the store before the caller sees the
/// result, whether the statement succeeded or `?` propagated an error.
pub struct ApplicantService<S> {
    store: Arc<S>,
}

impl<S> ApplicantService<S>
where
    S: ApplicantStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// All applicants, in whatever order the store yields them.
    pub async fn list(&self) -> Result<Vec<Applicant>, ApplicantServiceError> {
        let mut conn = self.store.acquire().await?;
        let applicants = conn.select_all().await?;
        Ok(applicants)
    }

    /// Insert a new applicant and return it with its assigned id.
    pub async fn create(&self, draft: ApplicantDraft) -> Result<Applicant, ApplicantServiceError> {
        let mut conn = self.store.acquire().await?;
        let applicant = conn.insert(&draft).await?;
        Ok(applicant)
    }

    pub async fn get(&self, id: ApplicantId) -> Result<Applicant, ApplicantServiceError> {
        let mut conn = self.store.acquire().await?;
        conn.select_by_id(id)
            .await?
            .ok_or(ApplicantServiceError::NotFound)
    }

    /// Replace all mutable fields of an existing applicant. Never creates a row.
    pub async fn update(
        &self,
        id: ApplicantId,
        draft: ApplicantDraft,
    ) -> Result<Applicant, ApplicantServiceError> {
        let mut conn = self.store.acquire().await?;
        conn.update_by_id(id, &draft)
            .await?
            .ok_or(ApplicantServiceError::NotFound)
    }

    /// Delete is idempotent: removing an id that does not exist is not an error.
    pub async fn delete(&self, id: ApplicantId) -> Result<(), ApplicantServiceError> {
        let mut conn = self.store.acquire().await?;
        let removed = conn.delete_by_id(id).await?;
        debug!(applicant_id = id, removed, "delete applied");
        Ok(())
    }
}

/// Error raised by the applicant service.
#[derive(Debug, thiserror::Error)]
pub enum ApplicantServiceError {
    #[error("applicant not found")]
    NotFound,
    #[error(transparent)]
    Store(#[from] StoreError),
}
