use async_trait::async_trait;

use super::domain::{Applicant, ApplicantDraft, ApplicantId};

/// Bounded source of store connections shared by every request.
///
/// Implementations hand out one [`ApplicantConnection`] per call; the connection goes back to
/// the source when the value is dropped, so a handler releases it on every exit path simply
/// by letting it fall out of scope.
#[async_trait]
pub trait ApplicantStore: Send + Sync + 'static {
    type Connection: ApplicantConnection;

    /// Waits for a free connection when the source is exhausted.
    async fn acquire(&self) -> Result<Self::Connection, StoreError>;
}

/// A leased connection able to run the applicant statements.
#[async_trait]
pub trait ApplicantConnection: Send {
    async fn select_all(&mut self) -> Result<Vec<Applicant>, StoreError>;

    async fn insert(&mut self, draft: &ApplicantDraft) -> Result<Applicant, StoreError>;

    async fn select_by_id(&mut self, id: ApplicantId) -> Result<Option<Applicant>, StoreError>;

    /// Overwrites all mutable fields; `None` when no row matched.
    async fn update_by_id(
        &mut self,
        id: ApplicantId,
        draft: &ApplicantDraft,
    ) -> Result<Option<Applicant>, StoreError>;

    /// Returns the number of rows removed.
    async fn delete_by_id(&mut self, id: ApplicantId) -> Result<u64, StoreError>;
}

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("statement rejected: {0}")]
    Rejected(String),
}
