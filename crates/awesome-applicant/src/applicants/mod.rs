//! Applicant records: domain types, the pooled store seam, the service, and HTTP routes.

pub mod domain;
pub mod postgres;
pub mod router;
pub mod service;
pub mod store;

#[cfg(test)]
mod tests;

pub use domain::{parse_applicant_id, Applicant, ApplicantDraft, ApplicantId};
pub use postgres::{connection_pool, run_migrations, PgApplicantConnection, PgApplicantStore};
pub use router::{applicant_router, APPLICANT_COLLECTION_PATH, APPLICANT_ITEM_PATH};
pub use service::{ApplicantService, ApplicantServiceError};
pub use store::{ApplicantConnection, ApplicantStore, StoreError};
