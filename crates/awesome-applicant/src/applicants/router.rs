use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tracing::error;

use super::domain::{parse_applicant_id, ApplicantDraft};
use super::service::{ApplicantService, ApplicantServiceError};
use super::store::ApplicantStore;

pub const APPLICANT_COLLECTION_PATH: &str = "/awesome/applicant";
pub const APPLICANT_ITEM_PATH: &str = "/awesome/applicant/:id";

const NOT_FOUND_MESSAGE: &str = "Applicant not found";

/// Router builder exposing the applicant CRUD endpoints.
pub fn applicant_router<S>(service: Arc<ApplicantService<S>>) -> Router
where
    S: ApplicantStore,
{
    Router::new()
        .route(
            APPLICANT_COLLECTION_PATH,
            get(list_handler::<S>).post(create_handler::<S>),
        )
        .route(
            APPLICANT_ITEM_PATH,
            get(read_handler::<S>)
                .put(update_handler::<S>)
                .delete(delete_handler::<S>),
        )
        .with_state(service)
}

pub(crate) async fn list_handler<S>(State(service): State<Arc<ApplicantService<S>>>) -> Response
where
    S: ApplicantStore,
{
    match service.list().await {
        Ok(applicants) => (StatusCode::OK, Json(applicants)).into_response(),
        Err(err) => failure_response("list", err, "Internal Server Error"),
    }
}

// Bodies are read leniently: whatever does not parse is bound as NULL and left to the table.
pub(crate) async fn create_handler<S>(
    State(service): State<Arc<ApplicantService<S>>>,
    body: Bytes,
) -> Response
where
    S: ApplicantStore,
{
    let draft = ApplicantDraft::from_body(&body);
    match service.create(draft).await {
        Ok(applicant) => (StatusCode::CREATED, Json(applicant)).into_response(),
        Err(err) => failure_response("insert", err, "Failed to create new record"),
    }
}

pub(crate) async fn read_handler<S>(
    State(service): State<Arc<ApplicantService<S>>>,
    Path(raw_id): Path<String>,
) -> Response
where
    S: ApplicantStore,
{
    // An id that does not parse cannot match a row.
    let Some(id) = parse_applicant_id(&raw_id) else {
        return not_found();
    };

    match service.get(id).await {
        Ok(applicant) => (StatusCode::OK, Json(applicant)).into_response(),
        Err(ApplicantServiceError::NotFound) => not_found(),
        Err(err) => failure_response("query", err, "Failed to retrieve data"),
    }
}

pub(crate) async fn update_handler<S>(
    State(service): State<Arc<ApplicantService<S>>>,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> Response
where
    S: ApplicantStore,
{
    let Some(id) = parse_applicant_id(&raw_id) else {
        return not_found();
    };
    let draft = ApplicantDraft::from_body(&body);

    match service.update(id, draft).await {
        Ok(applicant) => (StatusCode::OK, Json(applicant)).into_response(),
        Err(ApplicantServiceError::NotFound) => not_found(),
        Err(err) => failure_response("update", err, "Failed to update record"),
    }
}

pub(crate) async fn delete_handler<S>(
    State(service): State<Arc<ApplicantService<S>>>,
    Path(raw_id): Path<String>,
) -> Response
where
    S: ApplicantStore,
{
    let Some(id) = parse_applicant_id(&raw_id) else {
        return StatusCode::NO_CONTENT.into_response();
    };

    match service.delete(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => failure_response("delete", err, "Failed to delete record"),
    }
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE).into_response()
}

fn failure_response(
    operation: &'static str,
    err: ApplicantServiceError,
    message: &'static str,
) -> Response {
    error!(operation, error = %err, "applicant store operation failed");
    (StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
}
