//! Axum REST API handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::debug;

use crate::db;
use crate::events::{ApplicationRecord, EventRecord};
use crate::metadata::{decode_metadata_uri, ApplicationMetadata};

#[derive(Clone)]
pub struct ApiState {
    pub pool: SqlitePool,
}

/// Build the API router.
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/events", get(get_all_events))
        .route("/scholarships/:id/events", get(get_scholarship_events))
        .route("/scholarships/:id/applications", get(get_applications))
        .route(
            "/scholarships/:id/applications/:applicant",
            get(get_application),
        )
        .route("/metadata", post(encode_metadata))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ─────────────────────────────────────────────────────────
// Response shapes
// ─────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct EventsResponse {
    pub scholarship_id: String,
    pub count: usize,
    pub events: Vec<EventRecord>,
}

#[derive(Serialize)]
pub struct AllEventsResponse {
    pub count: usize,
    pub events: Vec<EventRecord>,
}

/// An application with its metadata decoded when it is inline.
#[derive(Serialize)]
pub struct ApplicationView {
    pub applicant: String,
    pub status: String,
    pub metadata_uri: String,
    pub metadata: Option<ApplicationMetadata>,
    pub submitted_ledger: i64,
    pub updated_ledger: i64,
}

impl From<ApplicationRecord> for ApplicationView {
    fn from(record: ApplicationRecord) -> Self {
        let metadata = decode_metadata_uri(&record.metadata_uri).unwrap_or_else(|e| {
            debug!("Undecodable metadata for {}: {e}", record.applicant);
            None
        });
        Self {
            applicant: record.applicant,
            status: record.status,
            metadata_uri: record.metadata_uri,
            metadata,
            submitted_ledger: record.submitted_ledger,
            updated_ledger: record.updated_ledger,
        }
    }
}

#[derive(Serialize)]
pub struct ApplicationsResponse {
    pub scholarship_id: String,
    pub count: usize,
    pub applications: Vec<ApplicationView>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataRequest {
    pub applicant_name: String,
    pub email: String,
    pub essay: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataResponse {
    #[serde(rename = "metadataURI")]
    pub metadata_uri: String,
    pub metadata: ApplicationMetadata,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, error: impl ToString) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
        .into_response()
}

// ─────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────

/// `GET /health`
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `GET /scholarships/:id/events`
///
/// Returns all indexed events for the given scholarship.
pub async fn get_scholarship_events(
    State(state): State<Arc<ApiState>>,
    Path(scholarship_id): Path<String>,
) -> Response {
    match db::get_events_for_scholarship(&state.pool, &scholarship_id).await {
        Ok(events) => {
            let count = events.len();
            Json(EventsResponse {
                scholarship_id,
                count,
                events,
            })
            .into_response()
        }
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, e),
    }
}

/// `GET /events`
///
/// Returns all indexed events across all scholarships.
pub async fn get_all_events(State(state): State<Arc<ApiState>>) -> Response {
    match db::get_all_events(&state.pool).await {
        Ok(events) => {
            let count = events.len();
            Json(AllEventsResponse { count, events }).into_response()
        }
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, e),
    }
}

/// `GET /scholarships/:id/applications`
///
/// Everyone who applied to the scholarship, with their current status.
pub async fn get_applications(
    State(state): State<Arc<ApiState>>,
    Path(scholarship_id): Path<String>,
) -> Response {
    match db::get_applications(&state.pool, &scholarship_id).await {
        Ok(records) => {
            let applications: Vec<ApplicationView> =
                records.into_iter().map(ApplicationView::from).collect();
            Json(ApplicationsResponse {
                scholarship_id,
                count: applications.len(),
                applications,
            })
            .into_response()
        }
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, e),
    }
}

/// `GET /scholarships/:id/applications/:applicant`
pub async fn get_application(
    State(state): State<Arc<ApiState>>,
    Path((scholarship_id, applicant)): Path<(String, String)>,
) -> Response {
    match db::get_application(&state.pool, &scholarship_id, &applicant).await {
        Ok(Some(record)) => Json(ApplicationView::from(record)).into_response(),
        Ok(None) => error_response(
            StatusCode::NOT_FOUND,
            format!("no application from {applicant} for scholarship {scholarship_id}"),
        ),
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, e),
    }
}

/// `POST /metadata`
///
/// Build the inline metadata URI an applicant passes to `submit_application`.
pub async fn encode_metadata(Json(req): Json<MetadataRequest>) -> Response {
    let encoded = ApplicationMetadata::new(req.applicant_name, req.email, req.essay)
        .and_then(|metadata| Ok((metadata.to_data_uri()?, metadata)));

    match encoded {
        Ok((metadata_uri, metadata)) => Json(MetadataResponse {
            metadata_uri,
            metadata,
        })
        .into_response(),
        Err(e) => error_response(StatusCode::BAD_REQUEST, e),
    }
}
