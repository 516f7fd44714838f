//! Axum REST API handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use hackathon_wizard::hackathon::ApiEnvelope;
use hackathon_wizard::{HackathonData, PublishPayload};
use serde::Serialize;
use sqlx::SqlitePool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::db;
use crate::errors::StoreError;

#[derive(Clone)]
pub struct ApiState {
    pub pool: SqlitePool,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/organizations/:org_id/hackathons", post(publish_hackathon))
        .route("/organizations/:org_id/hackathons/drafts", post(create_draft))
        .route(
            "/organizations/:org_id/hackathons/drafts/:draft_id",
            get(get_draft).put(update_draft),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
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

/// `POST /organizations/:org_id/hackathons/drafts`
pub async fn create_draft(
    State(state): State<Arc<ApiState>>,
    Path(org_id): Path<String>,
    Json(sections): Json<HackathonData>,
) -> Response {
    match db::create_draft(&state.pool, &org_id, &sections).await {
        Ok(draft) => (StatusCode::CREATED, Json(ApiEnvelope::ok(draft))).into_response(),
        Err(e) => error_response(e),
    }
}

/// `GET /organizations/:org_id/hackathons/drafts/:draft_id`
pub async fn get_draft(
    State(state): State<Arc<ApiState>>,
    Path((org_id, draft_id)): Path<(String, String)>,
) -> Response {
    match db::get_draft(&state.pool, &org_id, &draft_id).await {
        Ok(draft) => (StatusCode::OK, Json(ApiEnvelope::ok(draft))).into_response(),
        Err(e) => error_response(e),
    }
}

/// `PUT /organizations/:org_id/hackathons/drafts/:draft_id`
///
/// Only the sections present in the body are replaced.
pub async fn update_draft(
    State(state): State<Arc<ApiState>>,
    Path((org_id, draft_id)): Path<(String, String)>,
    Json(sections): Json<HackathonData>,
) -> Response {
    match db::update_draft(&state.pool, &org_id, &draft_id, sections).await {
        Ok(draft) => (StatusCode::OK, Json(ApiEnvelope::ok(draft))).into_response(),
        Err(e) => error_response(e),
    }
}

/// `POST /organizations/:org_id/hackathons`
pub async fn publish_hackathon(
    State(state): State<Arc<ApiState>>,
    Path(org_id): Path<String>,
    Json(payload): Json<PublishPayload>,
) -> Response {
    match db::publish(&state.pool, &org_id, payload).await {
        Ok(hackathon) => (StatusCode::CREATED, Json(ApiEnvelope::ok(hackathon))).into_response(),
        Err(e) => error_response(e),
    }
}

fn error_response(e: StoreError) -> Response {
    let status = match &e {
        StoreError::NotFound(_) => StatusCode::NOT_FOUND,
        StoreError::Conflict(_) => StatusCode::CONFLICT,
        other => {
            error!("Request failed: {other}");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, Json(ApiEnvelope::<()>::error(e.to_string()))).into_response()
}
