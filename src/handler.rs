//! HTTP request handlers

use crate::age::humanize;
use crate::cache::CacheError;
use crate::render;
use crate::server::AppState;
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use chrono::SecondsFormat;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error};

/// Age information for one version, as rendered or returned as JSON
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionAge {
    pub id: String,
    pub age: String,
    pub is_anniversary: bool,
    /// ISO-8601 release timestamp with an explicit `+00:00` offset
    pub release_time: String,
}

/// Errors surfaced by the version routes
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Unknown version")]
    UnknownVersion,

    #[error(transparent)]
    Cache(#[from] CacheError),
}

impl LookupError {
    fn status(&self) -> StatusCode {
        match self {
            LookupError::UnknownVersion => StatusCode::NOT_FOUND,
            LookupError::Cache(CacheError::NotFound(_)) => StatusCode::NOT_FOUND,
            LookupError::Cache(CacheError::UpstreamUnavailable(_))
            | LookupError::Cache(CacheError::InvalidManifest(_)) => StatusCode::BAD_GATEWAY,
        }
    }

    fn public_message(&self) -> String {
        match self {
            LookupError::Cache(CacheError::UpstreamUnavailable(_)) => {
                "Version manifest unavailable".to_string()
            }
            LookupError::Cache(CacheError::InvalidManifest(_)) => {
                "Version manifest could not be read".to_string()
            }
            other => other.to_string(),
        }
    }

    fn log(&self) {
        if self.status().is_server_error() {
            error!("Request failed: {}", self);
        }
    }
}

impl IntoResponse for LookupError {
    fn into_response(self) -> Response {
        self.log();
        (self.status(), self.public_message()).into_response()
    }
}

/// JSON flavour of [`LookupError`] for the `/api` routes
#[derive(Debug)]
pub struct ApiError(pub LookupError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.0.log();
        (
            self.0.status(),
            Json(json!({"error": self.0.public_message()})),
        )
            .into_response()
    }
}

/// Health check endpoint
pub async fn handle_health() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

/// `GET /` redirects to the newest release's page
pub async fn handle_index(State(state): State<Arc<AppState>>) -> Result<Response, LookupError> {
    let id = state.cache.latest_release_id().await?;
    debug!("Redirecting to latest release {}", id);
    Ok(redirect_to_version(&id))
}

/// `GET /snapshot` redirects to the newest snapshot's page
pub async fn handle_snapshot(
    State(state): State<Arc<AppState>>,
) -> Result<Response, LookupError> {
    let id = state.cache.latest_snapshot_id().await?;
    debug!("Redirecting to latest snapshot {}", id);
    Ok(redirect_to_version(&id))
}

fn redirect_to_version(id: &str) -> Response {
    let location = format!("/{}", urlencoding::encode(id));
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}

/// `GET /<version>` renders the age page
pub async fn handle_version(
    State(state): State<Arc<AppState>>,
    Path(version): Path<String>,
) -> Result<Html<String>, LookupError> {
    let view = lookup(&state, version).await?;
    Ok(Html(render::version_page(&view)))
}

/// `GET /api/versions/<version>` returns the age as JSON
pub async fn handle_version_api(
    State(state): State<Arc<AppState>>,
    Path(version): Path<String>,
) -> Result<Json<VersionAge>, ApiError> {
    lookup(&state, version).await.map(Json).map_err(ApiError)
}

async fn lookup(state: &AppState, id: String) -> Result<VersionAge, LookupError> {
    let release = state
        .cache
        .release_time(&id)
        .await?
        .ok_or(LookupError::UnknownVersion)?;
    let age = humanize(state.clock.now(), release);

    Ok(VersionAge {
        id,
        age: age.text,
        is_anniversary: age.is_anniversary,
        release_time: release.to_rfc3339_opts(SecondsFormat::Secs, false),
    })
}
