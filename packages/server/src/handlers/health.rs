use std::path::Path;

use axum::Json;
use axum::body::Body;
use axum::extract::State;
use axum::http::header;
use axum::response::Response;
use serde::Serialize;
use tracing::instrument;

use crate::error::AppError;
use crate::state::AppState;

/// Liveness plus configuration completeness.
#[derive(Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    #[schema(example = "healthy")]
    pub status: &'static str,
    pub checks: ConfigChecks,
}

/// Whether each required credential/setting is present. The process can be
/// up with incomplete configuration; this is what deploy probes look at.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ConfigChecks {
    pub vision_api_key: bool,
    pub storage_credentials: bool,
    pub database_url: bool,
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    operation_id = "health",
    summary = "Liveness and configuration check",
    responses(
        (status = 200, description = "Process is up", body = HealthResponse),
    ),
)]
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let config = &state.config;
    Json(HealthResponse {
        status: "healthy",
        checks: ConfigChecks {
            vision_api_key: !config.vision.api_key.is_empty(),
            storage_credentials: !config.storage.access_key.is_empty()
                && !config.storage.secret_key.is_empty(),
            database_url: !config.database.url.is_empty(),
        },
    })
}

/// Serve the landing page from the configured static directory, falling
/// back to the copy shipped next to the crate.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Response, AppError> {
    let configured = Path::new(&state.config.server.static_dir).join("index.html");
    let fallback = Path::new(env!("CARGO_MANIFEST_DIR")).join("static/index.html");

    let content = match tokio::fs::read(&configured).await {
        Ok(content) => content,
        Err(_) => tokio::fs::read(&fallback)
            .await
            .map_err(|_| AppError::NotFound("Landing page not found".into()))?,
    };

    let mime = mime_guess::from_path(&configured).first_or_octet_stream();

    Response::builder()
        .header(header::CONTENT_TYPE, mime.as_ref())
        .body(Body::from(content))
        .map_err(|e| AppError::Internal(e.to_string()))
}
