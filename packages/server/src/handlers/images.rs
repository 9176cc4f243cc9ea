use axum::Json;
use axum::extract::multipart::Field;
use axum::extract::{DefaultBodyLimit, Multipart, Path, Query, State};
use common::storage::{StoredImage, extension_of};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::models::image::{
    BatchAnalysisResponse, DeleteBatchResponse, DeleteFailure, DeleteResponse, ImageListItem,
    ImageListQuery, ImageListResponse, ImageResponse, UploadFailure, UrlBatchAnalysisResponse,
    UrlFailure, UrlImagesResponse, UrlRequest, total_pages,
};
use crate::repo;
use crate::state::AppState;
use crate::utils::{fetch, scrape};

/// Content types accepted for analysis.
pub const ALLOWED_CONTENT_TYPES: [&str; 4] =
    ["image/jpeg", "image/png", "image/webp", "image/gif"];

/// Per-file size ceiling, checked after the full body is read.
pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

/// Multipart routes may carry several files; leave headroom over the
/// per-file ceiling.
pub fn upload_body_limit() -> DefaultBodyLimit {
    DefaultBodyLimit::max(64 * 1024 * 1024) // 64 MB
}

fn validate_image(content_type: &str, size: usize) -> Result<(), AppError> {
    if !ALLOWED_CONTENT_TYPES.contains(&content_type) {
        return Err(AppError::Validation(format!(
            "Invalid file type. Allowed types: {}",
            ALLOWED_CONTENT_TYPES.join(", ")
        )));
    }
    if size > MAX_FILE_SIZE {
        return Err(AppError::Validation(format!(
            "File too large. Maximum size: {} MB",
            MAX_FILE_SIZE / (1024 * 1024)
        )));
    }
    Ok(())
}

/// Run the validate → upload → analyze → persist pipeline for one image.
///
/// Validation failures happen before any upload. Once bytes are stored, a
/// failure in analysis or persistence triggers a best-effort delete of the
/// uploaded object so nothing unreferenced is left behind; the original
/// error is then surfaced unchanged.
pub(crate) async fn analyze_bytes(
    state: &AppState,
    data: &[u8],
    filename: &str,
    content_type: &str,
) -> Result<ImageResponse, AppError> {
    validate_image(content_type, data.len())?;

    let stored = state.store.upload(data, filename, content_type).await?;

    match score_and_persist(state, &stored, filename).await {
        Ok(response) => Ok(response),
        Err(err) => {
            let extension = extension_of(filename);
            if let Err(cleanup_err) = state.store.delete(&stored.id, extension).await {
                tracing::warn!(
                    id = %stored.id,
                    error = %cleanup_err,
                    "cleanup of uploaded object failed"
                );
            }
            Err(err)
        }
    }
}

async fn score_and_persist(
    state: &AppState,
    stored: &StoredImage,
    filename: &str,
) -> Result<ImageResponse, AppError> {
    let scores = state.vision.analyze(&stored.url).await?;
    let record = repo::save_analysis(
        &state.db,
        stored.id.clone(),
        stored.url.clone(),
        filename.to_string(),
        scores,
    )
    .await?;
    Ok(record.into())
}

/// Outcome of the two delete steps. Storage deletion is best-effort; the
/// database record is the source of truth for existence.
#[derive(Clone, Copy, Debug)]
pub(crate) struct DeleteOutcome {
    pub storage_deleted: bool,
    pub record_deleted: bool,
}

/// Delete an analysis: look up the record, attempt the storage delete
/// (failures are logged and swallowed), then remove the record itself.
pub(crate) async fn delete_stored_analysis(
    state: &AppState,
    image_id: &str,
) -> Result<DeleteOutcome, AppError> {
    let record = repo::get_analysis(&state.db, image_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Image not found".into()))?;

    let extension = extension_of(&record.url);
    let storage_deleted = match state.store.delete(image_id, extension).await {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(
                id = %image_id,
                error = %err,
                "storage delete failed, removing record anyway"
            );
            false
        }
    };

    repo::delete_analysis(&state.db, image_id).await?;

    Ok(DeleteOutcome {
        storage_deleted,
        record_deleted: true,
    })
}

struct FileUpload {
    filename: String,
    content_type: String,
    data: axum::body::Bytes,
}

async fn read_file_field(field: Field<'_>) -> Result<FileUpload, AppError> {
    let filename = field.file_name().unwrap_or("image.jpg").to_string();
    let content_type = field.content_type().unwrap_or_default().to_string();
    let data = field
        .bytes()
        .await
        .map_err(|e| AppError::Validation(format!("Upload read error: {e}")))?;
    Ok(FileUpload {
        filename,
        content_type,
        data,
    })
}

fn multipart_error(err: axum::extract::multipart::MultipartError) -> AppError {
    AppError::Validation(format!("Multipart error: {err}"))
}

fn filename_from_url(url: &reqwest::Url) -> String {
    url.path()
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
        .unwrap_or("image.jpg")
        .to_string()
}

fn parse_url(raw: &str) -> Result<reqwest::Url, AppError> {
    reqwest::Url::parse(raw).map_err(|e| AppError::Validation(format!("Invalid URL: {e}")))
}

#[utoipa::path(
    post,
    path = "/analyze",
    tag = "Images",
    operation_id = "analyzeImage",
    summary = "Upload and analyze an image",
    description = "Uploads the `file` multipart field to object storage, scores it with the \
        vision model and persists the result. Accepted types: JPEG, PNG, WebP, GIF up to 10 MB.",
    request_body(content_type = "multipart/form-data", description = "Image in the `file` field"),
    responses(
        (status = 200, description = "Analysis result", body = ImageResponse),
        (status = 400, description = "Unsupported type or oversized file (VALIDATION_ERROR)", body = ErrorBody),
        (status = 500, description = "Storage, analysis or database failure", body = ErrorBody),
    ),
)]
#[instrument(skip(state, multipart))]
pub async fn analyze_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ImageResponse>, AppError> {
    let mut upload: Option<FileUpload> = None;
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        match field.name() {
            Some("file") => {
                upload = Some(read_file_field(field).await?);
                break;
            }
            _ => {} // Ignore unknown fields.
        }
    }

    let upload = upload.ok_or_else(|| AppError::Validation("Missing 'file' field".into()))?;
    let response =
        analyze_bytes(&state, &upload.data, &upload.filename, &upload.content_type).await?;
    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/analyze-batch",
    tag = "Images",
    operation_id = "analyzeBatch",
    summary = "Upload and analyze multiple images",
    description = "Runs the analysis pipeline for every `files` multipart field in order. A \
        failing item is reported under `failed` and does not stop the rest of the batch.",
    request_body(content_type = "multipart/form-data", description = "Images in repeated `files` fields"),
    responses(
        (status = 200, description = "Per-item results and failures", body = BatchAnalysisResponse),
        (status = 400, description = "Malformed multipart body (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, multipart))]
pub async fn analyze_batch(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<BatchAnalysisResponse>, AppError> {
    let mut results = Vec::new();
    let mut failed = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some("files") {
            continue;
        }

        let filename = field.file_name().unwrap_or("image.jpg").to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        let data = match field.bytes().await {
            Ok(data) => data,
            Err(err) => {
                failed.push(UploadFailure {
                    filename,
                    error: format!("Upload read error: {err}"),
                });
                continue;
            }
        };

        match analyze_bytes(&state, &data, &filename, &content_type).await {
            Ok(response) => results.push(response),
            Err(err) => failed.push(UploadFailure {
                filename,
                error: err.to_string(),
            }),
        }
    }

    Ok(Json(BatchAnalysisResponse { results, failed }))
}

#[utoipa::path(
    get,
    path = "/{image_id}",
    tag = "Images",
    operation_id = "getImage",
    summary = "Get an analysis by id",
    params(("image_id" = String, Path, description = "Image id")),
    responses(
        (status = 200, description = "Analysis result", body = ImageResponse),
        (status = 404, description = "Unknown id (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_image(
    State(state): State<AppState>,
    Path(image_id): Path<String>,
) -> Result<Json<ImageResponse>, AppError> {
    let record = repo::get_analysis(&state.db, &image_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Image not found".into()))?;
    Ok(Json(record.into()))
}

#[utoipa::path(
    delete,
    path = "/{image_id}",
    tag = "Images",
    operation_id = "deleteImage",
    summary = "Delete an analysis and its stored image",
    description = "Removes the stored bytes (best-effort) and the database record. A storage \
        failure does not keep the record alive.",
    params(("image_id" = String, Path, description = "Image id")),
    responses(
        (status = 200, description = "Deleted", body = DeleteResponse),
        (status = 404, description = "Unknown id (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn delete_image(
    State(state): State<AppState>,
    Path(image_id): Path<String>,
) -> Result<Json<DeleteResponse>, AppError> {
    let outcome = delete_stored_analysis(&state, &image_id).await?;
    tracing::debug!(
        id = %image_id,
        storage_deleted = outcome.storage_deleted,
        record_deleted = outcome.record_deleted,
        "delete finished"
    );
    Ok(Json(DeleteResponse {
        message: "Image deleted successfully".to_string(),
        id: image_id,
    }))
}

#[utoipa::path(
    post,
    path = "/delete-batch",
    tag = "Images",
    operation_id = "deleteBatch",
    summary = "Delete multiple analyses",
    description = "Deletes each id independently; one failure does not block the others.",
    request_body = Vec<String>,
    responses(
        (status = 200, description = "Per-id outcome", body = DeleteBatchResponse),
    ),
)]
#[instrument(skip(state, image_ids))]
pub async fn delete_images_batch(
    State(state): State<AppState>,
    AppJson(image_ids): AppJson<Vec<String>>,
) -> Result<Json<DeleteBatchResponse>, AppError> {
    let mut deleted = Vec::new();
    let mut failed = Vec::new();

    for image_id in image_ids {
        match delete_stored_analysis(&state, &image_id).await {
            Ok(_) => deleted.push(image_id),
            Err(err) => failed.push(DeleteFailure {
                id: image_id,
                error: err.to_string(),
            }),
        }
    }

    let count = deleted.len();
    Ok(Json(DeleteBatchResponse {
        deleted,
        failed,
        count,
    }))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Images",
    operation_id = "listImages",
    summary = "List analyses with pagination",
    description = "Summary rows ordered by `created_at` descending.",
    params(ImageListQuery),
    responses(
        (status = 200, description = "One page of analyses", body = ImageListResponse),
    ),
)]
#[instrument(skip(state, query))]
pub async fn list_images(
    State(state): State<AppState>,
    Query(query): Query<ImageListQuery>,
) -> Result<Json<ImageListResponse>, AppError> {
    let page = Ord::max(query.page.unwrap_or(1), 1);
    let page_size = query.page_size.unwrap_or(10).clamp(1, 100);

    let (rows, total) = repo::list_analyses(&state.db, page, page_size).await?;

    Ok(Json(ImageListResponse {
        images: rows.into_iter().map(ImageListItem::from).collect(),
        total,
        page,
        page_size,
        total_pages: total_pages(total, page_size),
    }))
}

#[utoipa::path(
    post,
    path = "/fetch-from-url",
    tag = "Images",
    operation_id = "fetchImagesFromUrl",
    summary = "Scrape image URLs from a webpage",
    description = "Fetches the page and extracts candidate image URLs from `img` and `source` \
        tags. Best-effort: only URLs with a recognized image extension are returned.",
    request_body = UrlRequest,
    responses(
        (status = 200, description = "Discovered image URLs", body = UrlImagesResponse),
        (status = 400, description = "Invalid URL or fetch failure", body = ErrorBody),
    ),
)]
#[instrument(skip(state, request))]
pub async fn fetch_images_from_url(
    State(state): State<AppState>,
    AppJson(request): AppJson<UrlRequest>,
) -> Result<Json<UrlImagesResponse>, AppError> {
    let base = parse_url(&request.url)?;
    let html = fetch::fetch_page(&state.http, base.clone()).await?;

    let images: Vec<String> = scrape::extract_image_urls(&base, &html)
        .into_iter()
        .collect();
    let count = images.len();

    Ok(Json(UrlImagesResponse { images, count }))
}

#[utoipa::path(
    post,
    path = "/analyze-url",
    tag = "Images",
    operation_id = "analyzeImageUrl",
    summary = "Analyze an image from a URL",
    description = "Downloads the image, then runs the same pipeline as a direct upload.",
    request_body = UrlRequest,
    responses(
        (status = 200, description = "Analysis result", body = ImageResponse),
        (status = 400, description = "Invalid URL, fetch failure, bad type or oversized image", body = ErrorBody),
        (status = 500, description = "Storage, analysis or database failure", body = ErrorBody),
    ),
)]
#[instrument(skip(state, request))]
pub async fn analyze_image_url(
    State(state): State<AppState>,
    AppJson(request): AppJson<UrlRequest>,
) -> Result<Json<ImageResponse>, AppError> {
    let url = parse_url(&request.url)?;
    let (data, content_type) = fetch::download_image(&state.http, url.clone()).await?;

    let filename = filename_from_url(&url);
    let response = analyze_bytes(&state, &data, &filename, &content_type).await?;
    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/analyze-urls",
    tag = "Images",
    operation_id = "analyzeImageUrls",
    summary = "Analyze multiple images from URLs",
    description = "Downloads and analyzes each URL in order. A failing URL is reported under \
        `failed` and does not stop the rest of the batch.",
    request_body = Vec<String>,
    responses(
        (status = 200, description = "Per-URL results and failures", body = UrlBatchAnalysisResponse),
    ),
)]
#[instrument(skip(state, urls))]
pub async fn analyze_image_urls(
    State(state): State<AppState>,
    AppJson(urls): AppJson<Vec<String>>,
) -> Result<Json<UrlBatchAnalysisResponse>, AppError> {
    let mut results = Vec::new();
    let mut failed = Vec::new();

    for raw_url in urls {
        let outcome = async {
            let url = parse_url(&raw_url)?;
            let (data, content_type) = fetch::download_image(&state.http, url.clone()).await?;
            let filename = filename_from_url(&url);
            analyze_bytes(&state, &data, &filename, &content_type).await
        }
        .await;

        match outcome {
            Ok(response) => results.push(response),
            Err(err) => failed.push(UrlFailure {
                url: raw_url,
                error: err.to_string(),
            }),
        }
    }

    Ok(Json(UrlBatchAnalysisResponse { results, failed }))
}
