use chrono::{DateTime, Utc};
use common::scores::ImageScores;
use serde::{Deserialize, Serialize};

use crate::entity::image_analysis;

/// A fully scored image analysis.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ImageResponse {
    /// Unique image identifier.
    #[schema(example = "3f2b8c1a-9d4e-4f6a-8b2c-1d0e9f8a7b6c")]
    pub id: String,
    /// Public URL of the stored image.
    pub url: String,
    /// Original filename.
    #[schema(example = "sunset.jpg")]
    pub filename: String,
    /// All quality scores.
    pub scores: ImageScores,
    pub created_at: DateTime<Utc>,
}

impl From<image_analysis::Model> for ImageResponse {
    fn from(model: image_analysis::Model) -> Self {
        Self {
            id: model.id,
            url: model.url,
            filename: model.filename,
            scores: model.scores,
            created_at: model.created_at,
        }
    }
}

/// Summary row for paginated listings.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ImageListItem {
    pub id: String,
    pub url: String,
    pub filename: String,
    /// The record's `scores.overall.score`.
    #[schema(example = 82)]
    pub overall_score: i32,
    pub created_at: DateTime<Utc>,
}

impl From<image_analysis::Model> for ImageListItem {
    fn from(model: image_analysis::Model) -> Self {
        Self {
            id: model.id,
            url: model.url,
            filename: model.filename,
            overall_score: model.scores.overall.score,
            created_at: model.created_at,
        }
    }
}

/// Paginated listing envelope.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ImageListResponse {
    pub images: Vec<ImageListItem>,
    /// Total records across all pages, independent of the requested page.
    #[schema(example = 47)]
    pub total: u64,
    /// Current page number (1-based).
    #[schema(example = 1)]
    pub page: u64,
    /// Number of items per page.
    #[schema(example = 10)]
    pub page_size: u64,
    /// Total number of pages, at least 1.
    #[schema(example = 5)]
    pub total_pages: u64,
}

#[derive(Deserialize, utoipa::IntoParams)]
pub struct ImageListQuery {
    /// Page number (1-based).
    #[param(example = 1)]
    pub page: Option<u64>,
    /// Items per page (1-100).
    #[param(example = 10)]
    pub page_size: Option<u64>,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct UrlRequest {
    pub url: String,
}

/// Image URLs discovered on a scraped page.
#[derive(Serialize, utoipa::ToSchema)]
pub struct UrlImagesResponse {
    pub images: Vec<String>,
    pub count: usize,
}

/// Per-file failure in a batch upload.
#[derive(Serialize, utoipa::ToSchema)]
pub struct UploadFailure {
    pub filename: String,
    pub error: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct BatchAnalysisResponse {
    pub results: Vec<ImageResponse>,
    pub failed: Vec<UploadFailure>,
}

/// Per-URL failure in a batch URL analysis.
#[derive(Serialize, utoipa::ToSchema)]
pub struct UrlFailure {
    pub url: String,
    pub error: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct UrlBatchAnalysisResponse {
    pub results: Vec<ImageResponse>,
    pub failed: Vec<UrlFailure>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct DeleteResponse {
    pub message: String,
    pub id: String,
}

/// Per-id failure in a batch delete.
#[derive(Serialize, utoipa::ToSchema)]
pub struct DeleteFailure {
    pub id: String,
    pub error: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct DeleteBatchResponse {
    pub deleted: Vec<String>,
    pub failed: Vec<DeleteFailure>,
    /// Number of records actually deleted.
    pub count: usize,
}

/// Ceiling division, floored at one so an empty result set still reports a
/// single page.
pub fn total_pages(total: u64, page_size: u64) -> u64 {
    Ord::max(total.div_ceil(page_size), 1)
}
