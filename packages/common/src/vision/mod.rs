#[cfg(feature = "vision-api")]
pub mod openai;

use async_trait::async_trait;
use thiserror::Error;

use crate::scores::{ImageScores, ScoreError};

/// Errors from the vision assessment backend. Any of these fails the
/// analysis as a whole; a partial assessment is never produced.
#[derive(Debug, Error)]
pub enum VisionError {
    /// The request never produced a usable response.
    #[error("vision request failed: {0}")]
    Request(String),
    /// The model API answered with a non-success status.
    #[error("vision API returned status {status}: {message}")]
    Api { status: u16, message: String },
    /// The model answered but with no content to parse.
    #[error("model returned no content")]
    EmptyResponse,
    /// No JSON score object could be extracted from the model output.
    #[error("model output is not a JSON score object: {0}")]
    Parse(String),
    /// The parsed object breaks the score contract.
    #[error("model output violates the score contract: {0}")]
    Contract(#[from] ScoreError),
}

/// Vision-capable model producing a structured quality assessment for a
/// publicly reachable image URL.
///
/// Models are not deterministic: two calls for the same image may return
/// different scores, and callers must not assume idempotence.
#[async_trait]
pub trait VisionAnalyzer: Send + Sync {
    async fn analyze(&self, image_url: &str) -> Result<ImageScores, VisionError>;
}

/// Parse model output into scores, tolerating code fences or prose around
/// the JSON object.
///
/// Tries a direct parse first; on failure retries on the substring between
/// the first `{` and the last `}`. Every parsed score is then checked
/// against the contract before anything is returned.
pub fn parse_scores(raw: &str) -> Result<ImageScores, VisionError> {
    let scores = match serde_json::from_str::<ImageScores>(raw.trim()) {
        Ok(scores) => scores,
        Err(direct_err) => {
            let object = match (raw.find('{'), raw.rfind('}')) {
                (Some(start), Some(end)) if start < end => &raw[start..=end],
                _ => return Err(VisionError::Parse(direct_err.to_string())),
            };
            serde_json::from_str(object).map_err(|e| VisionError::Parse(e.to_string()))?
        }
    };
    scores.validate()?;
    Ok(scores)
}
