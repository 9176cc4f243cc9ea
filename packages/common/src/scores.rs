use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Violation of the scoring contract a model response must satisfy.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScoreError {
    #[error("{criterion} score {score} is outside 1-100")]
    OutOfRange { criterion: &'static str, score: i32 },
    #[error("{criterion} explanation is empty")]
    EmptyExplanation { criterion: &'static str },
}

/// A (score, explanation) pair for one quality criterion.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ScoreDetail {
    /// Score from 1-100.
    #[schema(example = 87)]
    pub score: i32,
    /// Brief explanation of the score.
    #[schema(example = "Crisp focus across the subject with no motion blur.")]
    pub explanation: String,
}

impl ScoreDetail {
    fn validate(&self, criterion: &'static str) -> Result<(), ScoreError> {
        if !(1..=100).contains(&self.score) {
            return Err(ScoreError::OutOfRange {
                criterion,
                score: self.score,
            });
        }
        if self.explanation.trim().is_empty() {
            return Err(ScoreError::EmptyExplanation { criterion });
        }
        Ok(())
    }
}

/// The full per-image assessment: six mandatory criteria plus `faces`,
/// which is `None` when the image contains no face.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[cfg_attr(feature = "sea-orm", derive(sea_orm::FromJsonQueryResult))]
pub struct ImageScores {
    /// Focus and clarity of the image.
    pub sharpness: ScoreDetail,
    /// Quality and balance of lighting.
    pub lighting: ScoreDetail,
    /// Framing, rule of thirds, visual balance.
    pub composition: ScoreDetail,
    /// Color accuracy, white balance, saturation.
    pub color: ScoreDetail,
    /// Proper exposure, highlights and shadows.
    pub exposure: ScoreDetail,
    /// Face quality when faces are present, `null` otherwise.
    #[serde(default)]
    pub faces: Option<ScoreDetail>,
    /// Weighted average of all applicable criteria.
    pub overall: ScoreDetail,
}

impl ImageScores {
    /// Check every present criterion against the range and explanation
    /// rules. An assessment is valid as a whole or not at all.
    pub fn validate(&self) -> Result<(), ScoreError> {
        let criteria = [
            ("sharpness", Some(&self.sharpness)),
            ("lighting", Some(&self.lighting)),
            ("composition", Some(&self.composition)),
            ("color", Some(&self.color)),
            ("exposure", Some(&self.exposure)),
            ("faces", self.faces.as_ref()),
            ("overall", Some(&self.overall)),
        ];
        for (criterion, detail) in criteria {
            if let Some(detail) = detail {
                detail.validate(criterion)?;
            }
        }
        Ok(())
    }
}
