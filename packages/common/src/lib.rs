pub mod scores;
pub mod storage;
pub mod vision;

pub use scores::{ImageScores, ScoreDetail};
