//! Error types for the analysis pipeline.
//!
//! Only genuinely fatal conditions live here. Unparsable gaze marks and
//! unmatched alignments are handled in place (skip + diagnostic), per the
//! error policy of the analysis core.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TextGrid {} (line {line}): {message}", path.display())]
    TextGrid {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("TextGrid {} contains no interval tier", path.display())]
    MissingTier { path: PathBuf },

    /// The color tables and the coding scheme are out of sync.
    #[error("No color configured for gaze category {category}")]
    MissingGazeColor { category: u8 },

    #[error("No color configured for condition code '{letter}'")]
    MissingConditionColor { letter: char },

    /// A question mark too short to carry a condition letter (e.g. "T").
    #[error("Question mark {mark:?} carries no condition code")]
    MissingCondition { mark: String },

    #[error("Gaze mark {mark:?} is not a category in 0..=9")]
    InvalidGazeMark { mark: String },

    /// Annotation requires one sample per plot column.
    #[error("Sample count {samples} does not match recurrence plot side {side}")]
    SampleCountMismatch { samples: usize, side: usize },

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T, E = AnalysisError> = std::result::Result<T, E>;
