// SPDX-License-Identifier: MIT OR Apache-2.0
//! Story loading errors.

/// Error type for loading and validating stories
#[derive(Debug, thiserror::Error)]
pub enum StoryError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parse error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// RON parse error
    #[error("RON error: {0}")]
    Ron(#[from] ron::error::SpannedError),

    /// File extension is neither `json` nor `ron`
    #[error("Unsupported story format: {0}")]
    UnsupportedFormat(String),

    /// Two projections share an id
    #[error("Duplicate projection id: {0}")]
    DuplicateProjection(String),

    /// Two camera tracks share an id
    #[error("Duplicate camera track id: {0}")]
    DuplicateTrack(String),

    /// A camera track points at a projection that does not exist
    #[error("Camera track {track} references unknown projection {projection}")]
    UnknownProjection {
        /// Track id
        track: String,
        /// Missing projection id
        projection: String,
    },

    /// A keyframe time or track start time is not finite
    #[error("Non-finite time in {0}")]
    NonFiniteTime(String),

    /// Timeline length is negative or not finite
    #[error("Invalid timeline length: {0}")]
    InvalidMaxTime(f32),
}
