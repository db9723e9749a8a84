// SPDX-License-Identifier: MIT OR Apache-2.0
//! Camera tracks on the story timeline.

use serde::{Deserialize, Serialize};

/// A named entry point into a projection, placed on the timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraTrack {
    /// Unique track id
    pub id: String,
    /// Display label
    #[serde(default)]
    pub label: String,
    /// Timeline time (seconds) from which this camera is active
    #[serde(default)]
    pub start_time: f32,
    /// Projection this track flies to
    #[serde(rename = "src")]
    pub source_projection_id: String,
}

impl CameraTrack {
    /// Create a new camera track
    pub fn new(
        id: impl Into<String>,
        start_time: f32,
        source_projection_id: impl Into<String>,
    ) -> Self {
        let id = id.into();
        Self {
            label: id.clone(),
            id,
            start_time,
            source_projection_id: source_projection_id.into(),
        }
    }

    /// Set the display label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
}

/// Sort tracks by start time, keeping authored order for ties.
pub(crate) fn sort_tracks(tracks: &mut [CameraTrack]) {
    tracks.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));
}

/// Track with the greatest start time at or before `time`.
///
/// `tracks` must be sorted by start time.
pub(crate) fn track_at(tracks: &[CameraTrack], time: f32) -> Option<&CameraTrack> {
    let mut found = None;
    for track in tracks {
        if track.start_time > time {
            break;
        }
        found = Some(track);
    }
    found
}

/// Track following `current` in order, wrapping. The first track when
/// `current` is unknown.
pub(crate) fn track_after<'a>(tracks: &'a [CameraTrack], current: Option<&str>) -> Option<&'a CameraTrack> {
    let next = current
        .and_then(|id| tracks.iter().position(|t| t.id == id))
        .map_or(0, |idx| (idx + 1) % tracks.len());
    tracks.get(next)
}
