// SPDX-License-Identifier: MIT OR Apache-2.0
//! Authored story description.
//!
//! A story is loaded once, validated, and read-only afterwards:
//! - Projections keyed by id, in authored order
//! - Camera tracks sorted by start time
//! - The scrubbable timeline length

use crate::error::StoryError;
use crate::projection::Projection;
use crate::track::{self, CameraTrack};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use storycam_flight::CameraPose;

/// Serialized form of a story
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryDocument {
    /// Camera viewpoints
    pub projections: Vec<Projection>,
    /// Timeline entry points
    #[serde(default)]
    pub camera_tracks: Vec<CameraTrack>,
    /// Length of the scrubbable timeline (seconds), 0 for none
    #[serde(default)]
    pub max_timeline_time: f32,
}

/// A validated story
#[derive(Debug, Clone)]
pub struct Story {
    projections: IndexMap<String, Projection>,
    camera_tracks: Vec<CameraTrack>,
    max_timeline_time: f32,
}

impl Story {
    /// Validate and build a story
    pub fn new(
        projections: Vec<Projection>,
        camera_tracks: Vec<CameraTrack>,
        max_timeline_time: f32,
    ) -> Result<Self, StoryError> {
        if !max_timeline_time.is_finite() || max_timeline_time < 0.0 {
            return Err(StoryError::InvalidMaxTime(max_timeline_time));
        }

        let mut by_id = IndexMap::with_capacity(projections.len());
        for mut projection in projections {
            if projection.keyframes.iter().any(|k| !k.time.is_finite()) {
                return Err(StoryError::NonFiniteTime(format!("projection {}", projection.id)));
            }
            projection.sort_keyframes();
            if by_id.contains_key(&projection.id) {
                return Err(StoryError::DuplicateProjection(projection.id));
            }
            by_id.insert(projection.id.clone(), projection);
        }

        let mut camera_tracks = camera_tracks;
        for (idx, camera_track) in camera_tracks.iter().enumerate() {
            if !camera_track.start_time.is_finite() {
                return Err(StoryError::NonFiniteTime(format!("camera track {}", camera_track.id)));
            }
            if camera_tracks[..idx].iter().any(|t| t.id == camera_track.id) {
                return Err(StoryError::DuplicateTrack(camera_track.id.clone()));
            }
            if !by_id.contains_key(&camera_track.source_projection_id) {
                return Err(StoryError::UnknownProjection {
                    track: camera_track.id.clone(),
                    projection: camera_track.source_projection_id.clone(),
                });
            }
        }
        track::sort_tracks(&mut camera_tracks);

        Ok(Self {
            projections: by_id,
            camera_tracks,
            max_timeline_time,
        })
    }

    /// Validate a deserialized document
    pub fn from_document(document: StoryDocument) -> Result<Self, StoryError> {
        Self::new(
            document.projections,
            document.camera_tracks,
            document.max_timeline_time,
        )
    }

    /// Parse a JSON story
    pub fn from_json_str(content: &str) -> Result<Self, StoryError> {
        Self::from_document(serde_json::from_str(content)?)
    }

    /// Parse a RON story
    pub fn from_ron_str(content: &str) -> Result<Self, StoryError> {
        Self::from_document(ron::from_str(content)?)
    }

    /// Load a story file, choosing the format by extension
    pub fn load(path: &Path) -> Result<Self, StoryError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let content = std::fs::read_to_string(path)?;

        let story = match extension.as_str() {
            "json" => Self::from_json_str(&content)?,
            "ron" => Self::from_ron_str(&content)?,
            _ => return Err(StoryError::UnsupportedFormat(path.display().to_string())),
        };

        tracing::info!(
            "Loaded story {:?}: {} projections, {} camera tracks",
            path,
            story.projections.len(),
            story.camera_tracks.len()
        );
        Ok(story)
    }

    /// Serializable copy of this story
    pub fn to_document(&self) -> StoryDocument {
        StoryDocument {
            projections: self.projections.values().cloned().collect(),
            camera_tracks: self.camera_tracks.clone(),
            max_timeline_time: self.max_timeline_time,
        }
    }

    /// Get a projection
    pub fn projection(&self, id: &str) -> Option<&Projection> {
        self.projections.get(id)
    }

    /// All projections in authored order
    pub fn projections(&self) -> impl Iterator<Item = &Projection> {
        self.projections.values()
    }

    /// Camera tracks sorted by start time
    pub fn camera_tracks(&self) -> &[CameraTrack] {
        &self.camera_tracks
    }

    /// Get a camera track
    pub fn camera_track(&self, id: &str) -> Option<&CameraTrack> {
        self.camera_tracks.iter().find(|t| t.id == id)
    }

    /// Length of the scrubbable timeline (seconds)
    pub fn max_timeline_time(&self) -> f32 {
        self.max_timeline_time
    }

    /// Track with the greatest start time at or before `time`
    pub fn track_at(&self, time: f32) -> Option<&CameraTrack> {
        track::track_at(&self.camera_tracks, time)
    }

    /// Track after `current`, wrapping around
    pub fn track_after(&self, current: Option<&str>) -> Option<&CameraTrack> {
        track::track_after(&self.camera_tracks, current)
    }

    /// Pose a flight to `projection_id` should arrive at
    pub fn entry_pose(&self, projection_id: &str) -> Option<CameraPose> {
        self.projection(projection_id)?.entry_pose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STORY_JSON: &str = r##"{
        "projections": [
            {
                "id": "overview",
                "cameraSelectable": true,
                "keyframes": [
                    {"time": 0, "position": [0, 40, 80], "rotation": [-0.4, 0, 0], "fov": 50, "far": 900,
                     "context": "# Overview"}
                ]
            },
            {
                "id": "pier",
                "keyframes": [
                    {"time": 0, "position": [120, 5, -30], "rotation": [0, 0, 0, 1]}
                ]
            }
        ],
        "cameraTracks": [
            {"id": "pier-cam", "label": "Pier", "startTime": 60, "src": "pier"},
            {"id": "overview-cam", "label": "Overview", "startTime": 0, "src": "overview"}
        ],
        "maxTimelineTime": 120
    }"##;

    #[test]
    fn test_parse_json() {
        let story = Story::from_json_str(STORY_JSON).unwrap();
        assert_eq!(story.max_timeline_time(), 120.0);
        assert_eq!(story.camera_tracks()[0].id, "overview-cam");
        assert!(story.projection("overview").unwrap().camera_selectable);
        assert!(!story.projection("pier").unwrap().camera_selectable);
        assert_eq!(story.entry_pose("overview").unwrap().field_of_view, Some(50.0));
        assert!(story.entry_pose("nowhere").is_none());
    }

    #[test]
    fn test_ron_round_trip() {
        let story = Story::from_json_str(STORY_JSON).unwrap();
        let ron_str =
            ron::ser::to_string_pretty(&story.to_document(), ron::ser::PrettyConfig::default())
                .unwrap();
        let loaded = Story::from_ron_str(&ron_str).unwrap();
        assert_eq!(loaded.camera_tracks(), story.camera_tracks());
        assert_eq!(loaded.projection("pier"), story.projection("pier"));
    }

    #[test]
    fn test_unknown_projection_rejected() {
        let result = Story::new(
            vec![Projection::new("a")],
            vec![CameraTrack::new("cam", 0.0, "b")],
            10.0,
        );
        assert!(matches!(result, Err(StoryError::UnknownProjection { .. })));
    }

    #[test]
    fn test_duplicates_rejected() {
        let projections = vec![Projection::new("a"), Projection::new("a")];
        assert!(matches!(
            Story::new(projections, Vec::new(), 0.0),
            Err(StoryError::DuplicateProjection(_))
        ));

        let tracks = vec![CameraTrack::new("cam", 0.0, "a"), CameraTrack::new("cam", 5.0, "a")];
        assert!(matches!(
            Story::new(vec![Projection::new("a")], tracks, 0.0),
            Err(StoryError::DuplicateTrack(_))
        ));
    }

    #[test]
    fn test_invalid_max_time_rejected() {
        assert!(matches!(
            Story::new(Vec::new(), Vec::new(), -1.0),
            Err(StoryError::InvalidMaxTime(_))
        ));
        assert!(Story::new(Vec::new(), Vec::new(), f32::NAN).is_err());
    }

    #[test]
    fn test_unsupported_extension() {
        let path = std::env::temp_dir().join("storycam_unsupported_story.yaml");
        std::fs::write(&path, "projections: []").unwrap();
        let result = Story::load(&path);
        let _ = std::fs::remove_file(&path);
        assert!(matches!(result, Err(StoryError::UnsupportedFormat(_))));
    }
}
