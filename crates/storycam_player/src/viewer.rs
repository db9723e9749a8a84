// SPDX-License-Identifier: MIT OR Apache-2.0
//! Presentation surface over the timeline.
//!
//! The viewer owns the camera rig and the timeline controller. UI events
//! arrive through the `on_*` callbacks; the host drives [`StoryViewer::frame`]
//! once per rendered frame and reads [`StoryViewer::snapshot`] for display.

use crate::assets::StagedAssets;
use crate::settings::PlayerSettings;
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use storycam_flight::{sample_pose, CameraPose, CameraRig, FlightCompletion, SharedOperator};
use storycam_timeline::{FlightDirector, SelectOptions, Story, TimelineController, TimelineState};

/// What the viewer shows for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewerSnapshot {
    /// Timeline state
    #[serde(flatten)]
    pub timeline: TimelineState,
    /// Whether keyframe following is on
    pub follow_enabled: bool,
    /// Whether a flight is running or waiting for its asset
    pub flying: bool,
    /// Live camera pose
    pub camera: CameraPose,
    /// Context text of the active projection
    pub context: Option<String>,
}

/// Headless story viewer
pub struct StoryViewer {
    rig: Arc<Mutex<CameraRig>>,
    timeline: TimelineController,
    follow_enabled: bool,
    frames: u64,
}

impl StoryViewer {
    /// Mount a viewer for `story` and fly to its first camera
    pub fn new(story: Story, settings: &PlayerSettings) -> Self {
        let rig = Arc::new(Mutex::new(CameraRig::default()));
        let operator: SharedOperator = rig.clone();

        let load_delay =
            Duration::try_from_secs_f32(settings.asset_load_delay_secs).unwrap_or(Duration::ZERO);
        let director = FlightDirector::new(operator, settings.timeline.flight.clone())
            .with_assets(StagedAssets::uniform(&story, load_delay));

        let mut timeline = TimelineController::new(story, director, settings.timeline.clone());
        let _mount_flight = timeline.fly_to_active();

        tracing::info!(
            cameras = timeline.story().camera_tracks().len(),
            max_time = timeline.state().max_time,
            "Viewer mounted"
        );

        Self {
            rig,
            timeline,
            follow_enabled: false,
            frames: 0,
        }
    }

    /// The timeline controller
    pub fn timeline(&self) -> &TimelineController {
        &self.timeline
    }

    /// Frames rendered so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Play/pause button
    pub fn on_play_toggle(&mut self) -> bool {
        self.timeline.toggle_play()
    }

    /// Auto button
    pub fn on_auto_toggle(&mut self) -> Option<FlightCompletion> {
        self.timeline.toggle_auto()
    }

    /// Follow button. Returns whether following is now on.
    pub fn on_follow_toggle(&mut self) -> bool {
        self.follow_enabled = !self.follow_enabled;
        tracing::info!(follow = self.follow_enabled, "Follow toggled");
        self.follow_enabled
    }

    /// Camera thumbnail click
    pub fn on_camera_select(&mut self, track_id: &str) -> Option<FlightCompletion> {
        self.timeline.select_camera(track_id, SelectOptions::default())
    }

    /// Scrub bar moved
    pub fn on_time_change(&mut self, time: f32) -> Option<FlightCompletion> {
        self.timeline.seek(time)
    }

    /// Advance one rendered frame
    pub fn frame(&mut self, dt: Duration) {
        self.timeline.tick(dt);

        if self.follow_enabled
            && self.timeline.state().is_playing
            && !self.timeline.director().is_flying()
        {
            if let Some(pose) = self.timeline.follow_pose() {
                let director = self.timeline.director_mut();
                let target = director.target_pose(pose);
                director.snap_to(target);
            }
        }

        self.frames += 1;
    }

    /// Current display state
    pub fn snapshot(&self) -> ViewerSnapshot {
        ViewerSnapshot {
            timeline: self.timeline.state().clone(),
            follow_enabled: self.follow_enabled,
            flying: self.timeline.director().is_flying(),
            camera: sample_pose(&*self.rig.lock()),
            context: self.timeline.active_context().map(str::to_owned),
        }
    }
}
