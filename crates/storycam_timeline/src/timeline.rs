// SPDX-License-Identifier: MIT OR Apache-2.0
//! Scrub position, playback clock and autoplay cycling.

use crate::director::FlightDirector;
use crate::settings::TimelineSettings;
use crate::story::Story;
use crate::track::CameraTrack;
use serde::Serialize;
use std::time::Duration;
use storycam_flight::{CameraPose, FlightCompletion};

/// Observable timeline state
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineState {
    /// Scrub position, always within `[0, max_time]`
    pub current_time: f32,
    /// Timeline length (seconds), 0 when the story has no timeline
    pub max_time: f32,
    /// Whether the playback clock is running
    pub is_playing: bool,
    /// Whether the camera follows the timeline and autoplay cycles
    pub auto_enabled: bool,
    /// Camera track the camera was last sent to
    pub active_camera_id: Option<String>,
}

/// Options for an explicit camera selection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectOptions {
    /// Also move the scrub position to the track's start time
    pub set_timeline: bool,
    /// Flight duration (ms); the cinematic default when `None`
    pub transition_duration_ms: Option<f32>,
}

impl Default for SelectOptions {
    fn default() -> Self {
        Self {
            set_timeline: true,
            transition_duration_ms: None,
        }
    }
}

/// Owns the timeline state and issues every camera flight
pub struct TimelineController {
    story: Story,
    director: FlightDirector,
    settings: TimelineSettings,
    state: TimelineState,
    cycle_elapsed: Duration,
}

impl TimelineController {
    /// Mount a timeline for `story`. The first camera track starts active.
    pub fn new(story: Story, director: FlightDirector, settings: TimelineSettings) -> Self {
        let state = TimelineState {
            current_time: 0.0,
            max_time: story.max_timeline_time(),
            is_playing: false,
            auto_enabled: settings.auto_enabled,
            active_camera_id: story.camera_tracks().first().map(|t| t.id.clone()),
        };

        Self {
            story,
            director,
            settings,
            state,
            cycle_elapsed: Duration::ZERO,
        }
    }

    /// Current state
    pub fn state(&self) -> &TimelineState {
        &self.state
    }

    /// The story being played
    pub fn story(&self) -> &Story {
        &self.story
    }

    /// The flight director
    pub fn director(&self) -> &FlightDirector {
        &self.director
    }

    /// Mutable flight director
    pub fn director_mut(&mut self) -> &mut FlightDirector {
        &mut self.director
    }

    /// Settings in use
    pub fn settings(&self) -> &TimelineSettings {
        &self.settings
    }

    /// Whether autoplay cycling applies: no timeline, several cameras
    pub fn cycles(&self) -> bool {
        self.state.auto_enabled && self.state.max_time <= 0.0 && self.story.camera_tracks().len() > 1
    }

    /// Move the scrub position.
    ///
    /// With auto enabled and a timeline present, flies to the camera track
    /// active at the new time if it differs from the current one.
    pub fn seek(&mut self, time: f32) -> Option<FlightCompletion> {
        if time.is_nan() {
            return None;
        }
        self.state.current_time = time.clamp(0.0, self.state.max_time);

        if !self.state.auto_enabled || self.state.max_time <= 0.0 {
            return None;
        }

        let track = self.story.track_at(self.state.current_time)?;
        if self.state.active_camera_id.as_deref() == Some(track.id.as_str()) {
            return None;
        }

        tracing::info!(
            camera = %track.id,
            time = self.state.current_time,
            "Timeline switched camera"
        );
        self.state.active_camera_id = Some(track.id.clone());
        Some(self.director.fly_to(
            &self.story,
            &track.source_projection_id,
            self.settings.scrub_transition_ms,
        ))
    }

    /// Start or stop the playback clock. Returns whether it is now playing.
    pub fn toggle_play(&mut self) -> bool {
        self.state.is_playing = !self.state.is_playing;
        tracing::info!(playing = self.state.is_playing, "Playback toggled");
        self.state.is_playing
    }

    /// Toggle auto mode. Re-enabling resyncs the camera with the timeline.
    pub fn toggle_auto(&mut self) -> Option<FlightCompletion> {
        self.state.auto_enabled = !self.state.auto_enabled;
        self.cycle_elapsed = Duration::ZERO;
        tracing::info!(auto = self.state.auto_enabled, "Auto mode toggled");

        if self.state.auto_enabled {
            self.seek(self.state.current_time)
        } else {
            None
        }
    }

    /// Fly to an explicitly chosen camera track.
    ///
    /// Ignored for unknown tracks and tracks whose projection is not
    /// camera-selectable. Moving the scrub position here never re-resolves
    /// the camera, so the selection stands even when another track shares
    /// its start time.
    pub fn select_camera(&mut self, track_id: &str, options: SelectOptions) -> Option<FlightCompletion> {
        let Some(track) = self.story.camera_track(track_id) else {
            tracing::debug!(track_id, "Unknown camera track");
            return None;
        };
        let selectable = self
            .story
            .projection(&track.source_projection_id)
            .is_some_and(|p| p.camera_selectable);
        if !selectable {
            tracing::debug!(track_id, "Camera is not selectable");
            return None;
        }

        let start_time = track.start_time;
        self.state.active_camera_id = Some(track.id.clone());
        let completion = self.director.fly_to(
            &self.story,
            &track.source_projection_id,
            options
                .transition_duration_ms
                .unwrap_or(self.settings.cinematic_transition_ms),
        );
        self.cycle_elapsed = Duration::ZERO;

        if options.set_timeline && self.state.max_time > 0.0 {
            self.state.current_time = start_time.clamp(0.0, self.state.max_time);
        }
        Some(completion)
    }

    /// Fly to the active camera track with a cinematic flight
    pub fn fly_to_active(&mut self) -> Option<FlightCompletion> {
        let projection_id = self.active_track()?.source_projection_id.clone();
        Some(self.director.fly_to(
            &self.story,
            &projection_id,
            self.settings.cinematic_transition_ms,
        ))
    }

    /// The active camera track
    pub fn active_track(&self) -> Option<&CameraTrack> {
        self.story.camera_track(self.state.active_camera_id.as_deref()?)
    }

    /// Camera tracks the viewer may offer for explicit selection
    pub fn selectable_tracks(&self) -> impl Iterator<Item = &CameraTrack> {
        self.story.camera_tracks().iter().filter(|track| {
            self.story
                .projection(&track.source_projection_id)
                .is_some_and(|p| p.camera_selectable)
        })
    }

    /// Active projection's keyframe pose at the current time
    pub fn follow_pose(&self) -> Option<CameraPose> {
        let track = self.active_track()?;
        let projection = self.story.projection(&track.source_projection_id)?;
        projection.pose_at(self.state.current_time - track.start_time)
    }

    /// Active projection's context text at the current time
    pub fn active_context(&self) -> Option<&str> {
        let track = self.active_track()?;
        let projection = self.story.projection(&track.source_projection_id)?;
        projection.context_at(self.state.current_time - track.start_time)
    }

    /// Advance the playback clock, autoplay timer and flights by one frame
    pub fn tick(&mut self, dt: Duration) {
        if self.state.is_playing && self.state.max_time > 0.0 {
            let mut next = self.state.current_time + dt.as_secs_f32();
            if next >= self.state.max_time {
                next = 0.0;
            }
            self.seek(next);
        }

        if self.cycles() {
            let interval = self.settings.auto_cycle_interval();
            self.cycle_elapsed += dt;
            if !interval.is_zero() && self.cycle_elapsed >= interval {
                self.cycle_elapsed = Duration::ZERO;
                self.advance_camera();
            }
        }

        self.director.tick(dt);
    }

    fn advance_camera(&mut self) -> Option<FlightCompletion> {
        let track = self
            .story
            .track_after(self.state.active_camera_id.as_deref())?;

        tracing::info!(camera = %track.id, "Autoplay advanced camera");
        self.state.active_camera_id = Some(track.id.clone());
        Some(self.director.fly_to(
            &self.story,
            &track.source_projection_id,
            self.settings.cinematic_transition_ms,
        ))
    }
}
