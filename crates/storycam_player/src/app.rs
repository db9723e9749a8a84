// SPDX-License-Identifier: MIT OR Apache-2.0
//! Headless playback loop.

use crate::settings::{PlayerSettings, SettingsError, SETTINGS_FILE_NAME};
use crate::viewer::{StoryViewer, ViewerSnapshot};
use clap::Parser;
use std::path::PathBuf;
use storycam_timeline::{Story, StoryError};
use thiserror::Error;

/// Command line of the `storycam` binary
#[derive(Parser, Debug, Clone)]
#[command(name = "storycam")]
#[command(about = "Play camera flights over a story timeline", long_about = None)]
pub struct Cli {
    /// Story file (`.json` or `.ron`)
    pub story: PathBuf,

    /// Player settings file (RON). Defaults to `storycam.ron` beside the story.
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Write the effective settings to this path and continue
    #[arg(long)]
    pub save_settings: Option<PathBuf>,

    /// Simulated playback length in seconds
    #[arg(long, default_value_t = 30.0)]
    pub seconds: f32,

    /// Override the frame rate from the settings
    #[arg(long)]
    pub fps: Option<u32>,

    /// Camera track to select after mounting
    #[arg(long)]
    pub select: Option<String>,

    /// Start the playback clock
    #[arg(long)]
    pub play: bool,

    /// Follow projection keyframes while playing
    #[arg(long)]
    pub follow: bool,

    /// Start with auto mode off
    #[arg(long = "no-auto")]
    pub no_auto: bool,
}

/// Errors that stop the player
#[derive(Debug, Error)]
pub enum PlayerError {
    /// Story could not be loaded
    #[error(transparent)]
    Story(#[from] StoryError),

    /// Settings could not be loaded or saved
    #[error(transparent)]
    Settings(#[from] SettingsError),

    /// Snapshot could not be encoded
    #[error("failed to encode snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),

    /// Playback length is NaN or infinite
    #[error("playback length must be finite, got {0}")]
    InvalidSeconds(f32),
}

/// Player application
pub struct PlayerApp {
    viewer: StoryViewer,
    settings: PlayerSettings,
    seconds: f32,
}

impl PlayerApp {
    /// Load the story and settings named on the command line
    pub fn from_cli(cli: &Cli) -> Result<Self, PlayerError> {
        if !cli.seconds.is_finite() {
            return Err(PlayerError::InvalidSeconds(cli.seconds));
        }

        let beside_story = cli
            .story
            .parent()
            .map(|dir| dir.join(SETTINGS_FILE_NAME))
            .filter(|path| path.is_file());
        let mut settings = match cli.settings.as_ref().or(beside_story.as_ref()) {
            Some(path) => PlayerSettings::load(path)?,
            None => PlayerSettings::default(),
        };
        if let Some(fps) = cli.fps {
            settings.frame_rate = fps;
        }
        if cli.no_auto {
            settings.timeline.auto_enabled = false;
        }
        if let Some(path) = &cli.save_settings {
            settings.save(path)?;
            tracing::info!("Saved settings to {:?}", path);
        }

        let story = Story::load(&cli.story)?;
        let mut viewer = StoryViewer::new(story, &settings);
        let selectable: Vec<_> = viewer
            .timeline()
            .selectable_tracks()
            .map(|track| track.label.as_str())
            .collect();
        tracing::info!("Selectable cameras: {}", selectable.join(", "));

        if let Some(track_id) = &cli.select {
            if viewer.on_camera_select(track_id).is_none() {
                tracing::warn!("Camera {track_id} is unknown or not selectable");
            }
        }
        if cli.follow {
            viewer.on_follow_toggle();
        }
        if cli.play {
            viewer.on_play_toggle();
        }

        Ok(Self {
            viewer,
            settings,
            seconds: cli.seconds.max(0.0),
        })
    }

    /// Run the frame loop and return the final snapshot
    pub fn run(&mut self) -> ViewerSnapshot {
        let frame = self.settings.frame_duration();
        let frame_rate = self.settings.frame_rate.max(1);
        let total_frames = (self.seconds * frame_rate as f32).round() as u64;

        for idx in 1..=total_frames {
            self.viewer.frame(frame);
            if idx % u64::from(frame_rate) == 0 {
                let snapshot = self.viewer.snapshot();
                tracing::info!(
                    time = snapshot.timeline.current_time,
                    camera = ?snapshot.timeline.active_camera_id,
                    flying = snapshot.flying,
                    position = ?snapshot.camera.position,
                    "Frame {}",
                    self.viewer.frames()
                );
            }
        }

        self.viewer.snapshot()
    }

    /// Run and encode the final snapshot as JSON
    pub fn run_to_json(&mut self) -> Result<String, PlayerError> {
        let snapshot = self.run();
        Ok(serde_json::to_string_pretty(&snapshot)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STORY_JSON: &str = r#"{
        "projections": [
            {"id": "a", "cameraSelectable": true,
             "keyframes": [{"position": [0, 10, 20], "rotation": [0, 0, 0]}]},
            {"id": "b", "cameraSelectable": true,
             "keyframes": [{"position": [60, 10, 20], "rotation": [0, 0.5, 0], "fov": 45}]}
        ],
        "cameraTracks": [
            {"id": "cam-a", "label": "A", "startTime": 0, "src": "a"},
            {"id": "cam-b", "label": "B", "startTime": 0, "src": "b"}
        ],
        "maxTimelineTime": 0
    }"#;

    fn story_path(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("storycam_app_{}_{name}.json", std::process::id()));
        std::fs::write(&path, STORY_JSON).unwrap();
        path
    }

    #[test]
    fn test_cli_parses_flags() {
        let cli = Cli::parse_from([
            "storycam", "story.ron", "--seconds", "12", "--fps", "24", "--select", "cam-b", "--play",
            "--no-auto",
        ]);
        assert_eq!(cli.story, PathBuf::from("story.ron"));
        assert_eq!(cli.seconds, 12.0);
        assert_eq!(cli.fps, Some(24));
        assert_eq!(cli.select.as_deref(), Some("cam-b"));
        assert!(cli.play && cli.no_auto && !cli.follow);
    }

    #[test]
    fn test_autoplay_run() {
        let path = story_path("autoplay");
        let cli = Cli::parse_from(["storycam", path.to_str().unwrap(), "--seconds", "10"]);
        let app = PlayerApp::from_cli(&cli);
        let _ = std::fs::remove_file(&path);

        // Cycles to the second camera after 8 s and lands before 10 s
        let snapshot = app.unwrap().run();
        assert_eq!(snapshot.timeline.active_camera_id.as_deref(), Some("cam-b"));
        assert!(!snapshot.flying);
        assert_eq!(snapshot.camera.position, glam::Vec3::new(60.0, 10.0, 20.0));
    }

    #[test]
    fn test_selected_camera_without_auto() {
        let path = story_path("select");
        let cli = Cli::parse_from([
            "storycam",
            path.to_str().unwrap(),
            "--select",
            "cam-b",
            "--no-auto",
            "--seconds",
            "20",
            "--fps",
            "30",
        ]);
        let app = PlayerApp::from_cli(&cli);
        let _ = std::fs::remove_file(&path);

        let json = app.unwrap().run_to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["activeCameraId"], "cam-b");
        assert_eq!(value["autoEnabled"], false);
        assert_eq!(value["flying"], false);
        assert_eq!(value["camera"]["position"], serde_json::json!([60.0, 10.0, 20.0]));
    }

    #[test]
    fn test_non_finite_seconds_rejected() {
        for seconds in ["inf", "NaN"] {
            let cli = Cli::parse_from(["storycam", "story.json", "--seconds", seconds]);
            assert!(matches!(
                PlayerApp::from_cli(&cli),
                Err(PlayerError::InvalidSeconds(_))
            ));
        }
    }

    #[test]
    fn test_missing_story_is_an_error() {
        let cli = Cli::parse_from(["storycam", "/nonexistent/story.json"]);
        assert!(matches!(
            PlayerApp::from_cli(&cli),
            Err(PlayerError::Story(StoryError::Io(_)))
        ));
    }
}
