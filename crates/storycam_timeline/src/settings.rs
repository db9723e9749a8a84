// SPDX-License-Identifier: MIT OR Apache-2.0
//! Timeline and flight tuning.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How flights are built from projections
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightSettings {
    /// Longest wait for a projection's asset before giving up (seconds)
    pub readiness_timeout_secs: f32,
    /// Distance of the orbit target ahead of the camera
    pub look_distance: f32,
    /// Widen the target field of view with the safe-FOV heuristic
    pub widen_field_of_view: bool,
}

impl Default for FlightSettings {
    fn default() -> Self {
        Self {
            readiness_timeout_secs: 4.0,
            look_distance: 10.0,
            widen_field_of_view: true,
        }
    }
}

impl FlightSettings {
    /// Readiness timeout as a duration
    pub fn readiness_timeout(&self) -> Duration {
        Duration::try_from_secs_f32(self.readiness_timeout_secs).unwrap_or(Duration::from_secs(4))
    }
}

/// Timeline behaviour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineSettings {
    /// Flight duration when scrubbing switches cameras (ms)
    pub scrub_transition_ms: f32,
    /// Flight duration for explicit selection and autoplay (ms)
    pub cinematic_transition_ms: f32,
    /// Autoplay cycling period when there is no timeline (seconds)
    pub auto_cycle_interval_secs: f32,
    /// Whether the camera follows the timeline on mount
    pub auto_enabled: bool,
    /// Flight construction
    pub flight: FlightSettings,
}

impl Default for TimelineSettings {
    fn default() -> Self {
        Self {
            scrub_transition_ms: 1000.0,
            cinematic_transition_ms: 1800.0,
            auto_cycle_interval_secs: 8.0,
            auto_enabled: true,
            flight: FlightSettings::default(),
        }
    }
}

impl TimelineSettings {
    /// Autoplay cycling period. Zero disables cycling.
    pub fn auto_cycle_interval(&self) -> Duration {
        Duration::try_from_secs_f32(self.auto_cycle_interval_secs).unwrap_or(Duration::ZERO)
    }
}
