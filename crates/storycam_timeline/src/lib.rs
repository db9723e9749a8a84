// SPDX-License-Identifier: MIT OR Apache-2.0
//! Story timeline for camera flights.
//!
//! This crate ties authored story data to the flight subsystem:
//! - Projections with time-indexed keyframe poses
//! - Camera tracks ordered along a scrubbable timeline
//! - A flight director that resolves projection ids into flights
//! - A timeline controller for scrubbing, playback and autoplay cycling
//!
//! Every camera move, whether scrub-driven, explicitly selected or cycled,
//! funnels through one [`FlightDirector`], so the newest request always wins.

pub mod director;
pub mod error;
pub mod projection;
pub mod settings;
pub mod story;
pub mod timeline;
pub mod track;

pub use director::{AlwaysReady, AssetLoader, FlightDirector};
pub use error::StoryError;
pub use projection::{KeyframeRotation, Projection, ProjectionKeyframe};
pub use settings::{FlightSettings, TimelineSettings};
pub use story::{Story, StoryDocument};
pub use timeline::{SelectOptions, TimelineController, TimelineState};
pub use track::CameraTrack;
