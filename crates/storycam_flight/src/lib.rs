// SPDX-License-Identifier: MIT OR Apache-2.0
//! Camera flights for story viewers.
//!
//! This crate moves a live camera between authored viewpoints:
//! - Pose sampling and look-target derivation
//! - Distance-adaptive flight timing
//! - Straight or lofted flight paths
//! - Per-frame transition animation
//! - Last-request-wins supervision
//!
//! ## Architecture
//!
//! Everything is driven by an externally invoked tick. The host calls
//! [`TransitionSupervisor::tick`] once per rendered frame; each in-flight
//! [`TransitionAnimator`] checks its [`CancelToken`] before it writes to the
//! shared [`CameraOperator`], so a superseded flight never commits another
//! mutation. Completion is exposed as a [`FlightCompletion`] future.

pub mod animator;
pub mod completion;
pub mod duration;
pub mod easing;
pub mod operator;
pub mod path;
pub mod pose;
pub mod readiness;
pub mod supervisor;

pub use animator::{AnimatorState, TransitionAnimator, TransitionRequest};
pub use completion::{completion_channel, CompletionSender, FlightCompletion, FlightOutcome};
pub use duration::{flight_timing, proximity_ratio, timing_for_distance, FlightTiming};
pub use easing::Easing;
pub use operator::{
    share, CameraOperator, CameraRig, ControlLease, OrbitController, PerspectiveCamera,
    SharedOperator, WeakOperator,
};
pub use path::{FlightPath, LoftedSpline};
pub use pose::{safe_field_of_view, sample_pose, CameraPose};
pub use readiness::ReadinessWait;
pub use supervisor::{CancelToken, TransitionSupervisor};
