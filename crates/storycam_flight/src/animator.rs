// SPDX-License-Identifier: MIT OR Apache-2.0
//! Per-frame transition animation.
//!
//! A [`TransitionAnimator`] is a small state machine:
//! `Idle -> Running -> {Completed | Cancelled | HandleLost}`.
//! Each [`TransitionAnimator::step`] checks cancellation and operator
//! availability before it writes anything, so a stale or orphaned flight
//! exits without committing a mutation.

use crate::completion::{CompletionSender, FlightOutcome};
use crate::duration::{flight_timing, FlightTiming};
use crate::easing::{lerp, Easing};
use crate::operator::{ControlLease, WeakOperator};
use crate::path::FlightPath;
use crate::pose::CameraPose;
use crate::supervisor::CancelToken;
use glam::{Quat, Vec3};
use std::time::Duration;

/// One flight's inputs, consumed by a single animator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionRequest {
    /// Pose the flight leaves from
    pub from_pose: CameraPose,
    /// Pose the flight arrives at
    pub to_pose: CameraPose,
    /// Orbit target at departure
    pub from_look_target: Vec3,
    /// Orbit target at arrival
    pub to_look_target: Vec3,
    /// Caller's preferred duration (ms), adapted by distance
    pub base_duration_ms: f32,
    /// Easing applied to normalized time
    pub easing: Easing,
}

impl TransitionRequest {
    /// Build a request whose look targets sit `look_distance` ahead of each pose.
    pub fn new(
        from_pose: CameraPose,
        to_pose: CameraPose,
        look_distance: f32,
        base_duration_ms: f32,
    ) -> Self {
        Self {
            from_pose,
            to_pose,
            from_look_target: from_pose.look_target(look_distance),
            to_look_target: to_pose.look_target(look_distance),
            base_duration_ms,
            easing: Easing::default(),
        }
    }

    /// Override the easing curve
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }
}

/// Lifecycle of an animator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnimatorState {
    /// Created, no step evaluated yet
    #[default]
    Idle,
    /// Has committed at least one step
    Running,
    /// Reached the target
    Completed,
    /// Observed a newer request
    Cancelled,
    /// Observed that the operator was torn down
    HandleLost,
}

impl AnimatorState {
    /// Whether the animator has exited
    pub fn is_finished(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::HandleLost)
    }
}

/// Drives one flight, one step per frame
#[derive(Debug)]
pub struct TransitionAnimator {
    request: TransitionRequest,
    timing: FlightTiming,
    path: FlightPath,
    token: CancelToken,
    operator: WeakOperator,
    elapsed_ms: f32,
    state: AnimatorState,
    lease: Option<ControlLease>,
    completion: Option<CompletionSender>,
}

impl TransitionAnimator {
    /// Plan a flight. Nothing is written until the first step.
    pub fn new(
        request: TransitionRequest,
        token: CancelToken,
        operator: WeakOperator,
        completion: CompletionSender,
    ) -> Self {
        let timing = flight_timing(
            request.from_pose.position,
            request.to_pose.position,
            request.base_duration_ms,
        );
        let path = FlightPath::plan(
            request.from_pose.position,
            request.to_pose.position,
            timing.fly_arc_height,
        );

        Self {
            request,
            timing,
            path,
            token,
            operator,
            elapsed_ms: 0.0,
            state: AnimatorState::Idle,
            lease: None,
            completion: Some(completion),
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> AnimatorState {
        self.state
    }

    /// Whether the animator has exited
    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    /// Timing derived for this flight
    pub fn timing(&self) -> &FlightTiming {
        &self.timing
    }

    /// Planned path
    pub fn path(&self) -> &FlightPath {
        &self.path
    }

    /// The request being flown
    pub fn request(&self) -> &TransitionRequest {
        &self.request
    }

    /// Cancellation token handed out by the supervisor
    pub fn token(&self) -> &CancelToken {
        &self.token
    }

    /// Normalized time reached so far, in `[0, 1]`
    pub fn progress(&self) -> f32 {
        (self.elapsed_ms / self.timing.effective_duration_ms).clamp(0.0, 1.0)
    }

    /// Advance by `dt` and write the interpolated pose to the operator.
    pub fn step(&mut self, dt: Duration) -> AnimatorState {
        if self.is_finished() {
            return self.state;
        }

        if self.token.is_cancelled() {
            return self.finish(AnimatorState::Cancelled);
        }

        let Some(operator) = self.operator.upgrade() else {
            return self.finish(AnimatorState::HandleLost);
        };

        if self.state == AnimatorState::Idle {
            self.state = AnimatorState::Running;
            self.lease = ControlLease::acquire(&self.operator);
            tracing::debug!(
                generation = self.token.generation(),
                duration_ms = self.timing.effective_duration_ms,
                distance = self.timing.distance,
                direct = self.path.is_direct(),
                "Flight started"
            );
        }

        self.elapsed_ms += dt.as_secs_f32() * 1000.0;
        let normalized = self.progress();
        let eased = self.request.easing.apply(normalized);
        let arrived = normalized >= 1.0;

        {
            let from = &self.request.from_pose;
            let to = &self.request.to_pose;
            let mut live = operator.lock();

            live.set_controller_enabled(false);
            live.set_position(self.path.sample(eased));
            live.set_orientation(if arrived {
                to.orientation
            } else {
                slerp_shortest(from.orientation, to.orientation, eased)
            });

            if let (Some(start), Some(end)) = (from.field_of_view, to.field_of_view) {
                live.set_field_of_view(if arrived { end } else { lerp(start, end, eased) });
                live.update_projection();
            }

            live.set_controller_target(if arrived {
                self.request.to_look_target
            } else {
                self.request
                    .from_look_target
                    .lerp(self.request.to_look_target, eased)
            });
            live.update_controller();
        }
        drop(operator);

        if arrived {
            self.finish(AnimatorState::Completed)
        } else {
            self.state
        }
    }

    fn finish(&mut self, state: AnimatorState) -> AnimatorState {
        self.state = state;
        // Releasing the lease re-enables user input.
        self.lease = None;

        let outcome = match state {
            AnimatorState::Completed => FlightOutcome::Completed,
            AnimatorState::HandleLost => FlightOutcome::HandleLost,
            AnimatorState::Idle | AnimatorState::Running | AnimatorState::Cancelled => {
                FlightOutcome::Cancelled
            }
        };
        tracing::debug!(generation = self.token.generation(), ?outcome, "Flight finished");

        if let Some(completion) = self.completion.take() {
            completion.send(outcome);
        }
        state
    }
}

fn slerp_shortest(from: Quat, to: Quat, t: f32) -> Quat {
    let to = if from.dot(to) < 0.0 { -to } else { to };
    from.slerp(to, t).normalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::completion_channel;
    use crate::operator::{CameraOperator, CameraRig, SharedOperator};
    use crate::supervisor::TransitionSupervisor;
    use parking_lot::Mutex;
    use std::sync::Arc;

    const FRAME: Duration = Duration::from_millis(16);

    fn rig() -> (Arc<Mutex<CameraRig>>, SharedOperator) {
        let rig = Arc::new(Mutex::new(CameraRig::default()));
        let shared: SharedOperator = rig.clone();
        (rig, shared)
    }

    fn request_to(position: Vec3) -> TransitionRequest {
        let from = CameraPose::default().with_field_of_view(50.0);
        let to = CameraPose::new(position, Quat::from_rotation_y(1.0)).with_field_of_view(90.0);
        TransitionRequest::new(from, to, 10.0, 1000.0)
    }

    #[test]
    fn test_runs_to_completion() {
        let (rig, shared) = rig();
        let supervisor = TransitionSupervisor::new();
        let (sender, mut completion) = completion_channel();
        let request = request_to(Vec3::new(0.0, 0.0, 30.0));
        let mut animator =
            TransitionAnimator::new(request, supervisor.issue(), Arc::downgrade(&shared), sender);

        assert_eq!(animator.state(), AnimatorState::Idle);
        assert_eq!(animator.step(FRAME), AnimatorState::Running);
        assert!(!rig.lock().controller.enabled);

        let mut frames = 1;
        while !animator.is_finished() {
            animator.step(FRAME);
            frames += 1;
            assert!(frames < 1000);
        }

        assert_eq!(animator.state(), AnimatorState::Completed);
        assert_eq!(completion.try_outcome(), Some(FlightOutcome::Completed));

        let live = rig.lock();
        assert_eq!(live.position(), request.to_pose.position);
        assert_eq!(live.orientation(), request.to_pose.orientation);
        assert_eq!(live.field_of_view(), Some(90.0));
        assert_eq!(live.controller_target(), request.to_look_target);
        assert!(live.controller.enabled);
    }

    #[test]
    fn test_duration_matches_timing() {
        let (_rig, shared) = rig();
        let supervisor = TransitionSupervisor::new();
        let (sender, _completion) = completion_channel();
        let mut animator = TransitionAnimator::new(
            request_to(Vec3::new(0.0, 0.0, 30.0)),
            supervisor.issue(),
            Arc::downgrade(&shared),
            sender,
        );

        // 1094 ms flight: one frame short is still running
        assert_eq!(animator.step(Duration::from_millis(1090)), AnimatorState::Running);
        assert_eq!(animator.step(Duration::from_millis(10)), AnimatorState::Completed);
    }

    #[test]
    fn test_cancelled_before_first_step_writes_nothing() {
        let (rig, shared) = rig();
        let supervisor = TransitionSupervisor::new();
        let (sender, mut completion) = completion_channel();
        let mut animator = TransitionAnimator::new(
            request_to(Vec3::new(0.0, 0.0, 30.0)),
            supervisor.issue(),
            Arc::downgrade(&shared),
            sender,
        );
        let _newer = supervisor.issue();

        assert_eq!(animator.step(FRAME), AnimatorState::Cancelled);
        assert_eq!(completion.try_outcome(), Some(FlightOutcome::Cancelled));

        let live = rig.lock();
        assert_eq!(live.position(), Vec3::ZERO);
        assert_eq!(live.field_of_view(), Some(50.0));
        assert_eq!(live.projection_updates, 0);
        assert!(live.controller.enabled);
    }

    #[test]
    fn test_cancel_mid_flight_stops_writes_and_releases_controller() {
        let (rig, shared) = rig();
        let supervisor = TransitionSupervisor::new();
        let (sender, _completion) = completion_channel();
        let mut animator = TransitionAnimator::new(
            request_to(Vec3::new(0.0, 0.0, 30.0)),
            supervisor.issue(),
            Arc::downgrade(&shared),
            sender,
        );

        animator.step(Duration::from_millis(300));
        let frozen = rig.lock().position();
        assert!(!rig.lock().controller.enabled);

        supervisor.cancel_all();
        assert_eq!(animator.step(FRAME), AnimatorState::Cancelled);
        assert_eq!(rig.lock().position(), frozen);
        assert!(rig.lock().controller.enabled);
    }

    #[test]
    fn test_torn_down_operator_exits_quietly() {
        let (rig, shared) = rig();
        let supervisor = TransitionSupervisor::new();
        let (sender, mut completion) = completion_channel();
        let mut animator = TransitionAnimator::new(
            request_to(Vec3::new(0.0, 0.0, 30.0)),
            supervisor.issue(),
            Arc::downgrade(&shared),
            sender,
        );
        animator.step(FRAME);

        drop(shared);
        drop(rig);
        assert_eq!(animator.step(FRAME), AnimatorState::HandleLost);
        assert_eq!(completion.try_outcome(), Some(FlightOutcome::HandleLost));
    }

    #[test]
    fn test_fov_untouched_when_target_has_none() {
        let (rig, shared) = rig();
        let supervisor = TransitionSupervisor::new();
        let (sender, _completion) = completion_channel();
        let mut request = request_to(Vec3::new(0.0, 0.0, 10.0));
        request.to_pose.field_of_view = None;
        let mut animator =
            TransitionAnimator::new(request, supervisor.issue(), Arc::downgrade(&shared), sender);

        while !animator.is_finished() {
            animator.step(FRAME);
        }
        assert_eq!(rig.lock().field_of_view(), Some(50.0));
        assert_eq!(rig.lock().projection_updates, 0);
    }

    #[test]
    fn test_slerp_takes_short_way_round() {
        let from = Quat::from_rotation_y(0.1);
        let to = -Quat::from_rotation_y(0.3);
        let mid = slerp_shortest(from, to, 0.5);
        assert!(mid.angle_between(Quat::from_rotation_y(0.2)) < 1e-4);
    }
}
