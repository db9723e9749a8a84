// SPDX-License-Identifier: MIT OR Apache-2.0
//! Last-request-wins flight supervision.

use crate::animator::{TransitionAnimator, TransitionRequest};
use crate::completion::{completion_channel, CompletionSender, FlightCompletion};
use crate::operator::{SharedOperator, WeakOperator};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Snapshot of the supervisor's generation at request time.
///
/// Cancelled as soon as any newer request is issued.
#[derive(Debug, Clone)]
pub struct CancelToken {
    generation: Arc<AtomicU64>,
    snapshot: u64,
}

impl CancelToken {
    /// Whether a newer request has been issued since this token
    pub fn is_cancelled(&self) -> bool {
        self.generation.load(Ordering::Acquire) != self.snapshot
    }

    /// Generation this token was issued for
    pub fn generation(&self) -> u64 {
        self.snapshot
    }
}

/// Owns the generation counter and every animator still in flight.
///
/// Superseded animators stay in the list until their next step, where they
/// observe their token and exit without writing.
#[derive(Debug, Default)]
pub struct TransitionSupervisor {
    generation: Arc<AtomicU64>,
    in_flight: Vec<TransitionAnimator>,
}

impl TransitionSupervisor {
    /// Create a supervisor with no flights
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest issued generation
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Start a new generation, invalidating every earlier token.
    pub fn issue(&self) -> CancelToken {
        let snapshot = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        CancelToken {
            generation: Arc::clone(&self.generation),
            snapshot,
        }
    }

    /// Invalidate every outstanding token without starting a flight.
    pub fn cancel_all(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
    }

    /// Issue a token and start flying `request`.
    pub fn request_transition(
        &mut self,
        request: TransitionRequest,
        operator: &SharedOperator,
    ) -> FlightCompletion {
        let token = self.issue();
        let (sender, completion) = completion_channel();
        self.launch(request, token, Arc::downgrade(operator), sender);
        completion
    }

    /// Start an animator for a token issued earlier.
    pub fn launch(
        &mut self,
        request: TransitionRequest,
        token: CancelToken,
        operator: WeakOperator,
        completion: CompletionSender,
    ) {
        tracing::debug!(generation = token.generation(), "Flight requested");
        self.in_flight
            .push(TransitionAnimator::new(request, token, operator, completion));
    }

    /// Step every in-flight animator once, oldest first, and drop finished ones.
    pub fn tick(&mut self, dt: Duration) {
        for animator in &mut self.in_flight {
            animator.step(dt);
        }
        self.in_flight.retain(|animator| !animator.is_finished());
    }

    /// Whether a current (non-superseded) flight is running
    pub fn is_flying(&self) -> bool {
        self.in_flight
            .iter()
            .any(|animator| !animator.token().is_cancelled())
    }

    /// Animators not yet stepped to exit, including superseded ones
    pub fn in_flight_count(&self) -> usize {
        self.in_flight.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::FlightOutcome;
    use crate::operator::{CameraOperator, CameraRig};
    use crate::pose::CameraPose;
    use glam::{Quat, Vec3};
    use parking_lot::Mutex;

    const FRAME: Duration = Duration::from_millis(16);

    fn request(from: Vec3, to: Vec3) -> TransitionRequest {
        TransitionRequest::new(
            CameraPose::new(from, Quat::IDENTITY),
            CameraPose::new(to, Quat::from_rotation_x(-0.4)),
            10.0,
            1000.0,
        )
    }

    #[test]
    fn test_tokens_invalidate_older_ones() {
        let supervisor = TransitionSupervisor::new();
        let first = supervisor.issue();
        assert!(!first.is_cancelled());
        let second = supervisor.issue();
        assert!(first.is_cancelled());
        assert!(!second.is_cancelled());
        assert_eq!(second.generation(), 2);

        supervisor.cancel_all();
        assert!(second.is_cancelled());
    }

    #[test]
    fn test_newest_request_wins() {
        let rig = Arc::new(Mutex::new(CameraRig::default()));
        let shared: SharedOperator = rig.clone();
        let mut supervisor = TransitionSupervisor::new();

        let first = request(Vec3::ZERO, Vec3::new(0.0, 0.0, -20.0));
        let mut first_done = supervisor.request_transition(first, &shared);
        supervisor.tick(FRAME);
        supervisor.tick(FRAME);

        let second = request(rig.lock().position(), Vec3::new(15.0, 2.0, 0.0));
        let mut second_done = supervisor.request_transition(second, &shared);
        assert_eq!(supervisor.in_flight_count(), 2);

        supervisor.tick(FRAME);
        assert_eq!(first_done.try_outcome(), Some(FlightOutcome::Cancelled));
        assert_eq!(supervisor.in_flight_count(), 1);

        for _ in 0..500 {
            supervisor.tick(FRAME);
        }
        assert_eq!(second_done.try_outcome(), Some(FlightOutcome::Completed));
        assert!(!supervisor.is_flying());

        let live = rig.lock();
        assert_eq!(live.position(), second.to_pose.position);
        assert_eq!(live.orientation(), second.to_pose.orientation);
        assert!(live.controller_enabled());
    }
}
