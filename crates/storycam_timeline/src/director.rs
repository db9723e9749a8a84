// SPDX-License-Identifier: MIT OR Apache-2.0
//! Turns projection ids into flights.
//!
//! The director owns the [`TransitionSupervisor`] and the live operator
//! handle. A flight request resolves the projection's entry pose, waits
//! (bounded) for the projection's asset if needed, samples the live camera
//! and hands the supervisor a [`TransitionRequest`].

use crate::settings::FlightSettings;
use crate::story::Story;
use std::sync::Arc;
use std::task::Poll;
use std::time::Duration;
use storycam_flight::{
    completion_channel, safe_field_of_view, sample_pose, CameraPose, CancelToken, CompletionSender,
    FlightCompletion, FlightOutcome, ReadinessWait, SharedOperator, TransitionRequest,
    TransitionSupervisor,
};

/// Reports whether a projection's backing asset has loaded
pub trait AssetLoader {
    /// Whether flights to `projection_id` may start
    fn is_ready(&self, projection_id: &str) -> bool;

    /// Called once per tick before readiness is polled
    fn advance(&mut self, _dt: Duration) {}
}

/// Loader for stories without streamed assets
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysReady;

impl AssetLoader for AlwaysReady {
    fn is_ready(&self, _projection_id: &str) -> bool {
        true
    }
}

/// A flight waiting for its target's asset
struct PendingFlight {
    projection_id: String,
    target: CameraPose,
    base_duration_ms: f32,
    token: CancelToken,
    completion: CompletionSender,
    wait: ReadinessWait,
}

/// Resolves projection ids into supervised flights
pub struct FlightDirector {
    operator: SharedOperator,
    supervisor: TransitionSupervisor,
    assets: Box<dyn AssetLoader>,
    settings: FlightSettings,
    pending: Vec<PendingFlight>,
}

impl FlightDirector {
    /// Create a director for a live operator
    pub fn new(operator: SharedOperator, settings: FlightSettings) -> Self {
        Self {
            operator,
            supervisor: TransitionSupervisor::new(),
            assets: Box::new(AlwaysReady),
            settings,
            pending: Vec::new(),
        }
    }

    /// Use `assets` to gate flights on asset loading
    pub fn with_assets(mut self, assets: impl AssetLoader + 'static) -> Self {
        self.assets = Box::new(assets);
        self
    }

    /// The live operator
    pub fn operator(&self) -> &SharedOperator {
        &self.operator
    }

    /// The supervisor
    pub fn supervisor(&self) -> &TransitionSupervisor {
        &self.supervisor
    }

    /// Whether a current flight is running or waiting for its asset
    pub fn is_flying(&self) -> bool {
        self.supervisor.is_flying() || self.pending.iter().any(|p| !p.token.is_cancelled())
    }

    /// Pose a flight should arrive at for an authored pose
    pub fn target_pose(&self, authored: CameraPose) -> CameraPose {
        match authored.field_of_view {
            Some(fov) if self.settings.widen_field_of_view => CameraPose {
                field_of_view: Some(safe_field_of_view(fov)),
                ..authored
            },
            _ => authored,
        }
    }

    /// Fly the camera to a projection's entry pose.
    ///
    /// Supersedes every earlier flight. Settles to
    /// [`FlightOutcome::Skipped`] when the projection has no pose.
    pub fn fly_to(&mut self, story: &Story, projection_id: &str, base_duration_ms: f32) -> FlightCompletion {
        let Some(authored) = story.entry_pose(projection_id) else {
            tracing::debug!(projection_id, "No pose to fly to, skipping");
            return FlightCompletion::settled(FlightOutcome::Skipped);
        };

        let target = self.target_pose(authored);
        let token = self.supervisor.issue();
        let (sender, completion) = completion_channel();

        if self.assets.is_ready(projection_id) {
            self.launch(target, base_duration_ms, token, sender);
        } else {
            tracing::debug!(projection_id, "Waiting for projection asset");
            self.pending.push(PendingFlight {
                projection_id: projection_id.to_string(),
                target,
                base_duration_ms,
                token,
                completion: sender,
                wait: ReadinessWait::new(self.settings.readiness_timeout()),
            });
        }

        completion
    }

    /// Place the camera at `pose` without a flight
    pub fn snap_to(&mut self, pose: CameraPose) {
        let mut live = self.operator.lock();
        live.set_position(pose.position);
        live.set_orientation(pose.orientation);
        if let Some(fov) = pose.field_of_view {
            live.set_field_of_view(fov);
            live.update_projection();
        }
        live.set_controller_target(pose.look_target(self.settings.look_distance));
        live.update_controller();
    }

    /// Supersede every flight, running or waiting
    pub fn cancel_all(&mut self) {
        self.supervisor.cancel_all();
    }

    /// Advance waiting and running flights by one frame
    pub fn tick(&mut self, dt: Duration) {
        self.assets.advance(dt);

        let mut waiting = Vec::with_capacity(self.pending.len());
        for mut pending in std::mem::take(&mut self.pending) {
            if pending.token.is_cancelled() {
                pending.completion.send(FlightOutcome::Cancelled);
                continue;
            }

            let assets = &self.assets;
            let ready = pending
                .wait
                .poll_step(dt, || assets.is_ready(&pending.projection_id).then_some(()));

            match ready {
                Poll::Ready(Some(())) => {
                    let PendingFlight {
                        target,
                        base_duration_ms,
                        token,
                        completion,
                        ..
                    } = pending;
                    self.launch(target, base_duration_ms, token, completion);
                }
                Poll::Ready(None) => {
                    tracing::warn!(
                        "Projection {} not ready after {:?}, camera stays put",
                        pending.projection_id,
                        pending.wait.waited()
                    );
                    pending.completion.send(FlightOutcome::NotReady);
                }
                Poll::Pending => waiting.push(pending),
            }
        }
        self.pending = waiting;

        self.supervisor.tick(dt);
    }

    fn launch(
        &mut self,
        target: CameraPose,
        base_duration_ms: f32,
        token: CancelToken,
        completion: CompletionSender,
    ) {
        let from = sample_pose(&*self.operator.lock());
        let request = TransitionRequest::new(from, target, self.settings.look_distance, base_duration_ms);
        self.supervisor
            .launch(request, token, Arc::downgrade(&self.operator), completion);
    }
}
