// SPDX-License-Identifier: MIT OR Apache-2.0
//! Awaitable flight results.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::oneshot;

/// How a flight ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlightOutcome {
    /// Reached the target pose
    Completed,
    /// Superseded by a newer request
    Cancelled,
    /// The camera operator was torn down mid-flight
    HandleLost,
    /// The target's asset did not finish loading in time
    NotReady,
    /// The target had no pose to fly to
    Skipped,
}

impl FlightOutcome {
    /// Whether the camera reached its target
    pub fn is_completed(self) -> bool {
        matches!(self, Self::Completed)
    }
}

/// Create a connected sender/completion pair.
pub fn completion_channel() -> (CompletionSender, FlightCompletion) {
    let (sender, receiver) = oneshot::channel();
    (
        CompletionSender(sender),
        FlightCompletion {
            receiver,
            settled: None,
        },
    )
}

/// Resolving side of a [`FlightCompletion`]
#[derive(Debug)]
pub struct CompletionSender(oneshot::Sender<FlightOutcome>);

impl CompletionSender {
    /// Settle the completion. Nobody listening is fine.
    pub fn send(self, outcome: FlightOutcome) {
        let _ = self.0.send(outcome);
    }
}

/// Settles once a flight finishes.
///
/// A completion whose sender is dropped unsent resolves to
/// [`FlightOutcome::Cancelled`].
#[derive(Debug)]
pub struct FlightCompletion {
    receiver: oneshot::Receiver<FlightOutcome>,
    settled: Option<FlightOutcome>,
}

impl FlightCompletion {
    /// A completion that has already settled
    pub fn settled(outcome: FlightOutcome) -> Self {
        let (sender, completion) = completion_channel();
        sender.send(outcome);
        completion
    }

    /// Outcome if the flight has finished, without waiting
    pub fn try_outcome(&mut self) -> Option<FlightOutcome> {
        if self.settled.is_none() {
            self.settled = match self.receiver.try_recv() {
                Ok(outcome) => Some(outcome),
                Err(oneshot::error::TryRecvError::Empty) => None,
                Err(oneshot::error::TryRecvError::Closed) => Some(FlightOutcome::Cancelled),
            };
        }
        self.settled
    }
}

impl Future for FlightCompletion {
    type Output = FlightOutcome;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        if let Some(outcome) = this.settled {
            return Poll::Ready(outcome);
        }
        let outcome = match Pin::new(&mut this.receiver).poll(cx) {
            Poll::Ready(Ok(outcome)) => outcome,
            Poll::Ready(Err(_)) => FlightOutcome::Cancelled,
            Poll::Pending => return Poll::Pending,
        };
        this.settled = Some(outcome);
        Poll::Ready(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;

    #[test]
    fn test_pending_until_sent() {
        let (sender, mut completion) = completion_channel();
        assert_eq!(completion.try_outcome(), None);
        sender.send(FlightOutcome::Completed);
        assert_eq!(completion.try_outcome(), Some(FlightOutcome::Completed));
        // Stays settled
        assert_eq!(completion.try_outcome(), Some(FlightOutcome::Completed));
        assert_eq!(completion.now_or_never(), Some(FlightOutcome::Completed));
    }

    #[test]
    fn test_dropped_sender_resolves_cancelled() {
        let (sender, completion) = completion_channel();
        drop(sender);
        assert_eq!(futures::executor::block_on(completion), FlightOutcome::Cancelled);
    }

    #[test]
    fn test_settled_constructor() {
        let completion = FlightCompletion::settled(FlightOutcome::Skipped);
        assert_eq!(completion.now_or_never(), Some(FlightOutcome::Skipped));
        assert!(!FlightOutcome::Skipped.is_completed());
        assert!(FlightOutcome::Completed.is_completed());
    }
}
