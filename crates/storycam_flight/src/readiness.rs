// SPDX-License-Identifier: MIT OR Apache-2.0
//! Bounded waiting for a resource to become ready.

use std::task::Poll;
use std::time::Duration;

/// Polls a readiness check once per step until it yields or a deadline passes.
#[derive(Debug, Clone)]
pub struct ReadinessWait {
    timeout: Duration,
    waited: Duration,
}

impl ReadinessWait {
    /// Wait for at most `timeout` of stepped time
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            waited: Duration::ZERO,
        }
    }

    /// Run `check` after `dt` more time has passed.
    ///
    /// Resolves to `Some` as soon as the check yields and to `None` once the
    /// deadline has passed without it yielding.
    pub fn poll_step<T>(&mut self, dt: Duration, check: impl FnOnce() -> Option<T>) -> Poll<Option<T>> {
        self.waited += dt;
        if let Some(value) = check() {
            return Poll::Ready(Some(value));
        }
        if self.waited >= self.timeout {
            Poll::Ready(None)
        } else {
            Poll::Pending
        }
    }

    /// Time spent waiting so far
    pub fn waited(&self) -> Duration {
        self.waited
    }

    /// Time left before giving up
    pub fn remaining(&self) -> Duration {
        self.timeout.saturating_sub(self.waited)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ready_on_first_poll() {
        let mut wait = ReadinessWait::new(Duration::from_secs(4));
        assert_eq!(wait.poll_step(Duration::ZERO, || Some(7)), Poll::Ready(Some(7)));
    }

    #[test]
    fn test_times_out() {
        let mut wait = ReadinessWait::new(Duration::from_millis(50));
        let frame = Duration::from_millis(20);
        assert_eq!(wait.poll_step(frame, || None::<()>), Poll::Pending);
        assert_eq!(wait.poll_step(frame, || None::<()>), Poll::Pending);
        assert_eq!(wait.poll_step(frame, || None::<()>), Poll::Ready(None));
        assert_eq!(wait.remaining(), Duration::ZERO);
    }

    #[test]
    fn test_becomes_ready_before_deadline() {
        let mut wait = ReadinessWait::new(Duration::from_secs(1));
        let mut polls = 0;
        let result = loop {
            polls += 1;
            let ready = polls == 3;
            if let Poll::Ready(value) = wait.poll_step(Duration::from_millis(100), || ready.then_some("asset")) {
                break value;
            }
        };
        assert_eq!(result, Some("asset"));
        assert_eq!(wait.waited(), Duration::from_millis(300));
    }
}
