// SPDX-License-Identifier: MIT OR Apache-2.0
//! Simulated asset streaming for the headless player.

use std::collections::HashMap;
use std::time::Duration;
use storycam_timeline::{AssetLoader, Story};

/// Projection assets that finish loading after a fixed delay each
#[derive(Debug, Default)]
pub struct StagedAssets {
    load_times: HashMap<String, Duration>,
    elapsed: Duration,
}

impl StagedAssets {
    /// Every projection in `story` loads after `delay`
    pub fn uniform(story: &Story, delay: Duration) -> Self {
        Self {
            load_times: story.projections().map(|p| (p.id.clone(), delay)).collect(),
            elapsed: Duration::ZERO,
        }
    }
}

impl AssetLoader for StagedAssets {
    fn is_ready(&self, projection_id: &str) -> bool {
        self.load_times
            .get(projection_id)
            .map_or(true, |load_time| self.elapsed >= *load_time)
    }

    fn advance(&mut self, dt: Duration) {
        self.elapsed += dt;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storycam_timeline::Projection;

    fn story() -> Story {
        Story::new(vec![Projection::new("near"), Projection::new("far")], Vec::new(), 0.0).unwrap()
    }

    #[test]
    fn test_ready_after_delay() {
        let mut assets = StagedAssets::uniform(&story(), Duration::from_secs(1));
        assert!(!assets.is_ready("near"));

        assets.advance(Duration::from_millis(600));
        assert!(!assets.is_ready("far"));

        assets.advance(Duration::from_millis(400));
        assert!(assets.is_ready("near"));
        assert!(assets.is_ready("far"));
    }

    #[test]
    fn test_unknown_projection_is_ready() {
        let assets = StagedAssets::uniform(&story(), Duration::from_secs(10));
        assert!(assets.is_ready("elsewhere"));
    }
}
