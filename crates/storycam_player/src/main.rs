// SPDX-License-Identifier: MIT OR Apache-2.0
//! `storycam` - headless story camera player
//!
//! Loads a story, mounts a viewer over a reference camera rig and drives it
//! with a fixed-rate frame loop:
//! - Scrub-following and autoplay cycling through camera tracks
//! - Distance-adaptive camera flights with last-request-wins cancellation
//! - Optional keyframe following while the playback clock runs
//!
//! The final viewer snapshot is printed as JSON.

mod app;
mod assets;
mod settings;
mod viewer;

use app::{Cli, PlayerApp};
use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("storycam=info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting storycam v{}", env!("CARGO_PKG_VERSION"));

    let output = PlayerApp::from_cli(&cli).and_then(|mut app| app.run_to_json());
    match output {
        Ok(json) => println!("{json}"),
        Err(e) => {
            tracing::error!("Player failed: {e}");
            std::process::exit(1);
        }
    }
}
