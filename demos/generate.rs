//! Trackgen demo: generates a few tracks and prints their statistics.
//!
//! Usage:
//! ```text
//! cargo run --example generate                          # basic_road, entropy seed
//! cargo run --example generate -- wall_road 42          # preset and RNG seed
//! cargo run --example generate -- path/to/profile.json  # custom cross-section
//! ```
//!
//! A `TRACKGEN_CONFIG` environment variable may point at a JSON configuration
//! file; unset fields keep their defaults.

use std::process::ExitCode;

use trackgen::profile::{self, CrossSectionProfile};
use trackgen::{GeneratorConfig, TrackPipeline};

const RUNS: usize = 3;

fn main() -> ExitCode {
    // Default: WARN for everything, INFO for trackgen.
    // Override with RUST_LOG env var (e.g. RUST_LOG=trackgen=debug).
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("generate=info".parse().unwrap_or_default())
        .add_directive("trackgen=info".parse().unwrap_or_default());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(%err, "generation failed");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let profile_arg = args.next().unwrap_or_else(|| "basic_road".to_owned());
    let seed = args.next().map(|s| s.parse::<u64>()).transpose()?;

    let mut config = match std::env::var("TRACKGEN_CONFIG") {
        Ok(path) => GeneratorConfig::from_json_str(&std::fs::read_to_string(path)?)?,
        Err(_) => GeneratorConfig::default(),
    };
    if seed.is_some() {
        config.seed = seed;
    }

    let profile = match profile::preset(&profile_arg) {
        Some(preset) => preset,
        None => CrossSectionProfile::from_json_str(&std::fs::read_to_string(&profile_arg)?)?,
    };

    let mut pipeline = TrackPipeline::new(config, profile)?;
    for run in 1..=RUNS {
        let track = pipeline.generate()?;
        let spawn = track.spawn_transform(1.0);
        println!(
            "run {run}: {} points, length {:.1}, track {} verts / {} tris, terrain {} verts, \
             spawn ({:.1}, {:.1}, {:.1}) heading {:.0}°",
            track.points.len(),
            track.spline.length(16),
            track.track.vertex_count(),
            track.track.triangle_count(),
            track.terrain.vertex_count(),
            spawn.position.x,
            spawn.position.y,
            spawn.position.z,
            spawn.yaw_degrees(),
        );
    }
    Ok(())
}
