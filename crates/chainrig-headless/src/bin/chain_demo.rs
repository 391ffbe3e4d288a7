//! Builds a chain in the headless world and drives it for a number of frames.
//!
//! ```text
//! chain_demo [CONFIG.json] [FRAMES]
//! ```
//!
//! Logging follows `RUST_LOG` (default `info`).

use anyhow::{Context, Result};
use chainrig::{ChainConfig, ChainRig};
use chainrig_headless::{PrototypeLibrary, World};
use glam::Vec2;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_FRAMES: u64 = 120;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> Result<()> {
    init_tracing();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => ChainConfig::load(&path)
            .with_context(|| format!("loading chain config from {path}"))?,
        None => ChainConfig::default(),
    };
    let frames = args
        .next()
        .map(|raw| raw.parse::<u64>())
        .transpose()
        .context("frame count must be a non-negative integer")?
        .unwrap_or(DEFAULT_FRAMES);

    let library = PrototypeLibrary::with_default_segment();
    let mut world = World::new(library.clone());
    let root = world.spawn_group("PhysicsChain", Vec2::new(320.0, 40.0));

    let mut rig = ChainRig::new(root, config);
    let outcome = rig.ready(&mut world, &library);
    info!(
        ?outcome,
        segments = rig.segment_count(),
        links = rig.link_count(),
        "chain ready"
    );

    for frame in 0..frames {
        if frame == frames / 2 && rig.apply_impulse(&mut world, 0, Vec2::new(40.0, 0.0)).is_ok() {
            info!(frame, "pushed first segment");
        }
        world.step_fixed();
    }

    for (index, position) in rig.segment_world_positions(&world).iter().enumerate() {
        info!(segment = index, x = position.x, y = position.y, "segment position");
    }
    info!(
        ticks = world.tick(),
        impulses = world.impulse_log().len(),
        "simulation finished"
    );

    rig.teardown(&mut world);
    info!(remaining_nodes = world.node_count(), "chain torn down");
    Ok(())
}
