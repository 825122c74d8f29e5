//! Render backdrop frames to PNG files.
//!
//! Runs each animation headless on a software surface and saves every
//! 30th frame.
//!
//! Run with: cargo run --example render_frames -- [config.json] [out_dir]
//!
//! Set `RUST_LOG=debug` to see engine lifecycle logs.

use backdrop::prelude::*;
use backdrop::Result;
use std::path::{Path, PathBuf};

const VIEWPORT: UVec2 = UVec2::new(800, 450);
const FRAMES: usize = 120;
const EVERY: usize = 30;

fn render<A: Animation>(animation: A, out_dir: &Path) -> Result<()> {
    let name = animation.name();
    let mut engine = EngineBuilder::new(animation)
        .with_seed(2080)
        .build(RasterSurface::new(VIEWPORT), VIEWPORT);

    for frame in 1..=FRAMES {
        engine.frame();
        if frame % EVERY == 0 {
            let path = out_dir.join(format!("{name}_{frame:04}.png"));
            engine.surface().save_png(&path)?;
            log::info!("wrote {}", path.display());
        }
    }

    engine.teardown();
    println!(
        "{name}: {} particles, {} frames at {:.0} fps",
        engine.animation().len(),
        engine.time().frame(),
        engine.time().fps()
    );
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => BackdropConfig::load(&path)?,
        None => BackdropConfig::default(),
    };
    let out_dir = args.next().map(PathBuf::from).unwrap_or_else(|| PathBuf::from("frames"));
    std::fs::create_dir_all(&out_dir)?;

    println!("=== backdrop frame export ===");
    println!("Viewport: {}x{}", VIEWPORT.x, VIEWPORT.y);
    println!("Output: {}", out_dir.display());
    println!();

    render(GraphAnimation::new(config.graph), &out_dir)?;
    render(RainAnimation::new(config.rain), &out_dir)?;
    render(DepthAnimation::new(config.depth), &out_dir)?;
    Ok(())
}
