//! Orrery viewer: a skybox and textured planets around an orbiting camera.
//!
//! Left drag orbits; middle drag (or shift + left drag) zooms.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::thread;

use anyhow::{anyhow, Context, Result};
use clap::Parser;

use orrery_engine::device::{GpuInit, WgpuDevice};
use orrery_engine::geometry::MAX_SPHERE_DEPTH;
use orrery_engine::input::InputActor;
use orrery_engine::logging::{init_logging, LoggingConfig};
use orrery_engine::math::Location;
use orrery_engine::render::{RenderActor, RenderSettings};
use orrery_engine::scene::{SharedScene, DEFAULT_FIELD_OF_VIEW};
use orrery_engine::window::{RuntimeConfig, Waker, WindowRuntime};
use winit::window::Window;

#[derive(Debug, Parser)]
#[command(name = "orrery", version, about = "Orbit a textured planet under a starry sky")]
struct Cli {
    /// Asset root holding `programs/` and `cubemaps/`.
    #[arg(long, default_value = concat!(env!("CARGO_MANIFEST_DIR"), "/assets"))]
    assets: PathBuf,

    /// Sphere subdivision depth.
    #[arg(long, default_value_t = 4)]
    depth: u32,

    /// Vertical field of view in degrees.
    #[arg(long, default_value_t = DEFAULT_FIELD_OF_VIEW)]
    fov: f32,

    /// Debug logging for the engine.
    #[arg(long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(if cli.verbose {
        LoggingConfig::verbose()
    } else {
        LoggingConfig::default()
    });

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    if cli.depth > MAX_SPHERE_DEPTH {
        log::warn!("sphere depth {} clamped to {MAX_SPHERE_DEPTH}", cli.depth);
    }
    let settings = RenderSettings {
        assets_dir: cli.assets,
        sphere_depth: cli.depth.min(MAX_SPHERE_DEPTH),
        ..RenderSettings::default()
    };

    let mut runtime = WindowRuntime::open(RuntimeConfig::default())?;
    let scene = Arc::new(SharedScene::new(Location::default(), cli.fov));

    let render = spawn_render(
        Arc::clone(&scene),
        settings,
        runtime.window(),
        runtime.waker(),
    )?;

    let input_result = InputActor::new(Arc::clone(&scene)).run(&mut runtime);

    // The input actor only returns once stop is set.
    let render_result = render
        .join()
        .map_err(|_| anyhow!("render thread panicked"))?;

    render_result.context("render actor failed")?;
    input_result.context("input actor failed")
}

fn spawn_render(
    scene: Arc<SharedScene>,
    settings: RenderSettings,
    window: Arc<Window>,
    waker: Waker,
) -> Result<thread::JoinHandle<orrery_engine::Result<()>>> {
    thread::Builder::new()
        .name("render".to_string())
        .spawn(move || {
            let result = WgpuDevice::new(window, GpuInit::default())
                .and_then(|device| RenderActor::new(Arc::clone(&scene), settings).run(&device));

            if result.is_err() {
                scene.request_stop();
                waker.wake();
            }
            result
        })
        .context("failed to spawn render thread")
}
