mod demo;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use glam::Vec2;
use isoworks_common::Rect;
use isoworks_input::{Key, ScriptedKeys};
use isoworks_render::{HeadlessTextures, RecordingRenderer};
use isoworks_runtime::{Engine, EngineConfig};
use isoworks_scene::Scene;
use isoworks_tilemap::{IsoProjection, Tile, TileMap};
use isoworks_tools::SceneInspector;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "isoworks-cli", about = "Headless tools for the isoworks engine")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print engine version and crate info
    Info,
    /// Run a scripted session against the headless renderer
    Demo {
        /// Number of frames to run
        #[arg(short, long, default_value = "120")]
        frames: u64,
        /// Engine config (YAML); defaults are used when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// List the tiles visible through a viewport
    Cull {
        #[arg(long, default_value = "32")]
        width: i32,
        #[arg(long, default_value = "32")]
        height: i32,
        #[arg(long, default_value = "0")]
        camera_x: f32,
        #[arg(long, default_value = "0")]
        camera_y: f32,
        #[arg(long, default_value = "1280")]
        viewport_w: f32,
        #[arg(long, default_value = "720")]
        viewport_h: f32,
        /// How many tiles to print, in draw order
        #[arg(long, default_value = "10")]
        show: usize,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("isoworks-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", isoworks_common::crate_info());
            println!("render: {}", isoworks_render::crate_info());
            println!("assets: {}", isoworks_assets::crate_info());
            println!("ecs: {}", isoworks_ecs::crate_info());
            println!("tilemap: {}", isoworks_tilemap::crate_info());
            println!("scene: {}", isoworks_scene::crate_info());
            println!("input: {}", isoworks_input::crate_info());
            println!("runtime: {}", isoworks_runtime::crate_info());
            println!("tools: {}", isoworks_tools::crate_info());
        }
        Commands::Demo { frames, config } => run_demo(frames, config)?,
        Commands::Cull {
            width,
            height,
            camera_x,
            camera_y,
            viewport_w,
            viewport_h,
            show,
        } => {
            let mut map = TileMap::new(width, height);
            map.fill(Tile::new(1));
            let mut projection = IsoProjection::default();
            projection.set_camera(Vec2::new(camera_x, camera_y));
            let viewport = Rect::new(0.0, 0.0, viewport_w, viewport_h);

            let visible = map.visible_tiles(&projection, viewport);
            println!(
                "Map {width}x{height}, camera=({camera_x}, {camera_y}), viewport {viewport_w}x{viewport_h}"
            );
            println!("Visible tiles: {} of {}", visible.len(), tile_total(width, height));
            for t in visible.iter().take(show) {
                println!(
                    "  ({}, {}) screen=({:.1}, {:.1}) depth={}",
                    t.x, t.y, t.screen.x, t.screen.y, t.depth_key
                );
            }
        }
    }

    Ok(())
}

/// Map area without i32 overflow; negative sizes count as empty.
fn tile_total(width: i32, height: i32) -> i64 {
    i64::from(width.max(0)) * i64::from(height.max(0))
}

fn run_demo(frames: u64, config: Option<PathBuf>) -> anyhow::Result<()> {
    let config = match config {
        Some(path) => EngineConfig::load(&path)
            .with_context(|| format!("loading engine config from {}", path.display()))?,
        None => EngineConfig::default(),
    };
    let frame_dt = 1.0 / config.target_fps as f32;

    let mut engine = Engine::new(config);
    let mut textures = HeadlessTextures::new();
    let atlases = demo::load_atlases(&mut engine, &mut textures)?;

    engine
        .scenes_mut()
        .set_transition_callback(Box::new(|from: Option<&Scene>, to: &Scene| {
            tracing::info!(from = ?from.map(Scene::name), to = to.name(), "scene transition");
        }));
    let floor = demo::cafe_floor(12, 12, atlases.tiles);
    engine
        .scenes_mut()
        .push_scene(Scene::new("cafe", demo::CafeFloor::new(floor, atlases.characters)));

    // Pan right for the first half of the run.
    let mut keys = ScriptedKeys::new();
    keys.press(Key::D);
    let mut renderer = RecordingRenderer::new();
    for n in 0..frames {
        if n == frames / 2 {
            keys.release_all();
        }
        if !engine.is_running() {
            break;
        }
        renderer.clear();
        engine.frame(frame_dt, &keys, &mut renderer);
    }

    println!("Ran {} frames", engine.frame_count());
    for line in renderer.summary().lines().take(4) {
        println!("{line}");
    }
    let camera = engine.projection().camera();
    println!("Camera: ({:.1}, {:.1})", camera.x, camera.y);
    println!(
        "Frame time: avg={:?} max={:?}",
        engine.timer().average(),
        engine.timer().max()
    );

    // Overlay a pause scene to show the stack.
    engine.scenes_mut().push_scene(Scene::empty("pause_menu"));
    renderer.clear();
    engine.frame(frame_dt, &keys, &mut renderer);

    for summary in SceneInspector::stack(engine.scenes()) {
        println!("{summary}");
    }
    if let Some(cafe) = engine.scenes().scene_at(0) {
        for id in SceneInspector::list_entities(cafe) {
            if let Some(info) = SceneInspector::inspect_entity(cafe, id) {
                println!("  {info}");
            }
        }
    }

    engine.shutdown(&mut textures);
    println!("Textures alive after shutdown: {}", textures.len());
    Ok(())
}
