use std::time::Instant;

use isoworks_assets::AtlasStore;
use isoworks_input::{CameraController, InputMap, KeyState};
use isoworks_render::{Renderer, TextureLoader};
use isoworks_scene::{RenderContext, SceneManager};
use isoworks_tilemap::IsoProjection;

use crate::config::EngineConfig;
use crate::game_loop::GameLoop;
use crate::timer::FrameTimer;

/// Outcome of one [`Engine::frame`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    pub updates: u32,
    pub alpha: f32,
    /// Scene stack depth after the flush.
    pub scenes: usize,
}

/// Owns the per-process engine state and drives frames.
#[derive(Debug)]
pub struct Engine {
    config: EngineConfig,
    scenes: SceneManager,
    atlases: AtlasStore,
    projection: IsoProjection,
    input: InputMap,
    camera: CameraController,
    game_loop: GameLoop,
    timer: FrameTimer,
    frames: u64,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        let mut input = InputMap::new();
        input.add_standard_movement();
        Self {
            projection: config.projection(),
            camera: CameraController::new(config.camera_speed),
            game_loop: GameLoop::new(config.target_fps, config.max_frame_skip),
            scenes: SceneManager::new(),
            atlases: AtlasStore::new(),
            input,
            timer: FrameTimer::default(),
            frames: 0,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn scenes(&self) -> &SceneManager {
        &self.scenes
    }

    pub fn scenes_mut(&mut self) -> &mut SceneManager {
        &mut self.scenes
    }

    pub fn atlases(&self) -> &AtlasStore {
        &self.atlases
    }

    pub fn atlases_mut(&mut self) -> &mut AtlasStore {
        &mut self.atlases
    }

    pub fn projection(&self) -> &IsoProjection {
        &self.projection
    }

    pub fn projection_mut(&mut self) -> &mut IsoProjection {
        &mut self.projection
    }

    pub fn input(&self) -> &InputMap {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut InputMap {
        &mut self.input
    }

    pub fn game_loop(&self) -> &GameLoop {
        &self.game_loop
    }

    pub fn timer(&self) -> &FrameTimer {
        &self.timer
    }

    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    pub fn is_running(&self) -> bool {
        self.game_loop.is_running()
    }

    /// Request the loop to end before the next frame.
    pub fn stop(&mut self) {
        self.game_loop.stop();
    }

    /// Run one frame: sample input, fixed updates, render every scene, flush the stack.
    pub fn frame(
        &mut self,
        frame_dt: f32,
        keys: &dyn KeyState,
        renderer: &mut dyn Renderer,
    ) -> FrameReport {
        let _span = tracing::info_span!("frame", n = self.frames).entered();
        let started = Instant::now();

        self.input.update(keys);
        let tick = self.game_loop.advance(frame_dt);
        let dt = self.game_loop.fixed_dt();
        for _ in 0..tick.steps {
            self.camera.apply(&self.input, &mut self.projection, dt);
            self.scenes.update(dt, &self.atlases, &mut self.projection);
        }

        self.scenes.render(&mut RenderContext {
            renderer,
            atlases: &self.atlases,
            projection: &self.projection,
            viewport: self.config.viewport(),
        });

        self.scenes.process_pending();

        let cost = started.elapsed();
        self.timer.record(cost);
        self.frames += 1;
        if cost.as_secs_f32() > dt {
            tracing::debug!(?cost, budget = dt, "frame over fixed-step budget");
        }
        tracing::trace!(
            updates = tick.steps,
            alpha = tick.alpha,
            scenes = self.scenes.len(),
            "frame done"
        );
        FrameReport {
            updates: tick.steps,
            alpha: tick.alpha,
            scenes: self.scenes.len(),
        }
    }

    /// Run up to `count` frames of `frame_dt` seconds, stopping early once stopped.
    /// Returns the number of frames run.
    pub fn run_frames(
        &mut self,
        count: u64,
        frame_dt: f32,
        keys: &dyn KeyState,
        renderer: &mut dyn Renderer,
    ) -> u64 {
        let mut ran = 0;
        while ran < count && self.is_running() {
            self.frame(frame_dt, keys, renderer);
            ran += 1;
        }
        ran
    }

    /// Exit every scene, release every atlas and stop the loop.
    pub fn shutdown(&mut self, loader: &mut dyn TextureLoader) {
        self.scenes.clear_scenes();
        self.scenes.process_pending();
        self.atlases.release_all(loader);
        self.game_loop.stop();
        tracing::info!(frames = self.frames, "engine shut down");
    }
}
