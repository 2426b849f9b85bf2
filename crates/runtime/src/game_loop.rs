/// What one rendered frame should do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    /// Fixed updates to run this frame.
    pub steps: u32,
    /// Leftover fraction of a fixed step, for render interpolation.
    pub alpha: f32,
}

/// Fixed-timestep accumulator.
///
/// Frame time is clamped to `max_frame_skip` fixed steps so a long stall (debugger,
/// window drag) cannot snowball into ever longer catch-up frames.
#[derive(Debug, Clone)]
pub struct GameLoop {
    fixed_dt: f32,
    max_frame_skip: u32,
    accumulator: f64,
    running: bool,
    frame_time: f32,
    fps_window: f64,
    fps_frames: u32,
    current_fps: u32,
}

impl Default for GameLoop {
    fn default() -> Self {
        Self::new(60, 5)
    }
}

impl GameLoop {
    pub fn new(target_fps: u32, max_frame_skip: u32) -> Self {
        let mut game_loop = Self {
            fixed_dt: 1.0 / 60.0,
            max_frame_skip: 5,
            accumulator: 0.0,
            running: true,
            frame_time: 0.0,
            fps_window: 0.0,
            fps_frames: 0,
            current_fps: 0,
        };
        game_loop.set_target_fps(target_fps);
        game_loop.set_max_frame_skip(max_frame_skip);
        game_loop
    }

    /// Zero is ignored.
    pub fn set_target_fps(&mut self, fps: u32) {
        if fps > 0 {
            self.fixed_dt = 1.0 / fps as f32;
        }
    }

    /// Zero is ignored.
    pub fn set_max_frame_skip(&mut self, frames: u32) {
        if frames > 0 {
            self.max_frame_skip = frames;
        }
    }

    pub fn fixed_dt(&self) -> f32 {
        self.fixed_dt
    }

    pub fn max_frame_skip(&self) -> u32 {
        self.max_frame_skip
    }

    /// Clamped duration of the last frame.
    pub fn frame_time(&self) -> f32 {
        self.frame_time
    }

    /// Frames counted over the last full second.
    pub fn current_fps(&self) -> u32 {
        self.current_fps
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Account for `frame_dt` seconds of wall time.
    pub fn advance(&mut self, frame_dt: f32) -> Tick {
        let fixed = self.fixed_dt as f64;
        let frame_dt = (frame_dt.max(0.0) as f64).min(fixed * self.max_frame_skip as f64);
        self.frame_time = frame_dt as f32;
        self.accumulator += frame_dt;

        let mut steps = 0;
        while self.accumulator >= fixed && steps < self.max_frame_skip {
            self.accumulator -= fixed;
            steps += 1;
        }

        self.fps_frames += 1;
        self.fps_window += frame_dt;
        if self.fps_window >= 1.0 {
            self.current_fps = self.fps_frames;
            tracing::debug!(
                fps = self.current_fps,
                avg_frame = self.fps_window / self.fps_frames as f64,
                "frame rate"
            );
            self.fps_frames = 0;
            self.fps_window = 0.0;
        }

        Tick {
            steps,
            alpha: (self.accumulator / fixed) as f32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quarter_second_loop() -> GameLoop {
        GameLoop::new(4, 5)
    }

    #[test]
    fn whole_steps_and_alpha() {
        let mut lp = quarter_second_loop();
        assert_eq!(lp.advance(0.5), Tick { steps: 2, alpha: 0.0 });

        let tick = lp.advance(0.125);
        assert_eq!(tick.steps, 0);
        assert_eq!(tick.alpha, 0.5);

        let tick = lp.advance(0.125);
        assert_eq!(tick.steps, 1);
        assert_eq!(tick.alpha, 0.0);
    }

    #[test]
    fn long_frames_are_clamped() {
        let mut lp = quarter_second_loop();
        let tick = lp.advance(10.0);
        assert_eq!(tick.steps, 5);
        assert_eq!(tick.alpha, 0.0);
        assert_eq!(lp.frame_time(), 1.25);
    }

    #[test]
    fn zero_settings_are_ignored() {
        let mut lp = GameLoop::new(0, 0);
        assert_eq!(lp.max_frame_skip(), 5);
        assert!((lp.fixed_dt() - 1.0 / 60.0).abs() < 1e-9);
        lp.set_target_fps(0);
        assert!((lp.fixed_dt() - 1.0 / 60.0).abs() < 1e-9);
    }

    #[test]
    fn fps_reported_after_one_second() {
        let mut lp = quarter_second_loop();
        for _ in 0..3 {
            lp.advance(0.25);
        }
        assert_eq!(lp.current_fps(), 0);
        lp.advance(0.25);
        assert_eq!(lp.current_fps(), 4);
    }

    #[test]
    fn stop_flag() {
        let mut lp = GameLoop::default();
        assert!(lp.is_running());
        lp.stop();
        assert!(!lp.is_running());
        lp.start();
        assert!(lp.is_running());
    }
}
