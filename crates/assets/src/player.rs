use isoworks_common::TextureRegion;

use crate::atlas::SpriteAtlas;

/// Playback cursor over one atlas animation.
///
/// The player does not own or reference the atlas; every call that needs animation
/// data takes it as an argument. This keeps the cursor a plain value that components can
/// embed.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationPlayer {
    current: String,
    elapsed: f32,
    speed: f32,
    playing: bool,
}

impl Default for AnimationPlayer {
    fn default() -> Self {
        Self {
            current: String::new(),
            elapsed: 0.0,
            speed: 1.0,
            playing: false,
        }
    }
}

impl AnimationPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start `name` from the beginning. Re-playing the running animation is ignored
    /// unless `force` is set.
    pub fn play(&mut self, name: &str, force: bool) {
        if !force && self.playing && self.current == name {
            return;
        }
        self.current.clear();
        self.current.push_str(name);
        self.elapsed = 0.0;
        self.playing = true;
    }

    /// Advance by `dt * speed`.
    ///
    /// A non-looping animation stops exactly at its total duration and stays on its last
    /// frame; a looping one wraps modulo its total duration.
    pub fn update(&mut self, dt: f32, atlas: &SpriteAtlas) {
        if !self.playing {
            return;
        }
        self.elapsed += dt * self.speed;

        let Some(anim) = atlas.animation(&self.current) else {
            return;
        };
        let total = anim.total_duration();
        if anim.looping {
            if total > 0.0 {
                self.elapsed = self.elapsed.rem_euclid(total);
            }
        } else if self.elapsed >= total {
            self.elapsed = total;
            self.playing = false;
        }
    }

    /// True once a non-looping animation has reached its end. Looping animations never
    /// finish; an unknown animation counts as finished.
    pub fn is_finished(&self, atlas: &SpriteAtlas) -> bool {
        match atlas.animation(&self.current) {
            None => true,
            Some(anim) if anim.looping => false,
            Some(anim) => self.elapsed >= anim.total_duration(),
        }
    }

    pub fn current_region(&self, atlas: &SpriteAtlas) -> TextureRegion {
        atlas.animation_frame(&self.current, self.elapsed)
    }

    pub fn current_frame_index(&self, atlas: &SpriteAtlas) -> usize {
        atlas.animation_frame_index(&self.current, self.elapsed)
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    pub fn resume(&mut self) {
        self.playing = true;
    }

    pub fn stop(&mut self) {
        self.playing = false;
        self.current.clear();
        self.elapsed = 0.0;
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn current_animation(&self) -> &str {
        &self.current
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atlas::GridLayout;
    use isoworks_common::TextureHandle;

    fn atlas() -> SpriteAtlas {
        let mut atlas = SpriteAtlas::from_texture(TextureHandle(1), 128, 32);
        atlas.define_grid(GridLayout::cells(32, 32));
        atlas.define_animation_range("once", 0, 3, 0.25, false);
        atlas.define_animation_range("loop", 0, 3, 0.25, true);
        atlas
    }

    #[test]
    fn non_looping_finishes_exactly_at_total_duration() {
        let atlas = atlas();
        let mut p = AnimationPlayer::new();
        p.play("once", false);

        for _ in 0..3 {
            p.update(0.25, &atlas);
            assert!(!p.is_finished(&atlas));
        }
        assert_eq!(p.current_frame_index(&atlas), 3);

        p.update(0.25, &atlas);
        assert!(p.is_finished(&atlas));
        assert!(!p.is_playing());
        assert_eq!(p.elapsed(), 1.0);
        assert_eq!(p.current_frame_index(&atlas), 3);

        // Never advances past the final frame.
        p.update(5.0, &atlas);
        assert_eq!(p.elapsed(), 1.0);
        assert_eq!(p.current_frame_index(&atlas), 3);
    }

    #[test]
    fn looping_wraps() {
        let atlas = atlas();
        let mut p = AnimationPlayer::new();
        p.play("loop", false);
        p.update(1.5, &atlas);
        assert!(p.is_playing());
        assert!(!p.is_finished(&atlas));
        assert_eq!(p.elapsed(), 0.5);
        assert_eq!(p.current_frame_index(&atlas), 2);
    }

    #[test]
    fn speed_scales_time() {
        let atlas = atlas();
        let mut p = AnimationPlayer::new();
        p.set_speed(2.0);
        p.play("once", false);
        p.update(0.25, &atlas);
        assert_eq!(p.elapsed(), 0.5);
    }

    #[test]
    fn replay_same_animation_is_ignored_unless_forced() {
        let atlas = atlas();
        let mut p = AnimationPlayer::new();
        p.play("loop", false);
        p.update(0.5, &atlas);
        p.play("loop", false);
        assert_eq!(p.elapsed(), 0.5);
        p.play("loop", true);
        assert_eq!(p.elapsed(), 0.0);
    }

    #[test]
    fn pause_resume_stop() {
        let atlas = atlas();
        let mut p = AnimationPlayer::new();
        p.play("loop", false);
        p.pause();
        p.update(0.5, &atlas);
        assert_eq!(p.elapsed(), 0.0);
        p.resume();
        p.update(0.25, &atlas);
        assert_eq!(p.elapsed(), 0.25);
        p.stop();
        assert!(!p.is_playing());
        assert_eq!(p.current_animation(), "");
    }

    #[test]
    fn unknown_animation_counts_as_finished() {
        let atlas = atlas();
        let mut p = AnimationPlayer::new();
        p.play("ghost", false);
        assert!(p.is_finished(&atlas));
    }
}
