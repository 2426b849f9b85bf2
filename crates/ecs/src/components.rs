//! Built-in component kinds.

use glam::Vec2;
use isoworks_assets::{AnimationPlayer, AtlasHandle, AtlasStore};
use isoworks_common::{Color, Rect, TextureRegion};

use crate::component::ComponentBase;
use crate::impl_component;

/// Position, scale and rotation in screen space. Every entity starts with one.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    pub base: ComponentBase,
    pub position: Vec2,
    pub scale: Vec2,
    /// Radians.
    pub rotation: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            base: ComponentBase::default(),
            position: Vec2::ZERO,
            scale: Vec2::ONE,
            rotation: 0.0,
        }
    }
}

impl Transform {
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
            ..Self::default()
        }
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }
}

impl_component!(Transform);

/// Draws one texture region at the entity's transform.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteRenderer {
    pub base: ComponentBase,
    pub region: TextureRegion,
    pub tint: Color,
    pub size: Vec2,
    /// Normalized pivot, `(0.5, 0.5)` is the center.
    pub origin: Vec2,
    /// Draw order, higher layers draw on top.
    pub layer: i32,
    pub flip_x: bool,
    pub flip_y: bool,
}

impl Default for SpriteRenderer {
    fn default() -> Self {
        Self {
            base: ComponentBase::default(),
            region: TextureRegion::default(),
            tint: Color::WHITE,
            size: Vec2::new(32.0, 32.0),
            origin: Vec2::new(0.5, 0.5),
            layer: 0,
            flip_x: false,
            flip_y: false,
        }
    }
}

impl SpriteRenderer {
    pub fn new(region: TextureRegion, size: Vec2, layer: i32) -> Self {
        Self {
            region,
            size,
            layer,
            ..Self::default()
        }
    }
}

impl_component!(SpriteRenderer);

/// Plays atlas animations for its entity.
///
/// The atlas is referenced by handle into an [`AtlasStore`]; without an atlas the
/// animator never advances and reports itself finished.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Animator {
    pub base: ComponentBase,
    atlas: Option<AtlasHandle>,
    player: AnimationPlayer,
}

impl Animator {
    pub fn new(atlas: AtlasHandle) -> Self {
        Self {
            atlas: Some(atlas),
            ..Self::default()
        }
    }

    pub fn atlas(&self) -> Option<AtlasHandle> {
        self.atlas
    }

    pub fn set_atlas(&mut self, atlas: Option<AtlasHandle>) {
        self.atlas = atlas;
        self.player.stop();
    }

    pub fn play(&mut self, animation: &str, force: bool) {
        self.player.play(animation, force);
    }

    pub fn update(&mut self, dt: f32, atlases: &AtlasStore) {
        let Some(atlas) = self.atlas.and_then(|h| atlases.get(h)) else {
            return;
        };
        self.player.update(dt, atlas);
    }

    pub fn is_finished(&self, atlases: &AtlasStore) -> bool {
        match self.atlas.and_then(|h| atlases.get(h)) {
            Some(atlas) => self.player.is_finished(atlas),
            None => true,
        }
    }

    /// Region for the current frame, `None` without a resolvable atlas.
    pub fn current_region(&self, atlases: &AtlasStore) -> Option<TextureRegion> {
        let atlas = self.atlas.and_then(|h| atlases.get(h))?;
        Some(self.player.current_region(atlas))
    }

    pub fn pause(&mut self) {
        self.player.pause();
    }

    pub fn resume(&mut self) {
        self.player.resume();
    }

    pub fn stop(&mut self) {
        self.player.stop();
    }

    pub fn is_playing(&self) -> bool {
        self.player.is_playing()
    }

    pub fn current_animation(&self) -> &str {
        self.player.current_animation()
    }

    pub fn elapsed(&self) -> f32 {
        self.player.elapsed()
    }

    pub fn speed(&self) -> f32 {
        self.player.speed()
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.player.set_speed(speed);
    }
}

impl_component!(Animator);

/// Axis-aligned collision box centered on the transform plus `offset`.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxCollider {
    pub base: ComponentBase,
    pub offset: Vec2,
    pub size: Vec2,
    /// Triggers report overlap but do not block movement.
    pub is_trigger: bool,
}

impl Default for BoxCollider {
    fn default() -> Self {
        Self {
            base: ComponentBase::default(),
            offset: Vec2::ZERO,
            size: Vec2::new(32.0, 32.0),
            is_trigger: false,
        }
    }
}

impl BoxCollider {
    /// World-space bounds. Without a transform the box sits at `offset`.
    pub fn bounds(&self, transform: Option<&Transform>) -> Rect {
        match transform {
            Some(t) => {
                let center = t.position + self.offset;
                Rect::new(
                    center.x - self.size.x / 2.0,
                    center.y - self.size.y / 2.0,
                    self.size.x,
                    self.size.y,
                )
            }
            None => Rect::new(self.offset.x, self.offset.y, self.size.x, self.size.y),
        }
    }
}

impl_component!(BoxCollider);

/// Free-form string label used by registry tag queries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tag {
    pub base: ComponentBase,
    pub value: String,
}

impl Tag {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            base: ComponentBase::default(),
            value: value.into(),
        }
    }
}

impl_component!(Tag);
