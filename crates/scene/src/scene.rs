use std::fmt;

use isoworks_assets::AtlasStore;
use isoworks_common::Rect;
use isoworks_ecs::{Animator, Component, Entity, EntityRegistry, SpriteRenderer, Transform};
use isoworks_render::{Renderer, Sprite};
use isoworks_tilemap::IsoProjection;

use crate::manager::SceneRequests;

/// Everything a behaviour may touch during update.
pub struct UpdateContext<'a> {
    pub entities: &'a mut EntityRegistry,
    pub atlases: &'a AtlasStore,
    pub projection: &'a mut IsoProjection,
    /// Stack operations requested here apply at the next `process_pending`.
    pub requests: &'a mut SceneRequests,
}

/// Render-phase collaborators, shared by every scene in the stack.
pub struct RenderContext<'a> {
    pub renderer: &'a mut dyn Renderer,
    pub atlases: &'a AtlasStore,
    pub projection: &'a IsoProjection,
    pub viewport: Rect,
}

/// Game logic plugged into a [`Scene`]. Every hook has a no-op default.
pub trait SceneBehavior {
    fn on_enter(&mut self, _entities: &mut EntityRegistry) {}

    fn on_exit(&mut self, _entities: &mut EntityRegistry) {}

    fn on_pause(&mut self, _entities: &mut EntityRegistry) {}

    fn on_resume(&mut self, _entities: &mut EntityRegistry) {}

    /// Runs before animators advance and before destroyed entities are flushed.
    fn update(&mut self, _ctx: &mut UpdateContext<'_>, _dt: f32) {}

    /// Draw the scene. Defaults to the layer-sorted sprite pass.
    fn render(&self, entities: &EntityRegistry, ctx: &mut RenderContext<'_>) {
        render_sprites(entities, ctx.renderer);
    }
}

struct Inert;

impl SceneBehavior for Inert {}

/// A named set of entities plus the behaviour driving them.
pub struct Scene {
    name: String,
    entities: EntityRegistry,
    active: bool,
    behavior: Box<dyn SceneBehavior>,
}

impl fmt::Debug for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scene")
            .field("name", &self.name)
            .field("active", &self.active)
            .field("entities", &self.entities.len())
            .finish_non_exhaustive()
    }
}

impl Scene {
    pub fn new(name: impl Into<String>, behavior: impl SceneBehavior + 'static) -> Self {
        Self {
            name: name.into(),
            entities: EntityRegistry::new(),
            active: false,
            behavior: Box::new(behavior),
        }
    }

    /// A scene with no game logic of its own.
    pub fn empty(name: impl Into<String>) -> Self {
        Self::new(name, Inert)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn entities(&self) -> &EntityRegistry {
        &self.entities
    }

    pub fn entities_mut(&mut self) -> &mut EntityRegistry {
        &mut self.entities
    }

    pub fn create_entity(&mut self, name: &str) -> &mut Entity {
        self.entities.create(name)
    }

    pub fn find_entity(&self, name: &str) -> Option<&Entity> {
        self.entities.find_by_name(name)
    }

    pub fn find_entities_with_tag(&self, tag: &str) -> Vec<&Entity> {
        self.entities.find_by_tag(tag)
    }

    /// One simulation step: behaviour logic, animators, then deferred destruction.
    pub fn update(
        &mut self,
        dt: f32,
        atlases: &AtlasStore,
        projection: &mut IsoProjection,
        requests: &mut SceneRequests,
    ) {
        let mut ctx = UpdateContext {
            entities: &mut self.entities,
            atlases,
            projection,
            requests,
        };
        self.behavior.update(&mut ctx, dt);

        update_animators(&mut self.entities, dt, atlases);
        self.entities.flush_pending_destroys();
    }

    pub fn render(&self, ctx: &mut RenderContext<'_>) {
        self.behavior.render(&self.entities, ctx);
    }

    pub(crate) fn enter(&mut self) {
        self.active = true;
        self.behavior.on_enter(&mut self.entities);
    }

    pub(crate) fn exit(&mut self) {
        self.active = false;
        self.behavior.on_exit(&mut self.entities);
    }

    pub(crate) fn pause(&mut self) {
        self.active = false;
        self.behavior.on_pause(&mut self.entities);
    }

    pub(crate) fn resume(&mut self) {
        self.active = true;
        self.behavior.on_resume(&mut self.entities);
    }
}

/// Advance every enabled animator, then show its current frame on the entity's sprite.
fn update_animators(entities: &mut EntityRegistry, dt: f32, atlases: &AtlasStore) {
    entities.for_each_with::<Animator>(|_, animator, _| animator.update(dt, atlases));

    entities.for_each(|entity, _| {
        let region = entity
            .get::<Animator>()
            .filter(|a| a.is_enabled() && !a.current_animation().is_empty())
            .and_then(|a| a.current_region(atlases));
        if let (Some(region), Some(sprite)) = (region, entity.get_mut::<SpriteRenderer>()) {
            sprite.region = region;
        }
    });
}

/// Submit every drawable sprite in one batch, lowest layer first.
///
/// Drawable means: active entity, enabled `Transform`, enabled `SpriteRenderer` with a
/// valid texture. Equal layers keep registry order. Returns the number of sprites drawn.
pub fn render_sprites(entities: &EntityRegistry, renderer: &mut dyn Renderer) -> usize {
    let mut drawables: Vec<(&Entity, &Transform, &SpriteRenderer)> = entities
        .iter()
        .filter(|e| e.is_active())
        .filter_map(|e| Some((e, e.transform()?, e.get::<SpriteRenderer>()?)))
        .filter(|(e, t, s)| {
            if !t.is_enabled() || !s.is_enabled() {
                return false;
            }
            if !s.region.texture.is_valid() {
                tracing::trace!(entity = %e.id(), "sprite has no texture, skipped");
                return false;
            }
            true
        })
        .collect();
    drawables.sort_by_key(|(_, _, s)| s.layer);

    renderer.begin_batch();
    for (_, t, sr) in &drawables {
        renderer.draw_sprite(&Sprite {
            position: t.position,
            size: sr.size * t.scale,
            region: sr.region.flipped(sr.flip_x, sr.flip_y),
            tint: sr.tint,
            rotation: t.rotation,
            origin: sr.origin,
        });
    }
    renderer.end_batch();
    drawables.len()
}
