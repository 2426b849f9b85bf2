//! Scripted headless session: a small tiled floor with a couple of animated characters.

use glam::Vec2;
use isoworks_assets::{AtlasDescriptor, AtlasHandle, GridLayout, SpriteAtlas};
use isoworks_ecs::{Animator, BoxCollider, EntityId, EntityRegistry, SpriteRenderer, Tag};
use isoworks_render::{HeadlessTextures, TextureFilter};
use isoworks_runtime::Engine;
use isoworks_scene::{render_sprites, RenderContext, SceneBehavior, UpdateContext};
use isoworks_tilemap::{Tile, TileMap};

const CHARACTER_LAYOUT: &str = r#"{
    "grid": { "cell_width": 16, "cell_height": 24 },
    "animations": [
        { "name": "walk", "frames": { "range": { "start": 0, "end": 3 } }, "frame_duration": 0.125 },
        { "name": "wave", "frames": { "names": ["frame_4", "frame_5"] }, "frame_duration": 0.25, "looping": false }
    ]
}"#;

/// RGBA8 stripes so each grid cell gets a distinct color.
fn striped_pixels(width: u32, height: u32, stripe: u32) -> Vec<u8> {
    let mut pixels = Vec::with_capacity((width * height * 4) as usize);
    for _ in 0..height {
        for x in 0..width {
            let band = (x / stripe.max(1)) as u8;
            pixels.extend_from_slice(&[band.wrapping_mul(60), 120, 255 - band.wrapping_mul(40), 255]);
        }
    }
    pixels
}

pub struct DemoAtlases {
    pub tiles: AtlasHandle,
    pub characters: AtlasHandle,
}

/// Create the floor and character atlases through the headless texture arena.
pub fn load_atlases(engine: &mut Engine, textures: &mut HeadlessTextures) -> anyhow::Result<DemoAtlases> {
    let mut tiles = SpriteAtlas::load(
        textures,
        &striped_pixels(256, 32, 64),
        256,
        32,
        TextureFilter::Nearest,
    )?;
    tiles.define_grid(GridLayout::cells(64, 32));

    let mut characters = SpriteAtlas::load(
        textures,
        &striped_pixels(96, 24, 16),
        96,
        24,
        TextureFilter::Nearest,
    )?;
    AtlasDescriptor::from_json_str(CHARACTER_LAYOUT)?.apply(&mut characters);

    let store = engine.atlases_mut();
    Ok(DemoAtlases {
        tiles: store.insert("floor", tiles),
        characters: store.insert("characters", characters),
    })
}

/// Checkerboard floor with a raised counter along one edge.
pub fn cafe_floor(width: i32, height: i32, tileset: AtlasHandle) -> TileMap {
    let mut map = TileMap::new(width, height);
    for y in 0..height {
        for x in 0..width {
            map.set(x, y, Tile::new(1 + ((x + y) % 2) as u32));
        }
    }
    for x in 1..width - 1 {
        map.set(x, 0, Tile::new(3).with_height(1));
    }
    map.set_tileset(Some(tileset));
    map
}

/// Scene logic: a barista walking the counter and a customer who leaves after a while.
pub struct CafeFloor {
    map: TileMap,
    characters: AtlasHandle,
    barista: Option<EntityId>,
    elapsed: f32,
}

impl CafeFloor {
    pub fn new(map: TileMap, characters: AtlasHandle) -> Self {
        Self {
            map,
            characters,
            barista: None,
            elapsed: 0.0,
        }
    }

    fn spawn_character(&self, entities: &mut EntityRegistry, name: &str, at: Vec2, tag: &str) -> EntityId {
        let e = entities.create(name);
        if let Some(t) = e.transform_mut() {
            t.position = at;
        }
        e.add(SpriteRenderer {
            size: Vec2::new(16.0, 24.0),
            origin: Vec2::new(0.5, 1.0),
            layer: 1,
            ..SpriteRenderer::default()
        });
        e.add(Animator::new(self.characters)).play("walk", false);
        e.add(BoxCollider {
            size: Vec2::new(12.0, 8.0),
            ..BoxCollider::default()
        });
        e.add(Tag::new(tag));
        e.id()
    }
}

impl SceneBehavior for CafeFloor {
    fn on_enter(&mut self, entities: &mut EntityRegistry) {
        self.barista = Some(self.spawn_character(entities, "barista", Vec2::new(0.0, 40.0), "staff"));
        self.spawn_character(entities, "customer", Vec2::new(-64.0, 96.0), "leaving");
        tracing::info!(entities = entities.len(), "cafe opened");
    }

    fn on_exit(&mut self, entities: &mut EntityRegistry) {
        tracing::info!(entities = entities.len(), elapsed = self.elapsed, "cafe closed");
    }

    fn update(&mut self, ctx: &mut UpdateContext<'_>, dt: f32) {
        self.elapsed += dt;
        if let Some(id) = self.barista {
            if let Some(t) = ctx.entities.get_mut(id).and_then(|e| e.transform_mut()) {
                t.translate(Vec2::new(24.0 * dt, 0.0));
            }
        }

        if self.elapsed >= 1.0 {
            let leaving: Vec<EntityId> = ctx.entities.find_by_tag("leaving").iter().map(|e| e.id()).collect();
            for id in leaving {
                tracing::debug!(%id, "customer leaves");
                ctx.entities.destroy(id);
            }
        }
    }

    fn render(&self, entities: &EntityRegistry, ctx: &mut RenderContext<'_>) {
        let stats = self.map.render(ctx.projection, ctx.viewport, ctx.atlases, ctx.renderer);
        let sprites = render_sprites(entities, ctx.renderer);
        tracing::trace!(tiles = stats.drawn, sprites, "cafe rendered");
    }
}
