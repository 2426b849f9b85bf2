use isoworks_ecs::{Animator, Component, Entity, EntityId, SpriteRenderer, Tag};
use isoworks_scene::{Scene, SceneManager};

/// Read-only queries against scenes for debugging and the CLI.
pub struct SceneInspector;

impl SceneInspector {
    /// One summary per scene, bottom of the stack first.
    pub fn stack(manager: &SceneManager) -> Vec<SceneSummary> {
        manager.scenes().iter().map(Self::summary).collect()
    }

    pub fn summary(scene: &Scene) -> SceneSummary {
        let entities = scene.entities();
        SceneSummary {
            name: scene.name().to_string(),
            active: scene.is_active(),
            entity_count: entities.len(),
            active_entities: entities.iter().filter(|e| e.is_active()).count(),
            sprites: entities.find_with::<SpriteRenderer>().len(),
            animators: entities.find_with::<Animator>().len(),
        }
    }

    pub fn inspect_entity(scene: &Scene, id: EntityId) -> Option<EntityInfo> {
        scene.entities().get(id).map(EntityInfo::from_entity)
    }

    /// Ids of every entity, in creation order.
    pub fn list_entities(scene: &Scene) -> Vec<EntityId> {
        scene.entities().iter().map(Entity::id).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneSummary {
    pub name: String,
    pub active: bool,
    pub entity_count: usize,
    pub active_entities: usize,
    pub sprites: usize,
    pub animators: usize,
}

impl std::fmt::Display for SceneSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Scene '{}' [{}]: entities={} (active {}) sprites={} animators={}",
            self.name,
            if self.active { "active" } else { "paused" },
            self.entity_count,
            self.active_entities,
            self.sprites,
            self.animators
        )
    }
}

/// Snapshot of one entity.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityInfo {
    pub id: EntityId,
    pub name: String,
    pub active: bool,
    pub position: [f32; 2],
    pub scale: [f32; 2],
    pub tag: Option<String>,
    /// Short kind names in attach order.
    pub components: Vec<String>,
}

impl EntityInfo {
    fn from_entity(entity: &Entity) -> Self {
        let (position, scale) = entity
            .transform()
            .map_or(([0.0; 2], [1.0; 2]), |t| (t.position.to_array(), t.scale.to_array()));
        Self {
            id: entity.id(),
            name: entity.name().to_string(),
            active: entity.is_active(),
            position,
            scale,
            tag: entity.get::<Tag>().map(|t| t.value.clone()),
            components: entity
                .components()
                .map(|c| short_name(c.kind_name()).to_string())
                .collect(),
        }
    }
}

fn short_name(type_name: &str) -> &str {
    type_name.rsplit("::").next().unwrap_or(type_name)
}

impl std::fmt::Display for EntityInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Entity {} '{}' pos=({:.2}, {:.2}) scale=({:.2}, {:.2}) [{}]",
            self.id,
            self.name,
            self.position[0],
            self.position[1],
            self.scale[0],
            self.scale[1],
            self.components.join(", ")
        )?;
        if let Some(tag) = &self.tag {
            write!(f, " tag={tag}")?;
        }
        if !self.active {
            write!(f, " (inactive)")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use isoworks_common::{TextureHandle, TextureRegion};

    fn sample_scene() -> Scene {
        let mut scene = Scene::empty("cafe");
        let hero = scene.create_entity("hero");
        hero.transform_mut().unwrap().position = Vec2::new(1.0, 2.0);
        hero.add(SpriteRenderer::new(
            TextureRegion::full(TextureHandle(1)),
            Vec2::new(32.0, 32.0),
            1,
        ));
        hero.add(Tag::new("player"));
        scene.create_entity("").set_active(false);
        scene
    }

    #[test]
    fn summary_counts() {
        let scene = sample_scene();
        let summary = SceneInspector::summary(&scene);
        assert_eq!(summary.entity_count, 2);
        assert_eq!(summary.active_entities, 1);
        assert_eq!(summary.sprites, 1);
        assert_eq!(summary.animators, 0);
        assert!(!summary.active);
    }

    #[test]
    fn inspect_entity_found() {
        let scene = sample_scene();
        let id = SceneInspector::list_entities(&scene)[0];
        let info = SceneInspector::inspect_entity(&scene, id).unwrap();
        assert_eq!(info.position, [1.0, 2.0]);
        assert_eq!(info.tag.as_deref(), Some("player"));
        assert_eq!(info.components, vec!["Transform", "SpriteRenderer", "Tag"]);
    }

    #[test]
    fn inspect_entity_not_found() {
        let scene = sample_scene();
        assert!(SceneInspector::inspect_entity(&scene, EntityId(99)).is_none());
    }

    #[test]
    fn stack_lists_every_scene() {
        let mut manager = SceneManager::new();
        manager.push_scene(sample_scene());
        manager.process_pending();
        manager.push_scene(Scene::empty("pause_menu"));
        manager.process_pending();

        let stack = SceneInspector::stack(&manager);
        assert_eq!(stack.len(), 2);
        assert!(!stack[0].active);
        assert!(stack[1].active);
    }

    #[test]
    fn display_formats() {
        let scene = sample_scene();
        let s = format!("{}", SceneInspector::summary(&scene));
        assert!(s.contains("Scene 'cafe'"));
        assert!(s.contains("entities=2"));

        let info = SceneInspector::inspect_entity(&scene, EntityId(2)).unwrap();
        let s = format!("{info}");
        assert!(s.contains("Entity_2"));
        assert!(s.contains("(inactive)"));
    }
}
