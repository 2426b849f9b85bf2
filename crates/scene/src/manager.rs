use std::fmt;

use isoworks_assets::AtlasStore;
use isoworks_tilemap::IsoProjection;

use crate::scene::{RenderContext, Scene};

/// A requested stack change, applied at the next flush.
#[derive(Debug, Default)]
pub enum PendingOp {
    #[default]
    None,
    Push(Scene),
    Pop,
    Replace(Scene),
    Clear,
}

impl PendingOp {
    pub fn kind(&self) -> &'static str {
        match self {
            PendingOp::None => "none",
            PendingOp::Push(_) => "push",
            PendingOp::Pop => "pop",
            PendingOp::Replace(_) => "replace",
            PendingOp::Clear => "clear",
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, PendingOp::None)
    }
}

/// Single-slot request box for stack operations.
///
/// Scenes receive it during update; game code outside the frame reaches it through the
/// [`SceneManager`]. A request overwrites any request already waiting.
#[derive(Debug, Default)]
pub struct SceneRequests {
    pending: PendingOp,
}

impl SceneRequests {
    pub fn push(&mut self, scene: Scene) {
        self.set(PendingOp::Push(scene));
    }

    pub fn pop(&mut self) {
        self.set(PendingOp::Pop);
    }

    pub fn replace(&mut self, scene: Scene) {
        self.set(PendingOp::Replace(scene));
    }

    pub fn clear(&mut self) {
        self.set(PendingOp::Clear);
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_none()
    }

    pub fn pending(&self) -> &PendingOp {
        &self.pending
    }

    /// Remove and return the waiting request.
    pub fn take(&mut self) -> PendingOp {
        std::mem::take(&mut self.pending)
    }

    fn set(&mut self, op: PendingOp) {
        let dropped = std::mem::replace(&mut self.pending, op);
        if !dropped.is_none() {
            tracing::debug!(
                dropped = dropped.kind(),
                kept = self.pending.kind(),
                "pending scene op overwritten"
            );
        }
    }
}

/// Called after every applied push, pop or replace with `(previous top, new top)`.
pub type TransitionCallback = Box<dyn FnMut(Option<&Scene>, &Scene)>;

/// Owns the scene stack and applies requested changes at the frame boundary.
#[derive(Default)]
pub struct SceneManager {
    scenes: Vec<Scene>,
    requests: SceneRequests,
    on_transition: Option<TransitionCallback>,
}

impl fmt::Debug for SceneManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneManager")
            .field("scenes", &self.scenes)
            .field("pending", &self.requests.pending().kind())
            .finish_non_exhaustive()
    }
}

impl SceneManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_scene(&mut self, scene: Scene) {
        self.requests.push(scene);
    }

    pub fn pop_scene(&mut self) {
        self.requests.pop();
    }

    pub fn replace_scene(&mut self, scene: Scene) {
        self.requests.replace(scene);
    }

    pub fn clear_scenes(&mut self) {
        self.requests.clear();
    }

    pub fn requests_mut(&mut self) -> &mut SceneRequests {
        &mut self.requests
    }

    pub fn has_pending(&self) -> bool {
        self.requests.has_pending()
    }

    pub fn set_transition_callback(&mut self, callback: TransitionCallback) {
        self.on_transition = Some(callback);
    }

    /// Top of the stack.
    pub fn current(&self) -> Option<&Scene> {
        self.scenes.last()
    }

    pub fn current_mut(&mut self) -> Option<&mut Scene> {
        self.scenes.last_mut()
    }

    /// Scene at `index`, counted from the bottom.
    pub fn scene_at(&self, index: usize) -> Option<&Scene> {
        self.scenes.get(index)
    }

    pub fn scenes(&self) -> &[Scene] {
        &self.scenes
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    /// Update the top scene if it is active.
    pub fn update(&mut self, dt: f32, atlases: &AtlasStore, projection: &mut IsoProjection) {
        if let Some(scene) = self.scenes.last_mut().filter(|s| s.is_active()) {
            scene.update(dt, atlases, projection, &mut self.requests);
        }
    }

    /// Render every scene, bottom of the stack first.
    pub fn render(&self, ctx: &mut RenderContext<'_>) {
        for scene in &self.scenes {
            scene.render(ctx);
        }
    }

    /// Apply the waiting request, if any.
    pub fn process_pending(&mut self) {
        match self.requests.take() {
            PendingOp::None => {}
            PendingOp::Push(scene) => self.apply_push(scene),
            PendingOp::Pop => self.apply_pop(),
            PendingOp::Replace(scene) => self.apply_replace(scene),
            PendingOp::Clear => self.apply_clear(),
        }
    }

    fn apply_push(&mut self, mut scene: Scene) {
        if let Some(top) = self.scenes.last_mut() {
            top.pause();
        }
        tracing::debug!(scene = scene.name(), depth = self.scenes.len() + 1, "push scene");
        scene.enter();
        self.scenes.push(scene);
        self.notify_top(None);
    }

    fn apply_pop(&mut self) {
        let Some(mut popped) = self.scenes.pop() else {
            tracing::debug!("pop on empty scene stack ignored");
            return;
        };
        popped.exit();
        tracing::debug!(scene = popped.name(), depth = self.scenes.len(), "pop scene");
        let Some(top) = self.scenes.last_mut() else {
            return;
        };
        top.resume();
        if let Some(cb) = self.on_transition.as_mut() {
            cb(Some(&popped), top);
        }
    }

    fn apply_replace(&mut self, mut scene: Scene) {
        let old = self.scenes.pop().map(|mut old| {
            old.exit();
            old
        });
        tracing::debug!(
            from = ?old.as_ref().map(Scene::name),
            to = scene.name(),
            "replace scene"
        );
        scene.enter();
        self.scenes.push(scene);
        self.notify_top(old.as_ref());
    }

    fn apply_clear(&mut self) {
        tracing::debug!(depth = self.scenes.len(), "clear scene stack");
        while let Some(mut scene) = self.scenes.pop() {
            scene.exit();
        }
    }

    /// Fire the transition callback for a freshly placed top. `replaced` is the previous
    /// top when it already left the stack.
    fn notify_top(&mut self, replaced: Option<&Scene>) {
        let Some(cb) = self.on_transition.as_mut() else {
            return;
        };
        let Some((top, below)) = self.scenes.split_last() else {
            return;
        };
        let previous = replaced.or_else(|| below.last());
        cb(previous, top);
    }
}
