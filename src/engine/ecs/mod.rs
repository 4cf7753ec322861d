pub mod component;
pub mod system;

#[cfg(test)]
mod world_graph_tests;

use slotmap::{SlotMap, new_key_type};

use crate::engine::ecs::component::{OrbitingBody, ParentPose, RenderableComponent};
use crate::engine::{EngineError, EngineResult};

pub use system::SystemWorld;

new_key_type! {
    /// Stable handle to a body in the [`World`] arena.
    pub struct BodyId;
}

/// World-owned record for one body plus its place in the forest.
#[derive(Debug, Clone)]
pub struct BodyNode {
    pub name: String,
    pub body: OrbitingBody,
    pub renderable: RenderableComponent,
    parent: Option<BodyId>,
    children: Vec<BodyId>,
}

/// Flat arena of orbiting bodies.
///
/// Topology is a forest (stars backdrop and sun are both roots, for example).
/// A parent must already be in the arena when its child is inserted and links
/// never change afterwards, so cycles cannot be built.
#[derive(Debug, Default)]
pub struct World {
    nodes: SlotMap<BodyId, BodyNode>,
    roots: Vec<BodyId>,

    /// Parents-first traversal, rebuilt lazily after insertions.
    order: Vec<BodyId>,
    order_dirty: bool,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a body under `parent` (or as a new root).
    ///
    /// The body's world matrix is computed from its parent's current pose
    /// before this returns.
    pub fn add_body(
        &mut self,
        name: impl Into<String>,
        mut body: OrbitingBody,
        renderable: RenderableComponent,
        parent: Option<BodyId>,
    ) -> EngineResult<BodyId> {
        let parent_pose = match parent {
            Some(p) => Some(self.pose_of(p).ok_or(EngineError::UnknownBody(p))?),
            None => None,
        };
        body.refresh(parent_pose.as_ref());

        let id = self.nodes.insert(BodyNode {
            name: name.into(),
            body,
            renderable,
            parent,
            children: Vec::new(),
        });

        match parent {
            Some(p) => {
                if let Some(parent_node) = self.nodes.get_mut(p) {
                    parent_node.children.push(id);
                }
            }
            None => self.roots.push(id),
        }

        self.order_dirty = true;
        Ok(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: BodyId) -> Option<&BodyNode> {
        self.nodes.get(id)
    }

    pub fn body(&self, id: BodyId) -> Option<&OrbitingBody> {
        self.nodes.get(id).map(|n| &n.body)
    }

    pub fn renderable(&self, id: BodyId) -> Option<&RenderableComponent> {
        self.nodes.get(id).map(|n| &n.renderable)
    }

    pub fn name_of(&self, id: BodyId) -> Option<&str> {
        self.nodes.get(id).map(|n| n.name.as_str())
    }

    pub fn find_by_name(&self, name: &str) -> Option<BodyId> {
        self.nodes
            .iter()
            .find_map(|(id, n)| (n.name == name).then_some(id))
    }

    /// Parent body id (None means it's a root).
    pub fn parent_of(&self, id: BodyId) -> Option<BodyId> {
        self.nodes.get(id).and_then(|n| n.parent)
    }

    pub fn children_of(&self, id: BodyId) -> &[BodyId] {
        self.nodes
            .get(id)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn roots(&self) -> &[BodyId] {
        &self.roots
    }

    pub fn bodies(&self) -> impl Iterator<Item = (BodyId, &BodyNode)> {
        self.nodes.iter()
    }

    fn pose_of(&self, id: BodyId) -> Option<ParentPose> {
        self.nodes.get(id).map(|n| n.body.pose())
    }

    /// Every body, each parent ahead of all of its descendants.
    pub fn update_order(&mut self) -> &[BodyId] {
        if self.order_dirty {
            self.rebuild_order();
        }
        &self.order
    }

    fn rebuild_order(&mut self) {
        self.order.clear();

        let mut stack: Vec<BodyId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            self.order.push(id);
            if let Some(node) = self.nodes.get(id) {
                stack.extend(node.children.iter().rev().copied());
            }
        }

        debug_assert_eq!(
            self.order.len(),
            self.nodes.len(),
            "body forest traversal must reach every body exactly once"
        );
        self.order_dirty = false;
    }

    /// Advance every body by `dt_sec` in parents-first order, so each child
    /// composes against its parent's pose for this same frame.
    pub fn advance_all(&mut self, dt_sec: f32) {
        self.for_each_in_order(|body, parent| body.advance(dt_sec, parent));
    }

    /// Reset every body's angles in parents-first order.
    pub fn reset_all(&mut self) {
        self.for_each_in_order(|body, parent| body.reset_rotation(parent));
    }

    /// Advance a single body against its parent's current pose.
    #[cfg(test)]
    pub fn advance_body(&mut self, id: BodyId, dt_sec: f32) -> EngineResult<()> {
        let parent_pose = self.parent_of(id).and_then(|p| self.pose_of(p));
        let node = self.nodes.get_mut(id).ok_or(EngineError::UnknownBody(id))?;
        node.body.advance(dt_sec, parent_pose.as_ref());
        Ok(())
    }

    fn for_each_in_order(&mut self, mut f: impl FnMut(&mut OrbitingBody, Option<&ParentPose>)) {
        if self.order_dirty {
            self.rebuild_order();
        }

        for &id in &self.order {
            let parent_pose = self
                .nodes
                .get(id)
                .and_then(|n| n.parent)
                .and_then(|p| self.nodes.get(p))
                .map(|p| p.body.pose());

            if let Some(node) = self.nodes.get_mut(id) {
                f(&mut node.body, parent_pose.as_ref());
            }
        }
    }
}
