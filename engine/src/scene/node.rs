//! Scene Graph
//!
//! Arena of nodes addressed by `NodeId`. A node is a local transform plus
//! optional components: a drawable payload and a keyframe control that
//! overwrites the local transform every frame. Parents are always created
//! before their children, so arena order is a valid top-down order.

use glam::Mat4;

use super::drawable::Drawable;
use crate::animation::KeyFrameControl;
use crate::error::{Result, SceneError};
use crate::render::MeshSink;

/// Index of a node in its `SceneGraph`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub const fn from_index(index: usize) -> Self {
        Self(index)
    }

    pub const fn index(self) -> usize {
        self.0
    }
}

#[derive(Clone, Debug)]
pub struct SceneNode {
    /// Also the submission label; keep unique when drawing to a keyed sink.
    pub name: String,
    pub transform: Mat4,
    pub drawable: Option<Drawable>,
    pub animation: Option<KeyFrameControl>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl SceneNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Mat4::IDENTITY,
            drawable: None,
            animation: None,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn with_transform(mut self, transform: Mat4) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_drawable(mut self, drawable: Drawable) -> Self {
        self.drawable = Some(drawable);
        self
    }

    pub fn with_animation(mut self, animation: KeyFrameControl) -> Self {
        self.animation = Some(animation);
        self
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Per-frame draw summary.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DrawStats {
    pub nodes_visited: usize,
    pub submissions: usize,
    pub triangles: usize,
}

#[derive(Clone, Debug, Default)]
pub struct SceneGraph {
    nodes: Vec<SceneNode>,
    roots: Vec<NodeId>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn add_root(&mut self, mut node: SceneNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        node.parent = None;
        node.children.clear();
        self.nodes.push(node);
        self.roots.push(id);
        id
    }

    /// Attach `node` under `parent`. A skinned payload must bind only nodes
    /// already in the graph.
    pub fn add_child(&mut self, parent: NodeId, mut node: SceneNode) -> Result<NodeId> {
        let id = NodeId(self.nodes.len());
        if let Some(Drawable::Skinned(skinned)) = &node.drawable {
            skinned.check_bones(self.nodes.len())?;
        }
        let parent_node = self
            .nodes
            .get_mut(parent.0)
            .ok_or(SceneError::UnknownNode(parent.0))?;
        parent_node.children.push(id);
        node.parent = Some(parent);
        node.children.clear();
        self.nodes.push(node);
        Ok(id)
    }

    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id.0)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(id.0)
    }

    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.nodes.iter().position(|n| n.name == name).map(NodeId)
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &SceneNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    /// Replace the local transform of every animated node with its track
    /// value at `now`.
    pub fn animate(&mut self, now: f32) {
        for node in &mut self.nodes {
            if let Some(control) = &node.animation {
                node.transform = control.transform_at(now);
            }
        }
    }

    /// Product of the local transforms from the root down to `id`.
    pub fn world_transform(&self, id: NodeId) -> Result<Mat4> {
        let mut node = self.node(id).ok_or(SceneError::UnknownNode(id.0))?;
        let mut world = node.transform;
        while let Some(parent) = node.parent {
            node = &self.nodes[parent.0];
            world = node.transform * world;
        }
        Ok(world)
    }

    /// World transforms of every node, indexed by node id.
    pub fn world_transforms(&self) -> Vec<Mat4> {
        let mut worlds: Vec<Mat4> = Vec::with_capacity(self.nodes.len());
        for node in &self.nodes {
            let world = match node.parent {
                Some(parent) => worlds[parent.0] * node.transform,
                None => node.transform,
            };
            worlds.push(world);
        }
        worlds
    }

    /// Animate to `now`, then submit every drawable depth-first from the
    /// roots in creation order.
    pub fn draw(&mut self, now: f32, sink: &mut dyn MeshSink) -> Result<DrawStats> {
        self.animate(now);
        let worlds = self.world_transforms();
        let mut stats = DrawStats::default();

        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id.0];
            stats.nodes_visited += 1;
            if let Some(drawable) = &node.drawable {
                drawable.submit(&node.name, worlds[id.0], &worlds, sink)?;
                stats.submissions += 1;
                stats.triangles += drawable.mesh().triangle_count();
            }
            stack.extend(node.children.iter().rev());
        }

        log::trace!(
            "frame at {now:.3}s: {} submissions, {} triangles",
            stats.submissions,
            stats.triangles
        );
        Ok(stats)
    }
}
