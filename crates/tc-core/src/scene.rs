//! Scene graph holding the nodes the controls manipulate
//!
//! Nodes live in a flat map keyed by [`NodeId`] and reference their parent
//! by id. The graph is created with a root node; every node reachable from
//! the root through its parent chain is part of the renderable hierarchy.
//! Nodes created with [`SceneGraph::add_detached`] have no parent and are
//! not part of it.

use std::collections::HashMap;

use glam::Mat4;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::SceneError;
use crate::pose::Pose;

/// Stable identifier of a scene node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub Uuid);

impl NodeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A node with a local transform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Transform relative to the parent
    pub local: Pose,
}

/// Flat scene graph with a root node
#[derive(Debug, Clone)]
pub struct SceneGraph {
    root: NodeId,
    nodes: HashMap<NodeId, Node>,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    /// Create a graph containing only the root node
    pub fn new() -> Self {
        let root = NodeId::new();
        let mut nodes = HashMap::new();
        nodes.insert(
            root,
            Node {
                id: root,
                name: "Scene".into(),
                parent: None,
                children: Vec::new(),
                local: Pose::IDENTITY,
            },
        );
        Self { root, nodes }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    /// Add a node under `parent`
    pub fn add_child(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        local: Pose,
    ) -> Result<NodeId, SceneError> {
        let parent_node = self
            .nodes
            .get_mut(&parent)
            .ok_or(SceneError::NodeNotFound(parent))?;
        let id = NodeId::new();
        parent_node.children.push(id);
        self.nodes.insert(
            id,
            Node {
                id,
                name: name.into(),
                parent: Some(parent),
                children: Vec::new(),
                local,
            },
        );
        Ok(id)
    }

    /// Add a node that is not attached to the hierarchy
    pub fn add_detached(&mut self, name: impl Into<String>, local: Pose) -> NodeId {
        let id = NodeId::new();
        self.nodes.insert(
            id,
            Node {
                id,
                name: name.into(),
                parent: None,
                children: Vec::new(),
                local,
            },
        );
        id
    }

    /// Remove a node and its whole subtree
    pub fn remove(&mut self, id: NodeId) -> Result<(), SceneError> {
        if id == self.root {
            return Err(SceneError::RootRemoval);
        }
        let node = self.nodes.remove(&id).ok_or(SceneError::NodeNotFound(id))?;
        tracing::debug!("Removed scene node '{}' ({})", node.name, id);
        if let Some(parent) = node.parent.and_then(|p| self.nodes.get_mut(&p)) {
            parent.children.retain(|c| *c != id);
        }
        self.remove_descendants(node.children);
        Ok(())
    }

    fn remove_descendants(&mut self, mut pending: Vec<NodeId>) {
        while let Some(id) = pending.pop() {
            if let Some(node) = self.nodes.remove(&id) {
                tracing::debug!("Removed scene node '{}' ({})", node.name, id);
                pending.extend(node.children);
            }
        }
    }

    /// Local pose of a node
    pub fn local_pose(&self, id: NodeId) -> Result<Pose, SceneError> {
        self.nodes
            .get(&id)
            .map(|n| n.local)
            .ok_or(SceneError::NodeNotFound(id))
    }

    /// Replace the local pose of a node
    pub fn set_local_pose(&mut self, id: NodeId, pose: Pose) -> Result<(), SceneError> {
        let node = self
            .nodes
            .get_mut(&id)
            .ok_or(SceneError::NodeNotFound(id))?;
        node.local = Pose {
            rotation: pose.rotation.normalize(),
            ..pose
        };
        Ok(())
    }

    /// Local-to-world matrix, walking the parent chain
    pub fn world_matrix(&self, id: NodeId) -> Result<Mat4, SceneError> {
        let mut matrix = Mat4::IDENTITY;
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self
                .nodes
                .get(&node_id)
                .ok_or(SceneError::NodeNotFound(node_id))?;
            matrix = node.local.to_matrix() * matrix;
            current = node.parent;
        }
        Ok(matrix)
    }

    /// World matrix of the node's parent.
    ///
    /// Fails with [`SceneError::NotInSceneGraph`] for parentless nodes.
    pub fn parent_world_matrix(&self, id: NodeId) -> Result<Mat4, SceneError> {
        let node = self.nodes.get(&id).ok_or(SceneError::NodeNotFound(id))?;
        let parent = node.parent.ok_or(SceneError::NotInSceneGraph(id))?;
        self.world_matrix(parent)
    }

    /// True when the node's parent chain ends at the root
    pub fn is_in_hierarchy(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node_id) = current {
            if node_id == self.root {
                return true;
            }
            current = self.nodes.get(&node_id).and_then(|n| n.parent);
        }
        false
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
