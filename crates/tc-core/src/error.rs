//! Scene graph errors

use thiserror::Error;

use crate::scene::NodeId;

/// Errors returned by scene graph queries
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SceneError {
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("Node {0} is not part of the scene graph (no parent)")]
    NotInSceneGraph(NodeId),

    #[error("The scene root cannot be removed")]
    RootRemoval,
}
