//! Error types for socket building and graph editing

use super::node::NodeId;
use super::port::SocketId;
use thiserror::Error;

/// Errors raised while materializing sockets or editing a node graph
#[derive(Debug, Error)]
pub enum NodeError {
    /// The socket type registry has no entry for this type name
    #[error("unknown socket type '{0}'")]
    UnknownType(String),

    /// A type property holds a name the registry cannot resolve
    #[error("property '{property}' holds unresolved type '{type_name}'")]
    UnresolvedType { property: String, type_name: String },

    /// A declaration reads a type property the node does not carry
    #[error("node has no type property '{0}'")]
    MissingProperty(String),

    #[error("node {0} does not exist")]
    NodeNotFound(NodeId),

    #[error("socket {0} does not exist")]
    SocketNotFound(SocketId),

    /// No socket on the node carries this stable identifier
    #[error("node {node} has no socket '{identifier}'")]
    IdentifierNotFound { node: NodeId, identifier: String },

    #[error("invalid connection: {0}")]
    InvalidConnection(&'static str),

    /// No variadic group entry carries this identifier prefix
    #[error("no group entry with prefix '{0}'")]
    UnknownGroupEntry(String),

    #[error("configuration error: {0}")]
    Config(#[from] serde_json::Error),
}

impl NodeError {
    /// Whether this error came from resolving a socket type
    pub fn is_type_error(&self) -> bool {
        matches!(
            self,
            NodeError::UnknownType(_)
                | NodeError::UnresolvedType { .. }
                | NodeError::MissingProperty(_)
        )
    }
}

pub type NodeResult<T> = Result<T, NodeError>;
