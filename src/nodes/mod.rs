//! Node system - sockets, declarations and graph editing

// Core node system modules
pub mod declaration;
pub mod error;
pub mod factory;
pub mod graph;
pub mod node;
pub mod port;
pub mod rebuild;
pub mod storage;
pub mod variadic;

// Built-in node kinds
pub mod lists;
pub mod math;

// Re-export core types
pub use declaration::SocketDecl;
pub use error::{NodeError, NodeResult};
pub use graph::{Connection, NodeGraph};
pub use node::{Node, NodeId, NodeProperties};
pub use port::{PortType, Socket, SocketId, SocketKind};
pub use rebuild::{ConnectionSnapshot, RebuildReport};
pub use storage::{NodeStorage, SocketPosition};
pub use variadic::GroupEntry;

// Re-export factory types
pub use factory::{
    install_type_registry, type_infos, NodeCategory, NodeFactory, NodeMetadata, NodeRegistry,
    RegistryConfig, TypeInfo, TypeRegistry, TypeSpec,
};
