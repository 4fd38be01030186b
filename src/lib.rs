//! Nodle Sockets - declarative node sockets for visual programming
//!
//! Nodes describe their sockets with [`SocketDecl`]s instead of building them
//! by hand. Whenever a node's properties change shape, its sockets are
//! regenerated from those declarations and existing connections are restored
//! by stable socket identifier. Variadic declarations end in an operator
//! sentinel; dropping a link on it grows the node by one typed socket.
//!
//! ```
//! use nodle_sockets::{NodeFactory, NodeGraph, PortType};
//! use nodle_sockets::nodes::math::FloatMathNode;
//! use nodle_sockets::nodes::lists::PackListNode;
//! use egui::Pos2;
//!
//! let mut graph = NodeGraph::new();
//! let math = graph.add_node(FloatMathNode::create(Pos2::ZERO).unwrap());
//! let pack = graph.add_node(PackListNode::create(Pos2::new(200.0, 0.0)).unwrap());
//!
//! let result = graph.find_socket(math, "result", true).unwrap();
//! let sentinel = graph.find_socket(pack, "operator:item", false).unwrap();
//! assert!(graph.try_link(result, sentinel).unwrap());
//! assert_eq!(graph.node(pack).unwrap().sockets(PortType::Input).len(), 2);
//! ```

pub mod constants;
pub mod nodes;

// Re-export commonly used types
pub use nodes::{
    Connection, GroupEntry, Node, NodeError, NodeFactory, NodeGraph, NodeId, NodeRegistry,
    NodeResult, PortType, Socket, SocketDecl, SocketId, TypeRegistry,
};
