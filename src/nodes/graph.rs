//! Node graph data structures and operations

use super::error::{NodeError, NodeResult};
use super::node::{Node, NodeId};
use super::port::{reserve_socket_ids, Socket, SocketId};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// A directed edge from an output socket to an input socket
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Connection {
    pub from_node: NodeId,
    pub from_socket: SocketId,
    pub to_node: NodeId,
    pub to_socket: SocketId,
}

impl Connection {
    /// Creates a new connection
    pub fn new(
        from_node: NodeId,
        from_socket: SocketId,
        to_node: NodeId,
        to_socket: SocketId,
    ) -> Self {
        Self {
            from_node,
            from_socket,
            to_node,
            to_socket,
        }
    }

    pub fn touches(&self, socket: SocketId) -> bool {
        self.from_socket == socket || self.to_socket == socket
    }
}

/// A graph containing nodes and their connections
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeGraph {
    pub nodes: HashMap<NodeId, Node>,
    pub connections: BTreeSet<Connection>,
    next_node_id: NodeId,
}

impl NodeGraph {
    /// Creates a new empty node graph
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            connections: BTreeSet::new(),
            next_node_id: 0,
        }
    }

    /// Adds a node to the graph and returns its ID
    pub fn add_node(&mut self, mut node: Node) -> NodeId {
        let id = self.next_node_id;
        node.id = id;
        self.nodes.insert(id, node);
        self.next_node_id += 1;
        id
    }

    /// Removes a node and all its connections
    pub fn remove_node(&mut self, node_id: NodeId) -> Option<Node> {
        self.connections
            .retain(|conn| conn.from_node != node_id && conn.to_node != node_id);
        self.nodes.remove(&node_id)
    }

    pub fn node(&self, node_id: NodeId) -> Option<&Node> {
        self.nodes.get(&node_id)
    }

    pub fn node_mut(&mut self, node_id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&node_id)
    }

    /// Find the node owning a socket
    pub fn locate(&self, socket: SocketId) -> Option<(NodeId, &Socket)> {
        self.nodes
            .values()
            .find_map(|node| node.socket(socket).map(|s| (node.id, s)))
    }

    pub fn socket(&self, socket: SocketId) -> Option<&Socket> {
        self.locate(socket).map(|(_, s)| s)
    }

    /// Find a socket by its stable identifier
    pub fn find_socket(
        &self,
        node_id: NodeId,
        identifier: &str,
        is_output: bool,
    ) -> Option<SocketId> {
        self.node(node_id)?
            .find_socket(identifier, is_output)
            .map(|s| s.id)
    }

    /// Like [`NodeGraph::find_socket`], failing when the identifier is absent
    pub fn require_socket(
        &self,
        node_id: NodeId,
        identifier: &str,
        is_output: bool,
    ) -> NodeResult<SocketId> {
        let node = self.node(node_id).ok_or(NodeError::NodeNotFound(node_id))?;
        node.find_socket(identifier, is_output)
            .map(|s| s.id)
            .ok_or_else(|| NodeError::IdentifierNotFound {
                node: node_id,
                identifier: identifier.to_string(),
            })
    }

    /// Build the first socket set of a node already in the graph.
    ///
    /// Any edges on the node's previous sockets are dropped.
    pub fn initialize_sockets(&mut self, node_id: NodeId) -> NodeResult<()> {
        let node = self
            .nodes
            .get_mut(&node_id)
            .ok_or(NodeError::NodeNotFound(node_id))?;
        node.initialize_sockets()?;
        self.connections
            .retain(|conn| conn.from_node != node_id && conn.to_node != node_id);
        Ok(())
    }

    /// Create an edge from an output socket to an input socket.
    ///
    /// Returns whether a new edge was made; an existing edge is left alone.
    pub fn create_connection(&mut self, from: SocketId, to: SocketId) -> NodeResult<bool> {
        let (from_node, from_socket) = self.locate(from).ok_or(NodeError::SocketNotFound(from))?;
        let (to_node, to_socket) = self.locate(to).ok_or(NodeError::SocketNotFound(to))?;

        if !from_socket.is_output() || !to_socket.is_input() {
            return Err(NodeError::InvalidConnection("edges run from an output to an input"));
        }
        if from_socket.is_operator() || to_socket.is_operator() {
            return Err(NodeError::InvalidConnection("operator sockets do not carry data"));
        }
        if from_node == to_node {
            return Err(NodeError::InvalidConnection("cannot connect a node to itself"));
        }

        Ok(self
            .connections
            .insert(Connection::new(from_node, from, to_node, to)))
    }

    /// Connect two sockets in whichever direction they allow
    pub fn new_link(&mut self, a: SocketId, b: SocketId) -> NodeResult<bool> {
        let a_is_output = self
            .socket(a)
            .ok_or(NodeError::SocketNotFound(a))?
            .is_output();
        if a_is_output {
            self.create_connection(a, b)
        } else {
            self.create_connection(b, a)
        }
    }

    /// Handle a link dropped by the user between two sockets.
    ///
    /// Drops onto an operator sentinel grow the sentinel's variadic group
    /// instead of creating a data edge.
    pub fn try_link(&mut self, a: SocketId, b: SocketId) -> NodeResult<bool> {
        let (a_node, a_socket) = self.locate(a).ok_or(NodeError::SocketNotFound(a))?;
        let a_is_operator = a_socket.is_operator();
        let (b_node, b_socket) = self.locate(b).ok_or(NodeError::SocketNotFound(b))?;

        if b_socket.is_operator() {
            return Ok(self.handle_sentinel_connection(b_node, b, a)?.is_some());
        }
        if a_is_operator {
            return Ok(self.handle_sentinel_connection(a_node, a, b)?.is_some());
        }
        self.new_link(a, b)
    }

    /// Removes the edge between two sockets, in either order
    pub fn remove_connection(&mut self, a: SocketId, b: SocketId) -> bool {
        let before = self.connections.len();
        self.connections.retain(|conn| {
            !((conn.from_socket == a && conn.to_socket == b)
                || (conn.from_socket == b && conn.to_socket == a))
        });
        before != self.connections.len()
    }

    /// Current peers of a socket
    pub fn list_connections(&self, socket: SocketId) -> BTreeSet<SocketId> {
        self.connections
            .iter()
            .filter_map(|conn| {
                if conn.from_socket == socket {
                    Some(conn.to_socket)
                } else if conn.to_socket == socket {
                    Some(conn.from_socket)
                } else {
                    None
                }
            })
            .collect()
    }

    pub fn is_linked(&self, socket: SocketId) -> bool {
        self.connections.iter().any(|conn| conn.touches(socket))
    }

    /// Edges with at least one end on the given node
    pub fn connections_of(&self, node_id: NodeId) -> impl Iterator<Item = &Connection> {
        self.connections
            .iter()
            .filter(move |conn| conn.from_node == node_id || conn.to_node == node_id)
    }

    /// Set a type property and rebuild the node, keeping connections.
    ///
    /// If the new value does not resolve, the previous value is restored and
    /// the node keeps its current sockets.
    pub fn set_type_property(
        &mut self,
        node_id: NodeId,
        property: &str,
        value: &str,
    ) -> NodeResult<()> {
        let node = self
            .nodes
            .get_mut(&node_id)
            .ok_or(NodeError::NodeNotFound(node_id))?;
        let previous = node.properties.set_type_property(property, value);

        if let Err(e) = self.rebuild_preserving_connections(node_id) {
            warn!("Rejected {} = {} on node {}: {}", property, value, node_id, e);
            if let Some(node) = self.nodes.get_mut(&node_id) {
                match previous {
                    Some(previous) => {
                        node.properties.set_type_property(property, &previous);
                    }
                    None => {
                        node.properties.types.remove(property);
                    }
                }
            }
            return Err(e);
        }
        Ok(())
    }

    /// Serialize the graph to JSON
    pub fn to_json(&self) -> NodeResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a graph from JSON and rebuild every node's socket index
    pub fn from_json(json: &str) -> NodeResult<Self> {
        let mut graph: NodeGraph = serde_json::from_str(json)?;
        for node in graph.nodes.values_mut() {
            node.reindex();
            if let Some(max) = node.iter_sockets().map(|s| s.id).max() {
                reserve_socket_ids(max);
            }
        }
        debug!(
            "Loaded graph with {} nodes and {} connections",
            graph.nodes.len(),
            graph.connections.len()
        );
        Ok(graph)
    }
}

impl Default for NodeGraph {
    fn default() -> Self {
        Self::new()
    }
}
