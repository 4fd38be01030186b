//! Rebuilding a node while keeping its connections
//!
//! Before the sockets are regenerated, every edge on the node is recorded
//! against the stable identifier of the node's socket. Afterwards each new
//! socket is reconnected to the peers recorded under its identifier. Peers
//! that no longer exist, and identifiers that were dropped, are skipped.

use super::error::{NodeError, NodeResult};
use super::graph::NodeGraph;
use super::node::NodeId;
use super::port::{PortType, SocketId};
use log::{debug, trace};
use std::collections::{BTreeSet, HashMap};

/// Edges of one node keyed by socket identifier, split by direction
#[derive(Debug, Clone, Default)]
pub struct ConnectionSnapshot {
    /// Input identifier to the output sockets feeding it
    links_per_input: HashMap<String, BTreeSet<SocketId>>,
    /// Output identifier to the input sockets it feeds
    links_per_output: HashMap<String, BTreeSet<SocketId>>,
}

impl ConnectionSnapshot {
    /// Record every edge touching the node's current sockets
    pub fn capture(graph: &NodeGraph, node_id: NodeId) -> NodeResult<Self> {
        let node = graph.node(node_id).ok_or(NodeError::NodeNotFound(node_id))?;
        let mut snapshot = Self::default();
        for conn in graph.connections_of(node_id) {
            if conn.to_node == node_id {
                if let Some(socket) = node.socket(conn.to_socket) {
                    snapshot
                        .links_per_input
                        .entry(socket.identifier.clone())
                        .or_default()
                        .insert(conn.from_socket);
                }
            }
            if conn.from_node == node_id {
                if let Some(socket) = node.socket(conn.from_socket) {
                    snapshot
                        .links_per_output
                        .entry(socket.identifier.clone())
                        .or_default()
                        .insert(conn.to_socket);
                }
            }
        }
        Ok(snapshot)
    }

    /// Peers recorded for an identifier on one side
    pub fn peers(&self, port_type: PortType, identifier: &str) -> Option<&BTreeSet<SocketId>> {
        match port_type {
            PortType::Input => self.links_per_input.get(identifier),
            PortType::Output => self.links_per_output.get(identifier),
        }
    }

    /// Total number of recorded edges
    pub fn len(&self) -> usize {
        self.links_per_input
            .values()
            .chain(self.links_per_output.values())
            .map(BTreeSet::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Outcome of a connection-preserving rebuild
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RebuildReport {
    pub restored: usize,
    pub dropped: usize,
}

impl NodeGraph {
    /// Regenerate a node's sockets from its declarations and reconnect
    /// previously connected peers by identifier.
    ///
    /// A type error aborts before anything changes: the node keeps its
    /// sockets and the graph keeps its edges.
    pub fn rebuild_preserving_connections(&mut self, node_id: NodeId) -> NodeResult<RebuildReport> {
        let snapshot = ConnectionSnapshot::capture(self, node_id)?;

        let node = self
            .nodes
            .get_mut(&node_id)
            .ok_or(NodeError::NodeNotFound(node_id))?;
        let old_sockets: BTreeSet<SocketId> = node.iter_sockets().map(|s| s.id).collect();
        node.rebuild_all()?;

        self.connections.retain(|conn| {
            !old_sockets.contains(&conn.from_socket) && !old_sockets.contains(&conn.to_socket)
        });

        let mut pending = Vec::new();
        if let Some(node) = self.nodes.get(&node_id) {
            for socket in node.iter_sockets() {
                if let Some(peers) = snapshot.peers(socket.port_type, &socket.identifier) {
                    for &peer in peers {
                        pending.push((socket.port_type, socket.id, peer));
                    }
                }
            }
        }

        let mut restored = 0;
        for (port_type, socket, peer) in pending {
            let result = match port_type {
                PortType::Input => self.create_connection(peer, socket),
                PortType::Output => self.create_connection(socket, peer),
            };
            match result {
                Ok(_) => restored += 1,
                Err(e) => trace!("Skipped reconnecting socket {} to {}: {}", socket, peer, e),
            }
        }

        let report = RebuildReport {
            restored,
            dropped: snapshot.len().saturating_sub(restored),
        };
        debug!(
            "Rebuilt node {} keeping connections: {} restored, {} dropped",
            node_id, report.restored, report.dropped
        );
        Ok(report)
    }

    /// Host entry point for configuration changes that may reshape a node
    pub fn rebuild(&mut self, node_id: NodeId) -> NodeResult<RebuildReport> {
        self.rebuild_preserving_connections(node_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::declaration::SocketDecl;
    use crate::nodes::Node;
    use egui::Pos2;

    fn generic_node() -> Node {
        let mut node = Node::new(0, "Generic", Pos2::ZERO)
            .with_type_property("active_type", "Float")
            .with_declarations(
                vec![
                    SocketDecl::base("value", "Value", "active_type"),
                    SocketDecl::fixed("factor", "Factor", "Float"),
                ],
                vec![SocketDecl::base("result", "Result", "active_type")],
            );
        node.initialize_sockets().unwrap();
        node
    }

    fn float_source() -> Node {
        let mut node = Node::new(0, "Source", Pos2::ZERO).with_declarations(
            vec![SocketDecl::fixed("in", "In", "Float")],
            vec![SocketDecl::fixed("out", "Out", "Float")],
        );
        node.initialize_sockets().unwrap();
        node
    }

    #[test]
    fn test_snapshot_records_both_directions() {
        let mut graph = NodeGraph::new();
        let src = graph.add_node(float_source());
        let node = graph.add_node(generic_node());
        let out = graph.find_socket(src, "out", true).unwrap();
        let src_in = graph.find_socket(src, "in", false).unwrap();
        let value = graph.find_socket(node, "value", false).unwrap();
        let result = graph.find_socket(node, "result", true).unwrap();
        graph.create_connection(out, value).unwrap();
        graph.create_connection(result, src_in).unwrap();

        let snapshot = ConnectionSnapshot::capture(&graph, node).unwrap();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(
            snapshot.peers(PortType::Input, "value"),
            Some(&BTreeSet::from([out]))
        );
        assert_eq!(
            snapshot.peers(PortType::Output, "result"),
            Some(&BTreeSet::from([src_in]))
        );
        assert!(snapshot.peers(PortType::Input, "factor").is_none());
    }

    #[test]
    fn test_rebuild_restores_edges() {
        let mut graph = NodeGraph::new();
        let src = graph.add_node(float_source());
        let node = graph.add_node(generic_node());
        let out = graph.find_socket(src, "out", true).unwrap();
        let src_in = graph.find_socket(src, "in", false).unwrap();
        let old_value = graph.find_socket(node, "value", false).unwrap();
        let old_result = graph.find_socket(node, "result", true).unwrap();
        graph.create_connection(out, old_value).unwrap();
        graph.create_connection(old_result, src_in).unwrap();

        let report = graph.rebuild_preserving_connections(node).unwrap();
        assert_eq!(report, RebuildReport { restored: 2, dropped: 0 });

        let value = graph.find_socket(node, "value", false).unwrap();
        let result = graph.find_socket(node, "result", true).unwrap();
        assert_ne!(value, old_value);
        assert_eq!(graph.list_connections(value), BTreeSet::from([out]));
        assert_eq!(graph.list_connections(result), BTreeSet::from([src_in]));
        assert!(graph.list_connections(old_value).is_empty());
        assert_eq!(graph.connections.len(), 2);
    }

    #[test]
    fn test_type_error_leaves_graph_untouched() {
        let mut graph = NodeGraph::new();
        let src = graph.add_node(float_source());
        let node = graph.add_node(generic_node());
        let out = graph.find_socket(src, "out", true).unwrap();
        let value = graph.find_socket(node, "value", false).unwrap();
        graph.create_connection(out, value).unwrap();

        let err = graph
            .set_type_property(node, "active_type", "Quaternion")
            .unwrap_err();
        assert!(matches!(err, NodeError::UnresolvedType { .. }));
        assert_eq!(
            graph.node(node).unwrap().properties.read_type_property("active_type").unwrap(),
            "Float"
        );
        assert_eq!(graph.find_socket(node, "value", false), Some(value));
        assert_eq!(graph.list_connections(value), BTreeSet::from([out]));
    }

    #[test]
    fn test_type_change_keeps_identifiers() {
        let mut graph = NodeGraph::new();
        let src = graph.add_node(float_source());
        let node = graph.add_node(generic_node());
        let out = graph.find_socket(src, "out", true).unwrap();
        let value = graph.find_socket(node, "value", false).unwrap();
        graph.create_connection(out, value).unwrap();

        graph.set_type_property(node, "active_type", "Int").unwrap();
        let value = graph.find_socket(node, "value", false).unwrap();
        assert_eq!(graph.socket(value).unwrap().data_type(), Some("Int"));
        // The host does not type-check edges; identifier match is enough
        assert_eq!(graph.list_connections(value), BTreeSet::from([out]));
    }

    #[test]
    fn test_rebuild_missing_node() {
        let mut graph = NodeGraph::new();
        assert!(matches!(
            graph.rebuild(42),
            Err(NodeError::NodeNotFound(42))
        ));
    }
}
