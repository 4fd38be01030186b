//! Variadic socket groups
//!
//! A variadic declaration produces one socket per [`GroupEntry`] plus a
//! trailing operator sentinel. Dropping a link from a data socket onto the
//! sentinel appends an entry typed after the dropped socket, rebuilds the
//! node and completes the link to the new socket.

use super::declaration::SocketDecl;
use super::error::{NodeError, NodeResult};
use super::graph::NodeGraph;
use super::node::NodeId;
use super::port::SocketId;
use log::debug;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Backing record of one non-sentinel socket in a variadic group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupEntry {
    pub data_type: String,
    pub display_name: String,
    /// Unique prefix; the socket identifier is prefix + declaration suffix
    pub identifier_prefix: String,
}

impl GroupEntry {
    /// Create an entry with a freshly generated identifier prefix
    pub fn new(data_type: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            data_type: data_type.into(),
            display_name: display_name.into(),
            identifier_prefix: new_identifier_prefix(),
        }
    }

    pub fn identifier(&self, identifier_suffix: &str) -> String {
        format!("{}{}", self.identifier_prefix, identifier_suffix)
    }
}

/// Random 128-bit prefix, never reused
pub fn new_identifier_prefix() -> String {
    Uuid::new_v4().to_string()
}

impl NodeGraph {
    /// React to a link dropped onto an operator sentinel.
    ///
    /// Returns the socket the link was completed to, or `None` when the drop
    /// is ignored: `own_socket` is not a variadic sentinel, `other_socket` is
    /// not a data socket, sits on the same side, or belongs to the same node.
    pub fn handle_sentinel_connection(
        &mut self,
        node_id: NodeId,
        own_socket: SocketId,
        other_socket: SocketId,
    ) -> NodeResult<Option<SocketId>> {
        let node = self.node(node_id).ok_or(NodeError::NodeNotFound(node_id))?;
        let (position, decl) = node
            .declaration_for(own_socket)
            .ok_or(NodeError::SocketNotFound(own_socket))?;
        let SocketDecl::Variadic {
            identifier_suffix,
            group,
            ..
        } = decl
        else {
            return Ok(None);
        };
        let own_is_operator = node
            .socket(own_socket)
            .map(|s| s.is_operator())
            .unwrap_or(false);
        if !own_is_operator {
            return Ok(None);
        }
        let identifier_suffix = identifier_suffix.clone();
        let group = group.clone();

        let (other_node, other) = self
            .locate(other_socket)
            .ok_or(NodeError::SocketNotFound(other_socket))?;
        let Some(data_type) = other.data_type() else {
            debug!("Ignoring drop of non-data socket {} on node {}", other_socket, node_id);
            return Ok(None);
        };
        if other_node == node_id || other.port_type == position.port_type {
            debug!("Ignoring drop of socket {} on node {}", other_socket, node_id);
            return Ok(None);
        }
        let entry = GroupEntry::new(data_type, other.name.clone());
        let identifier = entry.identifier(&identifier_suffix);
        let prefix = entry.identifier_prefix.clone();
        let is_output = position.port_type.is_output();

        if let Some(node) = self.nodes.get_mut(&node_id) {
            node.properties.push_group_entry(&group, entry);
        }
        if let Err(e) = self.rebuild_preserving_connections(node_id) {
            if let Some(entries) = self
                .nodes
                .get_mut(&node_id)
                .and_then(|node| node.properties.group_mut(&group))
            {
                entries.retain(|entry| entry.identifier_prefix != prefix);
            }
            return Err(e);
        }

        let new_socket = self.require_socket(node_id, &identifier, is_output)?;
        self.new_link(other_socket, new_socket)?;
        debug!(
            "Grew group '{}' on node {} with socket {}",
            group, node_id, identifier
        );
        Ok(Some(new_socket))
    }

    /// Remove a variadic group entry and rebuild the node.
    ///
    /// Edges on the removed socket are lost; all others are kept.
    pub fn remove_group_entry(
        &mut self,
        node_id: NodeId,
        group: &str,
        identifier_prefix: &str,
    ) -> NodeResult<GroupEntry> {
        let node = self
            .nodes
            .get_mut(&node_id)
            .ok_or(NodeError::NodeNotFound(node_id))?;
        let entries = node
            .properties
            .group_mut(group)
            .ok_or_else(|| NodeError::UnknownGroupEntry(identifier_prefix.to_string()))?;
        let index = entries
            .iter()
            .position(|entry| entry.identifier_prefix == identifier_prefix)
            .ok_or_else(|| NodeError::UnknownGroupEntry(identifier_prefix.to_string()))?;
        let removed = entries.remove(index);

        if let Err(e) = self.rebuild_preserving_connections(node_id) {
            if let Some(entries) = self
                .nodes
                .get_mut(&node_id)
                .and_then(|node| node.properties.group_mut(group))
            {
                entries.insert(index, removed);
            }
            return Err(e);
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::port::PortType;
    use crate::nodes::Node;
    use egui::Pos2;
    use std::collections::{BTreeSet, HashSet};

    fn variadic_node() -> Node {
        let mut node = Node::new(0, "Pack", Pos2::ZERO).with_declarations(
            vec![
                SocketDecl::fixed("a", "A", "Float"),
                SocketDecl::variadic("v", "group", "New Input"),
            ],
            vec![SocketDecl::fixed("out", "Out", "Float")],
        );
        node.initialize_sockets().unwrap();
        node
    }

    fn int_source() -> Node {
        let mut node = Node::new(0, "Source", Pos2::ZERO)
            .with_declarations(vec![], vec![SocketDecl::fixed("count", "Count", "Int")]);
        node.initialize_sockets().unwrap();
        node
    }

    fn sentinel(graph: &NodeGraph, node: NodeId) -> SocketId {
        graph
            .find_socket(node, &SocketDecl::operator_identifier("v"), false)
            .unwrap()
    }

    #[test]
    fn test_prefixes_do_not_collide() {
        let prefixes: HashSet<String> = (0..10_000).map(|_| new_identifier_prefix()).collect();
        assert_eq!(prefixes.len(), 10_000);
    }

    #[test]
    fn test_growth_adds_typed_socket_and_link() {
        let mut graph = NodeGraph::new();
        let src = graph.add_node(int_source());
        let node = graph.add_node(variadic_node());
        let count = graph.find_socket(src, "count", true).unwrap();

        let new_socket = graph
            .handle_sentinel_connection(node, sentinel(&graph, node), count)
            .unwrap()
            .unwrap();

        let n = graph.node(node).unwrap();
        let entries = n.properties.group("group");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].data_type, "Int");
        assert_eq!(entries[0].display_name, "Count");
        assert_eq!(
            n.identifiers(PortType::Input),
            vec![
                "a".to_string(),
                format!("{}v", entries[0].identifier_prefix),
                "operator:v".to_string()
            ]
        );
        assert_eq!(n.inputs[1].id, new_socket);
        assert_eq!(n.inputs[1].data_type(), Some("Int"));
        assert!(n.inputs[2].is_operator());
        assert_eq!(graph.list_connections(new_socket), BTreeSet::from([count]));
    }

    #[test]
    fn test_growth_ignores_non_data_socket() {
        let mut graph = NodeGraph::new();
        let other = graph.add_node(variadic_node());
        let node = graph.add_node(variadic_node());
        let other_sentinel = sentinel(&graph, other);
        let before = graph.node(node).unwrap().identifiers(PortType::Input).join(",");

        let result = graph
            .handle_sentinel_connection(node, sentinel(&graph, node), other_sentinel)
            .unwrap();
        assert!(result.is_none());
        assert!(graph.node(node).unwrap().properties.group("group").is_empty());
        assert_eq!(
            graph.node(node).unwrap().identifiers(PortType::Input).join(","),
            before
        );
        assert!(graph.connections.is_empty());
    }

    #[test]
    fn test_growth_ignores_same_side_drop() {
        let mut graph = NodeGraph::new();
        let other = graph.add_node(variadic_node());
        let node = graph.add_node(variadic_node());
        let other_input = graph.find_socket(other, "a", false).unwrap();

        let result = graph
            .handle_sentinel_connection(node, sentinel(&graph, node), other_input)
            .unwrap();
        assert!(result.is_none());
        assert!(graph.node(node).unwrap().properties.group("group").is_empty());
    }

    #[test]
    fn test_non_sentinel_socket_is_not_a_trigger() {
        let mut graph = NodeGraph::new();
        let src = graph.add_node(int_source());
        let node = graph.add_node(variadic_node());
        let count = graph.find_socket(src, "count", true).unwrap();
        let a = graph.find_socket(node, "a", false).unwrap();

        assert_eq!(graph.handle_sentinel_connection(node, a, count).unwrap(), None);
    }

    #[test]
    fn test_try_link_routes_to_growth() {
        let mut graph = NodeGraph::new();
        let src = graph.add_node(int_source());
        let node = graph.add_node(variadic_node());
        let count = graph.find_socket(src, "count", true).unwrap();

        assert!(graph.try_link(sentinel(&graph, node), count).unwrap());
        assert!(graph.try_link(count, sentinel(&graph, node)).unwrap());
        assert_eq!(graph.node(node).unwrap().properties.group("group").len(), 2);
        assert_eq!(graph.list_connections(count).len(), 2);
    }

    #[test]
    fn test_draw_entry_and_sentinel() {
        let mut graph = NodeGraph::new();
        let src = graph.add_node(int_source());
        let node = graph.add_node(variadic_node());
        let count = graph.find_socket(src, "count", true).unwrap();
        let entry = graph
            .handle_sentinel_connection(node, sentinel(&graph, node), count)
            .unwrap()
            .unwrap();
        let sentinel = sentinel(&graph, node);

        let node = graph.node_mut(node).unwrap();
        let ctx = egui::Context::default();
        let mut drawn = Vec::new();
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                drawn.push(node.draw_socket(ui, entry).is_some());
                drawn.push(node.draw_socket(ui, sentinel).is_some());
            });
        });
        assert!(drawn.iter().all(|d| *d));
        assert!(!drawn.is_empty());
        // Drawing alone never renames anything
        assert_eq!(node.socket(entry).unwrap().name, "Count");
    }

    #[test]
    fn test_remove_group_entry() {
        let mut graph = NodeGraph::new();
        let src = graph.add_node(int_source());
        let node = graph.add_node(variadic_node());
        let count = graph.find_socket(src, "count", true).unwrap();

        let first = graph
            .handle_sentinel_connection(node, sentinel(&graph, node), count)
            .unwrap()
            .unwrap();
        let first_identifier = graph.socket(first).unwrap().identifier.clone();
        graph
            .handle_sentinel_connection(node, sentinel(&graph, node), count)
            .unwrap()
            .unwrap();
        let prefix = graph.node(node).unwrap().properties.group("group")[1]
            .identifier_prefix
            .clone();

        let removed = graph.remove_group_entry(node, "group", &prefix).unwrap();
        assert_eq!(removed.identifier_prefix, prefix);

        let n = graph.node(node).unwrap();
        assert_eq!(n.inputs.len(), 3);
        let first = graph.find_socket(node, &first_identifier, false).unwrap();
        assert_eq!(graph.list_connections(first), BTreeSet::from([count]));
        assert_eq!(graph.list_connections(count).len(), 1);

        assert!(matches!(
            graph.remove_group_entry(node, "group", "missing"),
            Err(NodeError::UnknownGroupEntry(_))
        ));
    }
}
