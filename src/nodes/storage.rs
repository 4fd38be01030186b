//! Per-node index from concrete sockets back to their declarations

use crate::nodes::declaration::SocketDecl;
use crate::nodes::node::NodeProperties;
use crate::nodes::port::{PortType, Socket, SocketId};
use std::collections::HashMap;
use std::ops::Range;

/// Where a concrete socket came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SocketPosition {
    pub port_type: PortType,
    /// Index of the declaration on its side
    pub decl_index: usize,
    /// Offset within the declaration's own sockets
    pub index: usize,
    /// Offset within all sockets of its side
    pub offset: usize,
}

/// Derived index rebuilt together with a node's sockets. Never persisted.
#[derive(Debug, Clone, Default)]
pub struct NodeStorage {
    inputs_per_decl: Vec<Range<usize>>,
    outputs_per_decl: Vec<Range<usize>>,
    position_per_socket: HashMap<SocketId, SocketPosition>,
}

impl NodeStorage {
    /// Index the current sockets of a node against its declarations.
    ///
    /// Sockets are assigned to declarations in order, each declaration taking
    /// as many as its `amount` reports.
    pub fn index(
        inputs_decl: &[SocketDecl],
        outputs_decl: &[SocketDecl],
        properties: &NodeProperties,
        inputs: &[Socket],
        outputs: &[Socket],
    ) -> Self {
        let mut storage = Self::default();
        storage.inputs_per_decl =
            storage.index_side(PortType::Input, inputs_decl, properties, inputs);
        storage.outputs_per_decl =
            storage.index_side(PortType::Output, outputs_decl, properties, outputs);
        storage
    }

    fn index_side(
        &mut self,
        port_type: PortType,
        decls: &[SocketDecl],
        properties: &NodeProperties,
        sockets: &[Socket],
    ) -> Vec<Range<usize>> {
        let mut ranges = Vec::with_capacity(decls.len());
        let mut start = 0;
        for (decl_index, decl) in decls.iter().enumerate() {
            let end = (start + decl.amount(properties)).min(sockets.len());
            for (index, socket) in sockets[start..end].iter().enumerate() {
                self.position_per_socket.insert(
                    socket.id,
                    SocketPosition {
                        port_type,
                        decl_index,
                        index,
                        offset: start + index,
                    },
                );
            }
            ranges.push(start..end);
            start = end;
        }
        ranges
    }

    pub fn position(&self, socket: SocketId) -> Option<SocketPosition> {
        self.position_per_socket.get(&socket).copied()
    }

    /// Socket index range produced by a declaration
    pub fn sockets_for(&self, port_type: PortType, decl_index: usize) -> Option<Range<usize>> {
        let ranges = match port_type {
            PortType::Input => &self.inputs_per_decl,
            PortType::Output => &self.outputs_per_decl,
        };
        ranges.get(decl_index).cloned()
    }

    /// Number of indexed sockets
    pub fn len(&self) -> usize {
        self.position_per_socket.len()
    }

    pub fn is_empty(&self) -> bool {
        self.position_per_socket.is_empty()
    }
}
