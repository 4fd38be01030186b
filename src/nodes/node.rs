//! Node types and socket materialization

use super::declaration::SocketDecl;
use super::error::{NodeError, NodeResult};
use super::factory::{type_infos, TypeRegistry};
use super::port::{PortType, Socket, SocketId};
use super::storage::{NodeStorage, SocketPosition};
use super::variadic::GroupEntry;
use crate::constants;
use egui::{Color32, Pos2};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Unique identifier for a node
pub type NodeId = usize;

/// Typed configuration consulted by declarations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeProperties {
    /// Type properties read by parameterized declarations
    pub types: BTreeMap<String, String>,
    /// Backing lists of variadic groups
    pub groups: BTreeMap<String, Vec<GroupEntry>>,
}

impl NodeProperties {
    pub fn read_type_property(&self, name: &str) -> NodeResult<&str> {
        self.types
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| NodeError::MissingProperty(name.to_string()))
    }

    /// Set a type property, returning the previous value
    pub fn set_type_property(&mut self, name: &str, value: &str) -> Option<String> {
        self.types.insert(name.to_string(), value.to_string())
    }

    /// Entries of a variadic group; a missing group is empty
    pub fn group(&self, name: &str) -> &[GroupEntry] {
        self.groups.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn group_mut(&mut self, name: &str) -> Option<&mut Vec<GroupEntry>> {
        self.groups.get_mut(name)
    }

    pub fn push_group_entry(&mut self, group: &str, entry: GroupEntry) {
        self.groups.entry(group.to_string()).or_default().push(entry);
    }
}

/// A node owning its declarations and the concrete sockets built from them
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub title: String,
    /// Kind name the node was created from
    pub node_type: String,
    #[serde(with = "pos2_serde")]
    pub position: Pos2,
    #[serde(with = "super::port::color32_serde")]
    pub color: Color32,
    pub inputs_decl: Vec<SocketDecl>,
    pub outputs_decl: Vec<SocketDecl>,
    pub inputs: Vec<Socket>,
    pub outputs: Vec<Socket>,
    pub properties: NodeProperties,
    #[serde(skip)]
    storage: NodeStorage,
}

impl Node {
    /// Creates a new node without declarations
    pub fn new(id: NodeId, title: impl Into<String>, position: Pos2) -> Self {
        let title = title.into();
        let [r, g, b] = constants::node::DEFAULT_COLOR;
        Self {
            id,
            node_type: title.clone(),
            title,
            position,
            color: Color32::from_rgb(r, g, b),
            inputs_decl: vec![],
            outputs_decl: vec![],
            inputs: vec![],
            outputs: vec![],
            properties: NodeProperties::default(),
            storage: NodeStorage::default(),
        }
    }

    pub fn with_node_type(mut self, node_type: impl Into<String>) -> Self {
        self.node_type = node_type.into();
        self
    }

    pub fn with_color(mut self, color: Color32) -> Self {
        self.color = color;
        self
    }

    /// Sets the declarations; sockets appear on the next rebuild
    pub fn with_declarations(mut self, inputs: Vec<SocketDecl>, outputs: Vec<SocketDecl>) -> Self {
        self.inputs_decl = inputs;
        self.outputs_decl = outputs;
        self
    }

    pub fn with_type_property(mut self, name: &str, value: &str) -> Self {
        self.properties.set_type_property(name, value);
        self
    }

    /// Build the first socket set of a freshly instantiated node
    pub fn initialize_sockets(&mut self) -> NodeResult<()> {
        self.rebuild_all()
    }

    /// Discard every socket and regenerate from the declarations.
    ///
    /// Connections are not touched here; the graph's connection-preserving
    /// rebuild wraps this.
    pub fn rebuild_all(&mut self) -> NodeResult<()> {
        self.rebuild_with(type_infos())
    }

    /// Like [`Node::rebuild_all`] against an explicit registry.
    ///
    /// On a type error the node keeps its previous sockets and index.
    pub fn rebuild_with(&mut self, registry: &TypeRegistry) -> NodeResult<()> {
        let mut inputs = Vec::new();
        for decl in &self.inputs_decl {
            decl.build(&self.properties, PortType::Input, registry, &mut inputs)?;
        }
        let mut outputs = Vec::new();
        for decl in &self.outputs_decl {
            decl.build(&self.properties, PortType::Output, registry, &mut outputs)?;
        }

        self.inputs = inputs;
        self.outputs = outputs;
        self.reindex();
        debug!(
            "Rebuilt node {} ({}): {} inputs, {} outputs",
            self.id,
            self.node_type,
            self.inputs.len(),
            self.outputs.len()
        );
        Ok(())
    }

    /// Recompute the socket index from the current sockets
    pub fn reindex(&mut self) {
        self.storage = NodeStorage::index(
            &self.inputs_decl,
            &self.outputs_decl,
            &self.properties,
            &self.inputs,
            &self.outputs,
        );
    }

    pub fn storage(&self) -> &NodeStorage {
        &self.storage
    }

    pub fn find_input(&self, identifier: &str) -> Option<&Socket> {
        self.inputs.iter().find(|s| s.identifier == identifier)
    }

    pub fn find_output(&self, identifier: &str) -> Option<&Socket> {
        self.outputs.iter().find(|s| s.identifier == identifier)
    }

    pub fn find_socket(&self, identifier: &str, is_output: bool) -> Option<&Socket> {
        if is_output {
            self.find_output(identifier)
        } else {
            self.find_input(identifier)
        }
    }

    /// Inputs followed by outputs
    pub fn iter_sockets(&self) -> impl Iterator<Item = &Socket> {
        self.inputs.iter().chain(self.outputs.iter())
    }

    pub fn socket(&self, id: SocketId) -> Option<&Socket> {
        let position = self.storage.position(id)?;
        self.sockets(position.port_type)
            .get(position.offset)
            .filter(|s| s.id == id)
    }

    /// Position of a socket among all sockets on its side
    pub fn socket_index(&self, id: SocketId) -> Option<usize> {
        self.socket(id)?;
        self.storage.position(id).map(|position| position.offset)
    }

    pub fn sockets(&self, port_type: PortType) -> &[Socket] {
        match port_type {
            PortType::Input => &self.inputs,
            PortType::Output => &self.outputs,
        }
    }

    pub fn declarations(&self, port_type: PortType) -> &[SocketDecl] {
        match port_type {
            PortType::Input => &self.inputs_decl,
            PortType::Output => &self.outputs_decl,
        }
    }

    /// The declaration that produced a socket and the socket's offset in it
    pub fn declaration_for(&self, id: SocketId) -> Option<(SocketPosition, &SocketDecl)> {
        let position = self.storage.position(id)?;
        let decl = self.declarations(position.port_type).get(position.decl_index)?;
        Some((position, decl))
    }

    /// Identifiers of one side, in socket order
    pub fn identifiers(&self, port_type: PortType) -> Vec<&str> {
        self.sockets(port_type)
            .iter()
            .map(|s| s.identifier.as_str())
            .collect()
    }

    /// Draw one socket through its owning declaration
    pub fn draw_socket(&mut self, ui: &mut egui::Ui, id: SocketId) -> Option<egui::Response> {
        let position = self.storage.position(id)?;
        let (decls, sockets) = match position.port_type {
            PortType::Input => (&self.inputs_decl, &mut self.inputs),
            PortType::Output => (&self.outputs_decl, &mut self.outputs),
        };
        let decl = decls.get(position.decl_index)?;
        let socket = sockets.get_mut(position.offset).filter(|s| s.id == id)?;
        Some(decl.draw_socket(ui, &mut self.properties, socket, position.index))
    }
}

// Serde helper module for Pos2
mod pos2_serde {
    use super::*;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(pos: &Pos2, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        [pos.x, pos.y].serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Pos2, D::Error>
    where
        D: Deserializer<'de>,
    {
        let [x, y] = <[f32; 2]>::deserialize(deserializer)?;
        Ok(Pos2::new(x, y))
    }
}
