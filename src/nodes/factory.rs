//! Socket type registry and node factory system
//!
//! The [`TypeRegistry`] maps data type names to socket construction metadata
//! and derives the "list of T" variant of a base type. A single registry is
//! installed process-wide before first use and is read-only afterwards.
//!
//! Node kinds describe themselves through [`NodeFactory::metadata`]; the
//! [`NodeRegistry`] creates nodes by type name.

use crate::constants;
use crate::nodes::declaration::SocketDecl;
use crate::nodes::error::{NodeError, NodeResult};
use crate::nodes::port::{PortType, Socket, SocketId};
use crate::nodes::Node;
use egui::{Color32, Pos2};
use log::{debug, info, warn};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Construction metadata for one registered socket type
#[derive(Debug, Clone, PartialEq)]
pub struct TypeInfo {
    pub name: String,
    pub color: Color32,
    /// Base type when this is a list variant
    pub base: Option<String>,
}

impl TypeInfo {
    pub fn is_list(&self) -> bool {
        self.base.is_some()
    }
}

/// Lookup table from type name to socket construction metadata
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    types: BTreeMap<String, TypeInfo>,
    list_of: HashMap<String, String>,
}

impl TypeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the standard data kinds and their list variants
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry
            .register_with_list("Float", Color32::from_rgb(100, 150, 255))
            .register_with_list("Int", Color32::from_rgb(90, 200, 220))
            .register_with_list("Boolean", Color32::from_rgb(255, 100, 255))
            .register_with_list("Vector", Color32::from_rgb(255, 100, 100))
            .register_with_list("Color", Color32::from_rgb(255, 200, 100))
            .register_with_list("Text", Color32::from_rgb(100, 255, 100));
        registry
    }

    /// Build a registry from a deployment configuration
    pub fn from_config(config: &RegistryConfig) -> Self {
        let mut registry = Self::new();
        for spec in &config.types {
            let [r, g, b] = spec.color;
            let color = Color32::from_rgb(r, g, b);
            if spec.list {
                registry.register_with_list(&spec.name, color);
            } else {
                registry.register(&spec.name, color);
            }
        }
        registry
    }

    /// Parse a JSON configuration and build a registry from it
    pub fn from_json(json: &str) -> NodeResult<Self> {
        let config: RegistryConfig = serde_json::from_str(json)?;
        Ok(Self::from_config(&config))
    }

    /// Register a single scalar type
    pub fn register(&mut self, name: &str, color: Color32) -> &mut Self {
        self.types.insert(
            name.to_string(),
            TypeInfo {
                name: name.to_string(),
                color,
                base: None,
            },
        );
        self
    }

    /// Register a base type together with its list variant
    pub fn register_with_list(&mut self, name: &str, color: Color32) -> &mut Self {
        self.register(name, color);
        let list_name = format!("{}{}", name, constants::socket::LIST_SUFFIX);
        self.types.insert(
            list_name.clone(),
            TypeInfo {
                name: list_name.clone(),
                color: color.gamma_multiply(0.7),
                base: Some(name.to_string()),
            },
        );
        self.list_of.insert(name.to_string(), list_name);
        self
    }

    pub fn get(&self, type_name: &str) -> Option<&TypeInfo> {
        self.types.get(type_name)
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.types.contains_key(type_name)
    }

    /// All registered type names in sorted order
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    /// Canonical "list of" variant of a base type
    pub fn to_list(&self, type_name: &str) -> NodeResult<&str> {
        self.list_of
            .get(type_name)
            .map(String::as_str)
            .ok_or_else(|| NodeError::UnknownType(type_name.to_string()))
    }

    /// Create a socket of the named type and append it to `sockets`
    pub fn build(
        &self,
        type_name: &str,
        port_type: PortType,
        sockets: &mut Vec<Socket>,
        display_name: &str,
        identifier: &str,
    ) -> NodeResult<SocketId> {
        let info = self
            .get(type_name)
            .ok_or_else(|| NodeError::UnknownType(type_name.to_string()))?;
        let socket = Socket::data(port_type, &info.name, display_name, identifier, info.color);
        let id = socket.id;
        sockets.push(socket);
        Ok(id)
    }
}

/// Deployment-specific set of socket types
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryConfig {
    pub types: Vec<TypeSpec>,
}

/// One entry of a [`RegistryConfig`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeSpec {
    pub name: String,
    #[serde(default = "default_type_color")]
    pub color: [u8; 3],
    /// Also register the list variant
    #[serde(default)]
    pub list: bool,
}

fn default_type_color() -> [u8; 3] {
    constants::socket::OPERATOR_COLOR
}

static TYPE_INFOS: OnceCell<TypeRegistry> = OnceCell::new();

/// Install the process-wide type registry.
///
/// Must happen before the first socket is built; returns the registry back
/// if one is already installed.
pub fn install_type_registry(registry: TypeRegistry) -> Result<(), TypeRegistry> {
    let count = registry.types.len();
    TYPE_INFOS.set(registry)?;
    info!("Installed socket type registry with {} types", count);
    Ok(())
}

/// The process-wide type registry, installing the defaults on first use
pub fn type_infos() -> &'static TypeRegistry {
    TYPE_INFOS.get_or_init(|| {
        debug!("Installing default socket type registry");
        TypeRegistry::with_defaults()
    })
}

/// Hierarchical category system for organizing nodes
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeCategory {
    path: Vec<String>,
}

impl NodeCategory {
    /// Create a new category from path components
    pub fn new(path: &[&str]) -> Self {
        Self {
            path: path.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// Get the category name (last component)
    pub fn name(&self) -> &str {
        self.path.last().map(|s| s.as_str()).unwrap_or("")
    }

    /// Get display string for UI
    pub fn display_string(&self) -> String {
        self.path.join(" > ")
    }

    pub fn math() -> Self {
        Self::new(&["Math"])
    }

    pub fn lists() -> Self {
        Self::new(&["Lists"])
    }
}

/// Everything needed to instantiate a node kind
#[derive(Debug, Clone)]
pub struct NodeMetadata {
    pub node_type: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,
    pub category: NodeCategory,
    pub color: Color32,
    pub inputs: Vec<SocketDecl>,
    pub outputs: Vec<SocketDecl>,
    /// Type properties and their initial values
    pub type_properties: Vec<(&'static str, &'static str)>,
}

impl NodeMetadata {
    /// Create node metadata with sensible defaults
    pub fn new(
        node_type: &'static str,
        display_name: &'static str,
        category: NodeCategory,
        description: &'static str,
    ) -> Self {
        let [r, g, b] = constants::node::DEFAULT_COLOR;
        Self {
            node_type,
            display_name,
            description,
            category,
            color: Color32::from_rgb(r, g, b),
            inputs: vec![],
            outputs: vec![],
            type_properties: vec![],
        }
    }

    pub fn with_color(mut self, color: Color32) -> Self {
        self.color = color;
        self
    }

    pub fn with_inputs(mut self, inputs: Vec<SocketDecl>) -> Self {
        self.inputs = inputs;
        self
    }

    pub fn with_outputs(mut self, outputs: Vec<SocketDecl>) -> Self {
        self.outputs = outputs;
        self
    }

    /// Declare a type property initialized to the default type
    pub fn with_type_property(self, name: &'static str) -> Self {
        self.with_type_property_default(name, constants::socket::DEFAULT_TYPE)
    }

    pub fn with_type_property_default(mut self, name: &'static str, default: &'static str) -> Self {
        self.type_properties.push((name, default));
        self
    }
}

/// Node kinds describe their sockets declaratively
pub trait NodeFactory {
    fn metadata() -> NodeMetadata
    where
        Self: Sized;

    /// Create a node instance with its sockets initialized
    fn create(position: Pos2) -> NodeResult<Node>
    where
        Self: Sized,
    {
        let meta = Self::metadata();
        let mut node = Node::new(0, meta.display_name, position)
            .with_node_type(meta.node_type)
            .with_color(meta.color)
            .with_declarations(meta.inputs, meta.outputs);
        for (name, default) in meta.type_properties {
            node.properties.set_type_property(name, default);
        }
        node.initialize_sockets()?;
        Ok(node)
    }
}

type NodeCreator = fn(Pos2) -> NodeResult<Node>;
type MetadataProvider = fn() -> NodeMetadata;

/// Registry for managing node factories
#[derive(Default)]
pub struct NodeRegistry {
    creators: BTreeMap<String, NodeCreator>,
    metadata_providers: BTreeMap<String, MetadataProvider>,
    categories: BTreeMap<NodeCategory, Vec<String>>,
}

impl NodeRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in node kind
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register::<crate::nodes::math::FloatMathNode>();
        registry.register::<crate::nodes::lists::PackListNode>();
        registry.register::<crate::nodes::lists::AppendToListNode>();
        registry.register::<crate::nodes::lists::GetListElementNode>();
        registry.register::<crate::nodes::lists::CombineListsNode>();
        registry
    }

    /// Register a node factory
    pub fn register<T: NodeFactory + 'static>(&mut self) {
        let metadata = T::metadata();
        let node_type = metadata.node_type.to_string();

        self.creators.insert(node_type.clone(), T::create);
        self.metadata_providers.insert(node_type.clone(), T::metadata);
        self.categories
            .entry(metadata.category)
            .or_default()
            .push(node_type);
    }

    /// Create a node by type name
    pub fn create_node(&self, node_type: &str, position: Pos2) -> Option<Node> {
        let Some(creator) = self.creators.get(node_type) else {
            warn!("No node factory found for node type: {}", node_type);
            return None;
        };
        match creator(position) {
            Ok(node) => {
                debug!(
                    "Created {} node with {} inputs and {} outputs",
                    node_type,
                    node.inputs.len(),
                    node.outputs.len()
                );
                Some(node)
            }
            Err(e) => {
                warn!("Failed to create {} node: {}", node_type, e);
                None
            }
        }
    }

    /// Get metadata for a node type without creating the node
    pub fn get_node_metadata(&self, node_type: &str) -> Option<NodeMetadata> {
        self.metadata_providers.get(node_type).map(|provider| provider())
    }

    pub fn node_types(&self) -> impl Iterator<Item = &str> {
        self.creators.keys().map(String::as_str)
    }

    pub fn nodes_in_category(&self, category: &NodeCategory) -> &[String] {
        self.categories
            .get(category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
