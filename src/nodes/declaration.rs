//! Socket declarations
//!
//! A declaration describes how many sockets of which kind a node side should
//! have, given the node's current properties. Concrete sockets are always
//! regenerated from declarations; the declaration's identifier (or identifier
//! suffix, for variadic groups) is what stays stable across rebuilds.

use crate::constants;
use crate::nodes::error::{NodeError, NodeResult};
use crate::nodes::factory::TypeRegistry;
use crate::nodes::node::NodeProperties;
use crate::nodes::port::{PortType, Socket};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SocketDecl {
    /// Exactly one socket of a statically known type
    Fixed {
        identifier: String,
        display_name: String,
        data_type: String,
    },
    /// Exactly one socket whose type is read from a type property
    Base {
        identifier: String,
        display_name: String,
        type_property: String,
    },
    /// Exactly one socket of the list variant of a type property
    List {
        identifier: String,
        display_name: String,
        type_property: String,
    },
    /// One socket per group entry followed by an operator sentinel
    Variadic {
        identifier_suffix: String,
        group: String,
        /// Prompt drawn next to the sentinel
        message: String,
    },
}

impl SocketDecl {
    pub fn fixed(identifier: &str, display_name: &str, data_type: &str) -> Self {
        SocketDecl::Fixed {
            identifier: identifier.to_string(),
            display_name: display_name.to_string(),
            data_type: data_type.to_string(),
        }
    }

    pub fn base(identifier: &str, display_name: &str, type_property: &str) -> Self {
        SocketDecl::Base {
            identifier: identifier.to_string(),
            display_name: display_name.to_string(),
            type_property: type_property.to_string(),
        }
    }

    pub fn list(identifier: &str, display_name: &str, type_property: &str) -> Self {
        SocketDecl::List {
            identifier: identifier.to_string(),
            display_name: display_name.to_string(),
            type_property: type_property.to_string(),
        }
    }

    pub fn variadic(identifier_suffix: &str, group: &str, message: &str) -> Self {
        SocketDecl::Variadic {
            identifier_suffix: identifier_suffix.to_string(),
            group: group.to_string(),
            message: message.to_string(),
        }
    }

    /// Number of sockets this declaration produces for the given properties
    pub fn amount(&self, properties: &NodeProperties) -> usize {
        match self {
            SocketDecl::Fixed { .. } | SocketDecl::Base { .. } | SocketDecl::List { .. } => 1,
            SocketDecl::Variadic { group, .. } => properties.group(group).len() + 1,
        }
    }

    /// Identifier of the sentinel ending a variadic group
    pub fn operator_identifier(identifier_suffix: &str) -> String {
        format!(
            "{}{}",
            constants::socket::OPERATOR_IDENTIFIER_PREFIX,
            identifier_suffix
        )
    }

    /// Materialize this declaration's sockets and append them to `sockets`.
    ///
    /// On error nothing is appended.
    pub fn build(
        &self,
        properties: &NodeProperties,
        port_type: PortType,
        registry: &TypeRegistry,
        sockets: &mut Vec<Socket>,
    ) -> NodeResult<()> {
        match self {
            SocketDecl::Fixed {
                identifier,
                display_name,
                data_type,
            } => {
                registry.build(data_type, port_type, sockets, display_name, identifier)?;
            }
            SocketDecl::Base {
                identifier,
                display_name,
                type_property,
            } => {
                let data_type = properties.read_type_property(type_property)?;
                if !registry.contains(data_type) {
                    return Err(NodeError::UnresolvedType {
                        property: type_property.clone(),
                        type_name: data_type.to_string(),
                    });
                }
                registry.build(data_type, port_type, sockets, display_name, identifier)?;
            }
            SocketDecl::List {
                identifier,
                display_name,
                type_property,
            } => {
                let base_type = properties.read_type_property(type_property)?;
                let list_type =
                    registry
                        .to_list(base_type)
                        .map_err(|_| NodeError::UnresolvedType {
                            property: type_property.clone(),
                            type_name: base_type.to_string(),
                        })?;
                registry.build(list_type, port_type, sockets, display_name, identifier)?;
            }
            SocketDecl::Variadic {
                identifier_suffix,
                group,
                ..
            } => {
                let start = sockets.len();
                for entry in properties.group(group) {
                    let built = registry.build(
                        &entry.data_type,
                        port_type,
                        sockets,
                        &entry.display_name,
                        &entry.identifier(identifier_suffix),
                    );
                    if let Err(e) = built {
                        sockets.truncate(start);
                        return Err(e);
                    }
                }
                sockets.push(Socket::operator(
                    port_type,
                    constants::socket::OPERATOR_NAME,
                    Self::operator_identifier(identifier_suffix),
                ));
            }
        }
        Ok(())
    }

    /// Draw the socket at `index` within this declaration.
    ///
    /// Variadic data sockets expose the entry's editable display name; the
    /// sentinel shows the static prompt. Everything else is a plain label.
    pub fn draw_socket(
        &self,
        ui: &mut egui::Ui,
        properties: &mut NodeProperties,
        socket: &mut Socket,
        index: usize,
    ) -> egui::Response {
        match self {
            SocketDecl::Variadic { group, message, .. } => {
                if socket.is_operator() {
                    return ui.label(message.as_str());
                }
                match properties.group_mut(group).and_then(|entries| entries.get_mut(index)) {
                    Some(entry) => {
                        let response = ui.text_edit_singleline(&mut entry.display_name);
                        if response.changed() {
                            socket.name = entry.display_name.clone();
                        }
                        response
                    }
                    None => draw_self(ui, socket),
                }
            }
            _ => draw_self(ui, socket),
        }
    }
}

fn draw_self(ui: &mut egui::Ui, socket: &Socket) -> egui::Response {
    ui.colored_label(socket.color, socket.name.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::variadic::GroupEntry;

    fn properties() -> NodeProperties {
        let mut properties = NodeProperties::default();
        properties.set_type_property("active_type", "Float");
        properties
    }

    #[test]
    fn test_fixed_and_parameterized_amounts() {
        let props = properties();
        assert_eq!(SocketDecl::fixed("a", "A", "Float").amount(&props), 1);
        assert_eq!(SocketDecl::base("b", "B", "active_type").amount(&props), 1);
        assert_eq!(SocketDecl::list("c", "C", "active_type").amount(&props), 1);
    }

    #[test]
    fn test_variadic_amount_tracks_group() {
        let mut props = properties();
        let decl = SocketDecl::variadic("v", "group", "New Input");
        assert_eq!(decl.amount(&props), 1);

        props.push_group_entry("group", GroupEntry::new("Int", "Count"));
        props.push_group_entry("group", GroupEntry::new("Float", "Value"));
        assert_eq!(decl.amount(&props), 3);
    }

    #[test]
    fn test_base_reads_type_property() {
        let registry = TypeRegistry::with_defaults();
        let mut props = properties();
        let decl = SocketDecl::base("value", "Value", "active_type");

        let mut sockets = Vec::new();
        decl.build(&props, PortType::Input, &registry, &mut sockets).unwrap();
        assert_eq!(sockets[0].data_type(), Some("Float"));

        props.set_type_property("active_type", "Text");
        let mut sockets = Vec::new();
        decl.build(&props, PortType::Input, &registry, &mut sockets).unwrap();
        assert_eq!(sockets[0].data_type(), Some("Text"));
    }

    #[test]
    fn test_list_resolves_list_variant() {
        let registry = TypeRegistry::with_defaults();
        let props = properties();
        let mut sockets = Vec::new();
        SocketDecl::list("list", "List", "active_type")
            .build(&props, PortType::Output, &registry, &mut sockets)
            .unwrap();
        assert_eq!(sockets[0].data_type(), Some("Float List"));
        assert!(sockets[0].is_output());
    }

    #[test]
    fn test_unresolved_type_property() {
        let registry = TypeRegistry::with_defaults();
        let mut props = properties();
        props.set_type_property("active_type", "Quaternion");

        let mut sockets = Vec::new();
        for decl in [
            SocketDecl::base("value", "Value", "active_type"),
            SocketDecl::list("list", "List", "active_type"),
        ] {
            let err = decl
                .build(&props, PortType::Input, &registry, &mut sockets)
                .unwrap_err();
            assert!(matches!(
                err,
                NodeError::UnresolvedType { ref property, ref type_name }
                    if property == "active_type" && type_name == "Quaternion"
            ));
        }
        assert!(sockets.is_empty());

        let err = SocketDecl::base("value", "Value", "missing")
            .build(&props, PortType::Input, &registry, &mut sockets)
            .unwrap_err();
        assert!(matches!(err, NodeError::MissingProperty(_)));
    }

    #[test]
    fn test_variadic_build_ends_with_sentinel() {
        let registry = TypeRegistry::with_defaults();
        let mut props = properties();
        let entry = GroupEntry::new("Int", "Count");
        let prefix = entry.identifier_prefix.clone();
        props.push_group_entry("group", entry);

        let mut sockets = Vec::new();
        SocketDecl::variadic("v", "group", "New Input")
            .build(&props, PortType::Input, &registry, &mut sockets)
            .unwrap();
        assert_eq!(sockets.len(), 2);
        assert_eq!(sockets[0].identifier, format!("{}v", prefix));
        assert_eq!(sockets[0].name, "Count");
        assert_eq!(sockets[0].data_type(), Some("Int"));
        assert!(sockets[1].is_operator());
        assert_eq!(sockets[1].identifier, SocketDecl::operator_identifier("v"));
    }

    #[test]
    fn test_variadic_build_is_all_or_nothing() {
        let registry = TypeRegistry::with_defaults();
        let mut props = properties();
        props.push_group_entry("group", GroupEntry::new("Int", "Count"));
        props.push_group_entry("group", GroupEntry::new("Mystery", "Broken"));

        let mut sockets = Vec::new();
        let err = SocketDecl::variadic("v", "group", "New Input")
            .build(&props, PortType::Input, &registry, &mut sockets)
            .unwrap_err();
        assert!(matches!(err, NodeError::UnknownType(ref name) if name == "Mystery"));
        assert!(sockets.is_empty());
    }
}
