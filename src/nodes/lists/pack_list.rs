//! Pack list node implementation

use super::ACTIVE_TYPE;
use crate::nodes::declaration::SocketDecl;
use crate::nodes::factory::{NodeCategory, NodeFactory, NodeMetadata};
use egui::Color32;

/// Packs any number of values into a list; grows when a link is dropped on
/// its "New Input" sentinel
pub struct PackListNode;

impl NodeFactory for PackListNode {
    fn metadata() -> NodeMetadata {
        NodeMetadata::new(
            "PackList",
            "Pack List",
            NodeCategory::lists(),
            "Packs dropped values into a list",
        )
        .with_color(Color32::from_rgb(70, 90, 60))
        .with_type_property(ACTIVE_TYPE)
        .with_inputs(vec![SocketDecl::variadic("item", "items", "New Input")])
        .with_outputs(vec![SocketDecl::list("list", "List", ACTIVE_TYPE)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::port::PortType;
    use egui::Pos2;

    #[test]
    fn test_pack_list_starts_with_sentinel() {
        let node = PackListNode::create(Pos2::ZERO).unwrap();
        assert_eq!(node.inputs.len(), 1);
        assert!(node.inputs[0].is_operator());
        assert_eq!(node.identifiers(PortType::Input), vec!["operator:item"]);
        assert_eq!(node.outputs[0].data_type(), Some("Float List"));
    }
}
