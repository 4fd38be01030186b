//! Append to list node implementation

use super::ACTIVE_TYPE;
use crate::nodes::declaration::SocketDecl;
use crate::nodes::factory::{NodeCategory, NodeFactory, NodeMetadata};

pub struct AppendToListNode;

impl NodeFactory for AppendToListNode {
    fn metadata() -> NodeMetadata {
        NodeMetadata::new(
            "AppendToList",
            "Append to List",
            NodeCategory::lists(),
            "Appends a value to a list",
        )
        .with_type_property(ACTIVE_TYPE)
        .with_inputs(vec![
            SocketDecl::list("list", "List", ACTIVE_TYPE),
            SocketDecl::base("value", "Value", ACTIVE_TYPE),
        ])
        .with_outputs(vec![SocketDecl::list("list", "List", ACTIVE_TYPE)])
    }
}
