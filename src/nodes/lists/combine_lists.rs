//! Combine lists node implementation

use super::ACTIVE_TYPE;
use crate::nodes::declaration::SocketDecl;
use crate::nodes::factory::{NodeCategory, NodeFactory, NodeMetadata};

pub struct CombineListsNode;

impl NodeFactory for CombineListsNode {
    fn metadata() -> NodeMetadata {
        NodeMetadata::new(
            "CombineLists",
            "Combine Lists",
            NodeCategory::lists(),
            "Concatenates two lists",
        )
        .with_type_property(ACTIVE_TYPE)
        .with_inputs(vec![
            SocketDecl::list("a", "List A", ACTIVE_TYPE),
            SocketDecl::list("b", "List B", ACTIVE_TYPE),
        ])
        .with_outputs(vec![SocketDecl::list("result", "Result", ACTIVE_TYPE)])
    }
}
