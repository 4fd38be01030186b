//! Get list element node implementation

use super::ACTIVE_TYPE;
use crate::nodes::declaration::SocketDecl;
use crate::nodes::factory::{NodeCategory, NodeFactory, NodeMetadata};

pub struct GetListElementNode;

impl NodeFactory for GetListElementNode {
    fn metadata() -> NodeMetadata {
        NodeMetadata::new(
            "GetListElement",
            "Get List Element",
            NodeCategory::lists(),
            "Reads one element of a list",
        )
        .with_type_property(ACTIVE_TYPE)
        .with_inputs(vec![
            SocketDecl::list("list", "List", ACTIVE_TYPE),
            SocketDecl::fixed("index", "Index", "Int"),
        ])
        .with_outputs(vec![SocketDecl::base("value", "Value", ACTIVE_TYPE)])
    }
}
