//! Float math node implementation

use crate::nodes::declaration::SocketDecl;
use crate::nodes::factory::{NodeCategory, NodeFactory, NodeMetadata};
use egui::Color32;

/// Binary float operation with fixed sockets
pub struct FloatMathNode;

impl NodeFactory for FloatMathNode {
    fn metadata() -> NodeMetadata {
        NodeMetadata::new(
            "FloatMath",
            "Float Math",
            NodeCategory::math(),
            "Combines two floats",
        )
        .with_color(Color32::from_rgb(45, 55, 65))
        .with_inputs(vec![
            SocketDecl::fixed("a", "A", "Float"),
            SocketDecl::fixed("b", "B", "Float"),
        ])
        .with_outputs(vec![SocketDecl::fixed("result", "Result", "Float")])
    }
}
