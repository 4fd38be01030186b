use egui::Pos2;
use nodle_sockets::{NodeGraph, NodeRegistry, PortType, SocketDecl};

fn main() {
    env_logger::init();

    let registry = NodeRegistry::with_builtins();
    let mut graph = NodeGraph::new();

    let math = registry
        .create_node("FloatMath", Pos2::new(100.0, 100.0))
        .expect("FloatMath is a built-in node");
    let pack = registry
        .create_node("PackList", Pos2::new(300.0, 100.0))
        .expect("PackList is a built-in node");
    let math_id = graph.add_node(math);
    let pack_id = graph.add_node(pack);

    let result = graph.find_socket(math_id, "result", true).unwrap();
    let sentinel_identifier = SocketDecl::operator_identifier("item");

    // Drop the math result on the pack node's sentinel three times
    for _ in 0..3 {
        let sentinel = graph.find_socket(pack_id, &sentinel_identifier, false).unwrap();
        match graph.try_link(result, sentinel) {
            Ok(grown) => println!("Dropped link on sentinel, grown: {}", grown),
            Err(e) => println!("Failed to grow: {}", e),
        }
    }

    let pack = graph.node(pack_id).unwrap();
    println!("{} inputs:", pack.title);
    for socket in pack.sockets(PortType::Input) {
        println!(
            "  {} [{}] {:?} -> {} links",
            socket.name,
            socket.identifier,
            socket.data_type(),
            graph.list_connections(socket.id).len()
        );
    }

    graph.set_type_property(pack_id, "active_type", "Int").unwrap();
    println!(
        "Graph has {} nodes and {} connections after retyping",
        graph.nodes.len(),
        graph.connections.len()
    );
}
