//! Concrete socket types and socket identity

use egui::Color32;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-unique handle of a concrete socket instance
pub type SocketId = u64;

static NEXT_SOCKET_ID: AtomicU64 = AtomicU64::new(1);

/// Allocates a fresh socket handle
pub fn next_socket_id() -> SocketId {
    NEXT_SOCKET_ID.fetch_add(1, Ordering::Relaxed)
}

/// Makes sure future handles are allocated above `id`.
///
/// Used after loading a saved graph whose sockets already carry handles.
pub fn reserve_socket_ids(id: SocketId) {
    NEXT_SOCKET_ID.fetch_max(id.saturating_add(1), Ordering::Relaxed);
}

/// Side of a node a socket lives on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PortType {
    Input,
    Output,
}

impl PortType {
    pub fn is_output(self) -> bool {
        matches!(self, PortType::Output)
    }
}

/// What a socket carries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SocketKind {
    /// A typed data socket
    Data { data_type: String },
    /// Trailing sentinel of a variadic group; links dropped here grow the group
    Operator,
}

/// A concrete connection point on a node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Socket {
    pub id: SocketId,
    /// Stable identifier, preserved across rebuilds
    pub identifier: String,
    /// Display name
    pub name: String,
    pub port_type: PortType,
    pub kind: SocketKind,
    #[serde(with = "color32_serde")]
    pub color: Color32,
}

impl Socket {
    /// Creates a data socket with a fresh handle
    pub fn data(
        port_type: PortType,
        data_type: impl Into<String>,
        name: impl Into<String>,
        identifier: impl Into<String>,
        color: Color32,
    ) -> Self {
        Self {
            id: next_socket_id(),
            identifier: identifier.into(),
            name: name.into(),
            port_type,
            kind: SocketKind::Data {
                data_type: data_type.into(),
            },
            color,
        }
    }

    /// Creates an operator sentinel with a fresh handle
    pub fn operator(
        port_type: PortType,
        name: impl Into<String>,
        identifier: impl Into<String>,
    ) -> Self {
        let [r, g, b] = crate::constants::socket::OPERATOR_COLOR;
        Self {
            id: next_socket_id(),
            identifier: identifier.into(),
            name: name.into(),
            port_type,
            kind: SocketKind::Operator,
            color: Color32::from_rgb(r, g, b),
        }
    }

    /// Checks if this socket is an input
    pub fn is_input(&self) -> bool {
        matches!(self.port_type, PortType::Input)
    }

    /// Checks if this socket is an output
    pub fn is_output(&self) -> bool {
        matches!(self.port_type, PortType::Output)
    }

    pub fn is_operator(&self) -> bool {
        matches!(self.kind, SocketKind::Operator)
    }

    /// The data type carried by this socket, `None` for sentinels
    pub fn data_type(&self) -> Option<&str> {
        match &self.kind {
            SocketKind::Data { data_type } => Some(data_type),
            SocketKind::Operator => None,
        }
    }
}

// Serde helper module for Color32
pub(crate) mod color32_serde {
    use egui::Color32;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(color: &Color32, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        [color.r(), color.g(), color.b(), color.a()].serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Color32, D::Error>
    where
        D: Deserializer<'de>,
    {
        let [r, g, b, a] = <[u8; 4]>::deserialize(deserializer)?;
        Ok(Color32::from_rgba_unmultiplied(r, g, b, a))
    }
}
