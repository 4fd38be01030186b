//! Crate-wide constants and default values
//!
//! Centralized location for hard-coded values shared by the socket system

/// Socket type constants
pub mod socket {
    /// Default value of a type property when a node kind does not override it
    pub const DEFAULT_TYPE: &str = "Float";

    /// Suffix appended to a base type name to form its list variant
    pub const LIST_SUFFIX: &str = " List";

    /// Prefix of the identifier given to a variadic group's operator sentinel
    pub const OPERATOR_IDENTIFIER_PREFIX: &str = "operator:";

    /// Display name of operator sentinel sockets
    pub const OPERATOR_NAME: &str = "Operator";

    /// Color used for operator sentinels and unregistered types
    pub const OPERATOR_COLOR: [u8; 3] = [120, 120, 120];
}

/// Node appearance constants
pub mod node {
    /// Default node color
    pub const DEFAULT_COLOR: [u8; 3] = [60, 60, 60];
}
