//! List nodes
//!
//! Generic over the `active_type` property: changing it retypes every
//! parameterized socket on the next rebuild.

pub mod append_to_list;
pub mod combine_lists;
pub mod get_list_element;
pub mod pack_list;

pub use append_to_list::AppendToListNode;
pub use combine_lists::CombineListsNode;
pub use get_list_element::GetListElementNode;
pub use pack_list::PackListNode;

/// Type property shared by the list nodes
pub const ACTIVE_TYPE: &str = "active_type";
