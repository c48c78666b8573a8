//! HTML解析和处理模块
//!
//! - `dom`: 基础DOM操作
//! - `serializer`: 序列化功能

pub mod dom;
pub mod serializer;

pub use dom::{
    ancestry, append_child, find_nodes, get_child_node_by_name, get_node_attr, get_node_name,
    get_parent_node, html_to_dom, is_within, node_key, set_node_attr, NodeKey,
};
pub use serializer::serialize_document;
