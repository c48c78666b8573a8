//! # 解析器模块
//!
//! 页面文档的 HTML 解析、DOM 操作与序列化。
//!
//! # 模块组织
//!
//! - `html` - HTML文档解析、DOM操作、序列化

pub mod html;

// Re-export commonly used items for convenience
pub use html::{find_nodes, get_node_attr, html_to_dom, serialize_document, set_node_attr};
