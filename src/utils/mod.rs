//! # 工具模块
//!
//! - `url` - URL解析、相对地址解析等工具函数

pub mod url;

// Re-export commonly used items for convenience
pub use self::url::{parse_absolute_url, resolve_url, Url};
