//! # Navio Library
//!
//! 把网页中的 Google Maps 链接改写为 Apple Maps 深度链接，点击时优先交给原生应用打开。
//!
//! ## 模块组织
//!
//! - `translator` - Google Maps 地址到 Apple Maps 地址的纯函数转换
//! - `page` - 页面宿主、页面分类、链接扫描改写、动态内容监听、回退跳转
//! - `bridge` - 原生桥接：消息格式、中继、原生处理器
//! - `core` - 内容脚本入口与页面状态机
//! - `config` - 配置加载
//! - `parsers` - HTML 解析与序列化
//! - `utils` - 工具函数
//!
//! ## 示例
//!
//! ```
//! use navio::translator::translate;
//!
//! assert_eq!(
//!     translate("https://www.google.com/maps/dir/?api=1&origin=B&destination=A").as_deref(),
//!     Some("https://maps.apple.com/?saddr=B&daddr=A")
//! );
//! ```

pub mod bridge;
pub mod config;
pub mod core;
pub mod env;
pub mod error;
pub mod page;
pub mod parsers;
pub mod translator;
pub mod utils;

// Re-export commonly used items for convenience
pub use crate::core::{ContentScript, PageState};
pub use config::NavioConfig;
pub use error::{BridgeError, NavioError, NavioResult};
pub use page::{Page, PageContext};
pub use translator::translate;
