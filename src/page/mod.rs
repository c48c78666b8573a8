//! # 页面流水线
//!
//! - `document` - 页面宿主：DOM、地址、点击派发、变更投递、异步任务
//! - `classifier` - 页面分类
//! - `scanner` - 地图链接扫描与已处理集合
//! - `rewriter` - 链接改写与点击拦截
//! - `watcher` - 动态插入内容的重新扫描
//! - `redirector` - 地图页面的延迟跳转

pub mod classifier;
pub mod document;
pub mod redirector;
pub mod rewriter;
pub mod scanner;
pub mod watcher;

pub use classifier::{classify, classify_url, PageContext, Strategy};
pub use document::{
    ClickEvent, ClickListener, ClickOutcome, MutationCallback, MutationKind, MutationRecord, Page,
    Window,
};
pub use redirector::{redirect_after, FallbackRedirector, RedirectOutcome};
pub use rewriter::{AnchorRecord, LinkRewriter};
pub use scanner::{is_map_link, LinkScanner, ProcessedSet, MAP_LINK_PATTERNS};
pub use watcher::ChangeWatcher;
