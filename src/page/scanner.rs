//! 地图链接扫描
//!
//! 找出文档中 `href` 含有地图特征片段、且尚未处理过的 `<a>` 元素。

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use markup5ever_rcdom::{Handle, Node};

use crate::parsers::html::{find_nodes, get_node_attr, node_key, NodeKey};

/// 地图链接特征，`href` 包含任意一个即视为候选
pub const MAP_LINK_PATTERNS: &[&str] = &[
    "//maps.google.",
    "/maps/place",
    "/maps/dir",
    "/maps/search",
    "/maps?",
];

/// `href` 是否像一个地图链接
pub fn is_map_link(href: &str) -> bool {
    MAP_LINK_PATTERNS.iter().any(|pattern| href.contains(pattern))
}

/// 按节点身份记录已处理的锚点
///
/// 只持有弱引用，节点被移出文档并释放后条目自然失效。
#[derive(Default)]
pub struct ProcessedSet {
    nodes: RefCell<HashMap<NodeKey, Weak<Node>>>,
}

impl ProcessedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, node: &Handle) -> bool {
        self.nodes
            .borrow()
            .get(&node_key(node))
            .and_then(Weak::upgrade)
            .is_some_and(|known| Rc::ptr_eq(&known, node))
    }

    /// 记录节点，已存在时返回 `false`
    pub fn insert(&self, node: &Handle) -> bool {
        if self.contains(node) {
            return false;
        }

        let mut nodes = self.nodes.borrow_mut();
        nodes.retain(|_, weak| weak.strong_count() > 0);
        nodes.insert(node_key(node), Rc::downgrade(node));
        true
    }

    /// 仍然存活的已处理节点数
    pub fn len(&self) -> usize {
        self.nodes
            .borrow()
            .values()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// 链接扫描器
#[derive(Default)]
pub struct LinkScanner {
    processed: ProcessedSet,
}

impl LinkScanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// 按文档顺序返回 `root` 下所有未处理的地图链接
    pub fn scan(&self, root: &Handle) -> Vec<Handle> {
        find_nodes(root, &["a"])
            .into_iter()
            .filter(|anchor| get_node_attr(anchor, "href").is_some_and(|href| is_map_link(&href)))
            .filter(|anchor| !self.processed.contains(anchor))
            .collect()
    }

    pub fn mark_processed(&self, anchor: &Handle) -> bool {
        self.processed.insert(anchor)
    }

    pub fn is_processed(&self, anchor: &Handle) -> bool {
        self.processed.contains(anchor)
    }

    pub fn processed_count(&self) -> usize {
        self.processed.len()
    }
}
