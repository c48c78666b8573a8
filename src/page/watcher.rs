//! 动态内容监听
//!
//! 搜索结果页会异步插入新的结果。每当一批变更中出现新增节点，就对整个文档
//! 重新扫描一次；改写自身只产生属性变更，不会触发新的扫描。

use std::cell::Cell;
use std::rc::Rc;

use super::document::{MutationRecord, Page};
use super::rewriter::LinkRewriter;

pub struct ChangeWatcher {
    rewriter: Rc<LinkRewriter>,
    batches: Cell<usize>,
    rescans: Cell<usize>,
}

impl ChangeWatcher {
    pub fn new(rewriter: Rc<LinkRewriter>) -> Rc<Self> {
        Rc::new(Self {
            rewriter,
            batches: Cell::new(0),
            rescans: Cell::new(0),
        })
    }

    /// 在页面 body 上注册观察者，随页面一起销毁
    pub fn observe(self: &Rc<Self>, page: &Page) {
        let watcher = Rc::clone(self);
        page.observe(
            &page.body(),
            Rc::new(move |page: &Page, records: &[MutationRecord]| {
                watcher.handle_batch(page, records);
            }),
        );
        tracing::debug!("DOM observer started");
    }

    /// 处理一批变更，发生重新扫描时返回改写数量
    pub fn handle_batch(&self, page: &Page, records: &[MutationRecord]) -> Option<usize> {
        self.batches.set(self.batches.get() + 1);

        if !records.iter().any(MutationRecord::has_added_nodes) {
            return None;
        }

        self.rescans.set(self.rescans.get() + 1);
        Some(self.rewriter.scan_and_rewrite(page))
    }

    pub fn batches(&self) -> usize {
        self.batches.get()
    }

    pub fn rescans(&self) -> usize {
        self.rescans.get()
    }
}
