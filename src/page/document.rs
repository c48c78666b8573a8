//! 页面宿主
//!
//! [`Page`] 扮演浏览器的角色：持有 DOM、当前地址、捕获/冒泡阶段的点击监听器、
//! 待投递的变更记录，以及一个单线程任务集合。所有回调都在同一线程上依次执行，
//! 与浏览器主线程的协作式模型一致。

use std::cell::RefCell;
use std::future::Future;
use std::io;
use std::rc::{Rc, Weak};
use std::time::Duration;

use markup5ever_rcdom::{Handle, Node, RcDom};
use tokio::task::LocalSet;

use crate::parsers::html::{
    ancestry, append_child, find_nodes, get_child_node_by_name, get_node_attr, get_node_name,
    html_to_dom, is_within, serialize_document, set_node_attr,
};
use crate::utils::url::{resolve_url, Url};

/// 浏览器窗口：当前地址与导航记录
///
/// 异步任务只持有窗口，不持有 DOM。
#[derive(Debug)]
pub struct Window {
    location: RefCell<Url>,
    navigations: RefCell<Vec<Url>>,
}

impl Window {
    pub fn new(location: Url) -> Rc<Self> {
        Rc::new(Window {
            location: RefCell::new(location),
            navigations: RefCell::new(Vec::new()),
        })
    }

    pub fn location(&self) -> Url {
        self.location.borrow().clone()
    }

    pub fn href(&self) -> String {
        self.location.borrow().to_string()
    }

    /// 页面内导航，相对地址以当前地址为基准
    pub fn navigate(&self, href: &str) -> Result<Url, url::ParseError> {
        let target = resolve_url(&self.location.borrow(), href)?;
        *self.location.borrow_mut() = target.clone();
        self.navigations.borrow_mut().push(target.clone());
        Ok(target)
    }

    /// 客户端路由改写地址，不产生导航
    pub fn replace_location(&self, location: Url) {
        *self.location.borrow_mut() = location;
    }

    /// 按发生顺序返回所有导航
    pub fn navigations(&self) -> Vec<Url> {
        self.navigations.borrow().clone()
    }
}

/// 变更类型
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationKind {
    ChildList,
    Attributes { name: String },
}

/// 一条 DOM 变更记录
#[derive(Clone)]
pub struct MutationRecord {
    pub kind: MutationKind,
    pub target: Handle,
    pub added_nodes: Vec<Handle>,
}

impl MutationRecord {
    pub fn has_added_nodes(&self) -> bool {
        !self.added_nodes.is_empty()
    }
}

/// 点击事件
pub struct ClickEvent {
    target: Handle,
    default_prevented: bool,
    propagation_stopped: bool,
}

impl ClickEvent {
    fn new(target: Handle) -> Self {
        ClickEvent {
            target,
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    pub fn target(&self) -> &Handle {
        &self.target
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

/// 点击派发的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// 某个监听器阻止了默认行为
    Intercepted,
    /// 浏览器按链接默认行为跳转
    FollowedLink(Url),
    /// 既没有拦截也没有可跟随的链接
    NoAction,
}

pub type ClickListener = Rc<dyn Fn(&Page, &mut ClickEvent)>;
pub type MutationCallback = Rc<dyn Fn(&Page, &[MutationRecord])>;

struct ListenerEntry {
    node: Weak<Node>,
    capture: bool,
    callback: ClickListener,
}

struct ObserverEntry {
    root: Weak<Node>,
    callback: MutationCallback,
}

/// 单个已加载的页面
pub struct Page {
    dom: RcDom,
    window: Rc<Window>,
    listeners: RefCell<Vec<ListenerEntry>>,
    observers: RefCell<Vec<ObserverEntry>>,
    pending: RefCell<Vec<MutationRecord>>,
    tasks: LocalSet,
}

impl Page {
    /// 从 HTML 字节加载页面
    pub fn from_bytes(data: &[u8], document_encoding: &str, location: Url) -> Self {
        Page {
            dom: html_to_dom(data, document_encoding),
            window: Window::new(location),
            listeners: RefCell::new(Vec::new()),
            observers: RefCell::new(Vec::new()),
            pending: RefCell::new(Vec::new()),
            tasks: LocalSet::new(),
        }
    }

    pub fn from_html(html: &str, location: Url) -> Self {
        Self::from_bytes(html.as_bytes(), "utf-8", location)
    }

    pub fn document(&self) -> &Handle {
        &self.dom.document
    }

    /// `<body>`，缺失时退回文档根
    pub fn body(&self) -> Handle {
        get_child_node_by_name(&self.dom.document, "html")
            .and_then(|html| get_child_node_by_name(&html, "body"))
            .unwrap_or_else(|| self.dom.document.clone())
    }

    pub fn window(&self) -> Rc<Window> {
        Rc::clone(&self.window)
    }

    pub fn location(&self) -> Url {
        self.window.location()
    }

    /// 文档基准地址
    ///
    /// 取第一个带 `href` 的 `<base>`，以当前地址解析；没有或无法解析时就是当前地址。
    pub fn base_url(&self) -> Url {
        let location = self.location();
        find_nodes(&self.dom.document, &["base"])
            .iter()
            .find_map(|base| get_node_attr(base, "href"))
            .and_then(|href| resolve_url(&location, &href).ok())
            .unwrap_or(location)
    }

    pub fn anchors(&self) -> Vec<Handle> {
        find_nodes(&self.dom.document, &["a"])
    }

    /// 设置属性并记录一条属性变更
    pub fn set_attribute(&self, node: &Handle, name: &str, value: &str) {
        set_node_attr(node, name, Some(value.to_string()));
        self.pending.borrow_mut().push(MutationRecord {
            kind: MutationKind::Attributes {
                name: name.to_string(),
            },
            target: node.clone(),
            added_nodes: Vec::new(),
        });
    }

    /// 把一段 HTML 追加到 `parent` 下，返回插入的顶层节点
    pub fn append_html(&self, parent: &Handle, html: &str) -> Vec<Handle> {
        let fragment = html_to_dom(html.as_bytes(), "utf-8");
        let Some(fragment_body) = find_nodes(&fragment.document, &["html", "body"])
            .into_iter()
            .next()
        else {
            return Vec::new();
        };

        let added: Vec<Handle> = fragment_body.children.borrow().clone();
        for node in &added {
            append_child(parent, node.clone());
        }

        if !added.is_empty() {
            self.pending.borrow_mut().push(MutationRecord {
                kind: MutationKind::ChildList,
                target: parent.clone(),
                added_nodes: added.clone(),
            });
        }

        added
    }

    /// 注册点击监听器，同时清理已被释放节点上的旧监听器
    pub fn add_event_listener(&self, node: &Handle, capture: bool, callback: ClickListener) {
        let mut listeners = self.listeners.borrow_mut();
        listeners.retain(|entry| entry.node.strong_count() > 0);
        listeners.push(ListenerEntry {
            node: Rc::downgrade(node),
            capture,
            callback,
        });
    }

    /// 节点上注册的监听器数量
    pub fn listener_count(&self, node: &Handle) -> usize {
        self.listeners
            .borrow()
            .iter()
            .filter(|entry| is_same_node(&entry.node, node))
            .count()
    }

    /// 监听器表中的条目总数
    pub fn listener_total(&self) -> usize {
        self.listeners.borrow().len()
    }

    fn listeners_for(&self, node: &Handle, capture: bool) -> Vec<ClickListener> {
        self.listeners
            .borrow()
            .iter()
            .filter(|entry| entry.capture == capture && is_same_node(&entry.node, node))
            .map(|entry| Rc::clone(&entry.callback))
            .collect()
    }

    /// 观察 `root` 子树的变更
    pub fn observe(&self, root: &Handle, callback: MutationCallback) {
        self.observers.borrow_mut().push(ObserverEntry {
            root: Rc::downgrade(root),
            callback,
        });
    }

    pub fn observer_count(&self) -> usize {
        self.observers.borrow().len()
    }

    pub fn pending_mutations(&self) -> usize {
        self.pending.borrow().len()
    }

    /// 把积累的变更作为一个批次投递给观察者
    ///
    /// 观察者在回调中产生的新变更留到下一次投递。返回本批次的记录数。
    pub fn deliver_mutations(&self) -> usize {
        let records: Vec<MutationRecord> = self.pending.borrow_mut().drain(..).collect();
        if records.is_empty() {
            return 0;
        }

        let observers: Vec<(Handle, MutationCallback)> = self
            .observers
            .borrow()
            .iter()
            .filter_map(|entry| {
                entry
                    .root
                    .upgrade()
                    .map(|root| (root, Rc::clone(&entry.callback)))
            })
            .collect();

        for (root, callback) in observers {
            let batch: Vec<MutationRecord> = records
                .iter()
                .filter(|record| is_within(&record.target, &root))
                .cloned()
                .collect();

            if !batch.is_empty() {
                callback(self, &batch);
            }
        }

        records.len()
    }

    /// 模拟用户点击
    ///
    /// 先从根到目标执行捕获阶段监听器，再从目标到根执行冒泡阶段监听器；
    /// 没有监听器阻止默认行为时跟随最近的 `<a href>`。
    pub fn click(&self, target: &Handle) -> ClickOutcome {
        let path = ancestry(target);
        let mut event = ClickEvent::new(target.clone());

        for node in &path {
            for listener in self.listeners_for(node, true) {
                listener(self, &mut event);
            }
            if event.propagation_stopped {
                break;
            }
        }

        if !event.propagation_stopped {
            for node in path.iter().rev() {
                for listener in self.listeners_for(node, false) {
                    listener(self, &mut event);
                }
                if event.propagation_stopped {
                    break;
                }
            }
        }

        if event.default_prevented {
            return ClickOutcome::Intercepted;
        }

        let href = path
            .iter()
            .rev()
            .filter(|node| get_node_name(node) == Some("a"))
            .find_map(|node| get_node_attr(node, "href"));
        let Some(href) = href else {
            return ClickOutcome::NoAction;
        };

        match resolve_url(&self.base_url(), &href)
            .and_then(|target| self.window.navigate(target.as_str()))
        {
            Ok(url) => ClickOutcome::FollowedLink(url),
            Err(_) => ClickOutcome::NoAction,
        }
    }

    /// 在页面的任务集合中排入一个异步任务
    ///
    /// 任务只在 [`Page::run_until`] 或 [`Page::run_for`] 驱动时执行；
    /// 页面被丢弃时未完成的任务一并丢弃。
    pub fn spawn<F>(&self, task: F)
    where
        F: Future<Output = ()> + 'static,
    {
        self.tasks.spawn_local(task);
    }

    /// 驱动页面任务直到 `future` 完成
    pub async fn run_until<F: Future>(&self, future: F) -> F::Output {
        self.tasks.run_until(future).await
    }

    /// 驱动页面任务一段时间
    pub async fn run_for(&self, duration: Duration) {
        self.tasks.run_until(tokio::time::sleep(duration)).await
    }

    /// 序列化当前 DOM
    pub fn to_html(&self) -> io::Result<String> {
        let bytes = serialize_document(&self.dom.document, "utf-8")?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

fn is_same_node(weak: &Weak<Node>, node: &Handle) -> bool {
    weak.upgrade().is_some_and(|candidate| Rc::ptr_eq(&candidate, node))
}
