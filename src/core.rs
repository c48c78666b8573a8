use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use crate::bridge::NativeBridge;
use crate::config::NavioConfig;
use crate::env::{core::NoColor, EnvVar};
use crate::error::NavioResult;
use crate::page::{
    classify_url, ChangeWatcher, FallbackRedirector, LinkRewriter, Page, PageContext, Strategy,
};
use crate::parsers::html::serialize_document;
use crate::utils::url::Url;

const ANSI_COLOR_RED: &str = "\x1b[31m";
const ANSI_COLOR_RESET: &str = "\x1b[0m";

/// 每次页面加载的状态
///
/// `Init -> Classified -> {ScanningObserving | Redirecting | Idle}`，不会回退。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageState {
    Init,
    Classified(PageContext),
    ScanningObserving { rewritten: usize },
    Redirecting,
    Idle,
}

impl PageState {
    pub fn is_terminal(self) -> bool {
        !matches!(self, PageState::Init | PageState::Classified(_))
    }
}

/// 内容脚本
///
/// 一个实例对应一次页面加载。桥接在 `bridge_enabled` 关闭时被忽略。
pub struct ContentScript {
    config: Rc<NavioConfig>,
    bridge: Option<Rc<dyn NativeBridge>>,
    state: Cell<PageState>,
}

impl ContentScript {
    pub fn new(config: NavioConfig) -> Self {
        Self {
            config: Rc::new(config),
            bridge: None,
            state: Cell::new(PageState::Init),
        }
    }

    pub fn with_bridge(mut self, bridge: Rc<dyn NativeBridge>) -> Self {
        self.bridge = Some(bridge);
        self
    }

    pub fn config(&self) -> &NavioConfig {
        &self.config
    }

    pub fn state(&self) -> PageState {
        self.state.get()
    }

    fn active_bridge(&self) -> Option<Rc<dyn NativeBridge>> {
        if self.config.bridge_enabled {
            self.bridge.clone()
        } else {
            None
        }
    }

    /// 文档就绪后调用，按页面类型选择策略
    ///
    /// 重复调用不会再次处理页面，只返回当前状态。
    pub fn attach(&self, page: &Page) -> PageState {
        if self.state.get() != PageState::Init {
            return self.state.get();
        }

        let location = page.location();
        tracing::info!("Navio loaded on: {}", location);

        let context = classify_url(&location);
        self.state.set(PageState::Classified(context));
        tracing::info!("Page classified as {}", context);

        let state = match context.strategy() {
            Strategy::ScanAndObserve => {
                let rewriter = Rc::new(LinkRewriter::new(
                    Rc::clone(&self.config),
                    self.active_bridge(),
                ));
                let rewritten = rewriter.scan_and_rewrite(page);
                ChangeWatcher::new(rewriter).observe(page);
                PageState::ScanningObserving { rewritten }
            }
            Strategy::Redirect => {
                FallbackRedirector::new(Rc::clone(&self.config), self.active_bridge())
                    .schedule(page);
                PageState::Redirecting
            }
            Strategy::Idle => PageState::Idle,
        };

        self.state.set(state);
        state
    }
}

/// 离线处理一个 HTML 文档的结果
#[derive(Debug, Clone)]
pub struct RewriteReport {
    pub state: PageState,
    pub navigations: Vec<Url>,
    pub html: Vec<u8>,
}

/// 以给定地址加载文档，运行内容脚本，返回改写后的文档
///
/// 地图页面会等待回退跳转完成，跳转记录在 `navigations` 中。
/// 需要启用了时间驱动的 tokio 运行时。
pub async fn rewrite_document(
    input_data: &[u8],
    input_encoding: Option<&str>,
    location: Url,
    config: NavioConfig,
) -> NavioResult<RewriteReport> {
    let document_encoding = input_encoding.unwrap_or("utf-8");
    let page = Page::from_bytes(input_data, document_encoding, location);

    let script = ContentScript::new(config);
    let state = script.attach(&page);
    page.deliver_mutations();

    if state == PageState::Redirecting {
        let budget: Duration = script.config().settle_delay() + script.config().bridge_timeout();
        page.run_for(budget).await;
    }

    let html = serialize_document(page.document(), document_encoding)?;

    Ok(RewriteReport {
        state,
        navigations: page.window().navigations(),
        html,
    })
}

/// Prints an error message to stderr
pub fn print_error_message(msg: &str) {
    if NoColor::get().unwrap_or(false) {
        eprintln!("{msg}");
    } else {
        eprintln!("{ANSI_COLOR_RED}{msg}{ANSI_COLOR_RESET}");
    }
}

/// Prints an info message to stdout
pub fn print_info_message(msg: &str) {
    println!("{msg}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::html::get_node_attr;

    fn page(html: &str, location: &str) -> Page {
        Page::from_html(html, Url::parse(location).unwrap())
    }

    #[test]
    fn test_search_page_scans_and_observes() {
        let page = page(
            "<body><a href=\"https://maps.google.com/?q=Cafe\">Cafe</a></body>",
            "https://www.google.com/search?q=cafe",
        );
        let script = ContentScript::new(NavioConfig::default());

        assert_eq!(
            script.attach(&page),
            PageState::ScanningObserving { rewritten: 1 }
        );
        assert_eq!(page.observer_count(), 1);
    }

    #[test]
    fn test_attach_is_one_shot() {
        let page = page("<body></body>", "https://example.com/");
        let script = ContentScript::new(NavioConfig::default());

        assert_eq!(script.state(), PageState::Init);
        assert_eq!(script.attach(&page), PageState::Idle);
        assert!(script.state().is_terminal());
        assert_eq!(script.attach(&page), PageState::Idle);
        assert_eq!(page.observer_count(), 0);
    }

    #[test]
    fn test_related_page_scans_and_observes() {
        let page = page(
            "<body><a href=\"/maps/place/A\">A</a></body>",
            "https://www.google.com/imghp",
        );
        let script = ContentScript::new(NavioConfig::default());

        assert_eq!(
            script.attach(&page),
            PageState::ScanningObserving { rewritten: 1 }
        );
        assert_eq!(page.observer_count(), 1);
        assert_eq!(
            get_node_attr(&page.anchors()[0], "href").as_deref(),
            Some("https://maps.apple.com/?q=A")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_rewrite_document_follows_redirect() {
        let report = rewrite_document(
            b"<html><body></body></html>",
            None,
            Url::parse("https://www.google.com/maps/search/pizza").unwrap(),
            NavioConfig::default(),
        )
        .await
        .unwrap();

        assert_eq!(report.state, PageState::Redirecting);
        assert_eq!(
            report.navigations,
            vec![Url::parse("https://maps.apple.com/?q=pizza").unwrap()]
        );
    }
}
