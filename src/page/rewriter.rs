//! 地图链接改写
//!
//! 把扫描到的链接改写为 Apple Maps 地址，并在锚点上安装捕获阶段的点击拦截，
//! 点击时先交给原生桥接，失败再在页面内跳转。

use std::rc::Rc;
use std::time::Duration;

use markup5ever_rcdom::Handle;

use super::document::{ClickEvent, ClickListener, Page};
use super::scanner::LinkScanner;
use crate::bridge::{open_with_fallback, NativeBridge};
use crate::config::NavioConfig;
use crate::parsers::html::get_node_attr;
use crate::translator::translate;
use crate::utils::url::{resolve_url, Url};

/// 一个锚点的处理结果
#[derive(Clone)]
pub struct AnchorRecord {
    pub anchor: Handle,
    pub original_href: String,
    pub translated_href: Option<String>,
}

impl AnchorRecord {
    pub fn is_rewritten(&self) -> bool {
        self.translated_href.is_some()
    }
}

/// 链接改写器
///
/// 持有扫描器，因此一个改写器对应一次页面加载。
pub struct LinkRewriter {
    config: Rc<NavioConfig>,
    bridge: Option<Rc<dyn NativeBridge>>,
    scanner: LinkScanner,
}

impl LinkRewriter {
    pub fn new(config: Rc<NavioConfig>, bridge: Option<Rc<dyn NativeBridge>>) -> Self {
        Self {
            config,
            bridge,
            scanner: LinkScanner::new(),
        }
    }

    pub fn scanner(&self) -> &LinkScanner {
        &self.scanner
    }

    /// 扫描整个文档并改写新发现的地图链接，返回改写数量
    pub fn scan_and_rewrite(&self, page: &Page) -> usize {
        let candidates = self.scanner.scan(page.document());
        if candidates.is_empty() {
            return 0;
        }

        let base = page.base_url();
        let found = candidates.len();
        let rewritten = candidates
            .into_iter()
            .map(|anchor| self.rewrite_anchor(page, &base, anchor))
            .filter(AnchorRecord::is_rewritten)
            .count();

        tracing::info!("Processed {} of {} map links", rewritten, found);
        rewritten
    }

    /// 改写单个锚点
    ///
    /// 无法转换的锚点保持原样，也不标记为已处理。
    pub fn rewrite_anchor(&self, page: &Page, base: &Url, anchor: Handle) -> AnchorRecord {
        let original_href = get_node_attr(&anchor, "href").unwrap_or_default();
        let translated_href = resolve_url(base, &original_href)
            .ok()
            .and_then(|resolved| translate(resolved.as_str()));

        let Some(target) = translated_href.clone() else {
            tracing::debug!("Could not convert URL: {}", original_href);
            return AnchorRecord {
                anchor,
                original_href,
                translated_href,
            };
        };

        // 先标记，属性写入不会让后续扫描再次选中它
        self.scanner.mark_processed(&anchor);
        page.set_attribute(&anchor, "href", &target);
        page.set_attribute(&anchor, "target", "_self");
        page.add_event_listener(&anchor, true, self.interceptor(target.clone()));

        if self.config.debug {
            tracing::info!("Converted: {} -> {}", original_href, target);
        } else {
            tracing::debug!("Converted: {} -> {}", original_href, target);
        }

        AnchorRecord {
            anchor,
            original_href,
            translated_href,
        }
    }

    fn interceptor(&self, url: String) -> ClickListener {
        let bridge = self.bridge.clone();
        let timeout: Duration = self.config.bridge_timeout();

        Rc::new(move |page: &Page, event: &mut ClickEvent| {
            event.prevent_default();
            event.stop_propagation();
            tracing::debug!("Click intercepted, opening: {}", url);

            let open = open_with_fallback(bridge.clone(), page.window(), url.clone(), timeout);
            page.spawn(async move {
                open.await;
            });
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::document::ClickOutcome;

    fn search_page(body: &str) -> Page {
        Page::from_html(
            &format!("<html><body>{}</body></html>", body),
            Url::parse("https://www.google.com/search?q=tower").unwrap(),
        )
    }

    fn rewriter() -> LinkRewriter {
        LinkRewriter::new(Rc::new(NavioConfig::default()), None)
    }

    #[test]
    fn test_relative_link_is_resolved_and_rewritten() {
        let page = search_page("<a href=\"/maps/place/Eiffel+Tower/@48.8584,2.2945,17z\">x</a>");
        let rewriter = rewriter();

        assert_eq!(rewriter.scan_and_rewrite(&page), 1);

        let anchor = page.anchors().remove(0);
        assert_eq!(
            get_node_attr(&anchor, "href").as_deref(),
            Some("https://maps.apple.com/?ll=48.8584,2.2945&q=Eiffel%20Tower")
        );
        assert_eq!(get_node_attr(&anchor, "target").as_deref(), Some("_self"));
        assert_eq!(page.listener_count(&anchor), 1);
        assert!(rewriter.scanner().is_processed(&anchor));
    }

    #[test]
    fn test_relative_link_honours_base_element() {
        let page = Page::from_html(
            "<html><head><base href=\"https://www.google.com/\"></head>\
             <body><a href=\"/maps/place/Louvre\">x</a></body></html>",
            Url::parse("about:srcdoc").unwrap(),
        );

        assert_eq!(rewriter().scan_and_rewrite(&page), 1);
        assert_eq!(
            get_node_attr(&page.anchors()[0], "href").as_deref(),
            Some("https://maps.apple.com/?q=Louvre")
        );
    }

    #[test]
    fn test_second_pass_is_a_no_op() {
        let page = search_page("<a href=\"https://maps.google.com/?q=Louvre\">x</a>");
        let rewriter = rewriter();

        assert_eq!(rewriter.scan_and_rewrite(&page), 1);
        let html = page.to_html().unwrap();

        assert_eq!(rewriter.scan_and_rewrite(&page), 0);
        assert_eq!(page.to_html().unwrap(), html);
        assert_eq!(page.listener_count(&page.anchors()[0]), 1);
    }

    #[test]
    fn test_untranslatable_anchor_is_left_alone() {
        let page = search_page("<a href=\"https://www.google.com/maps?hl=en\">x</a>");
        let rewriter = rewriter();
        let base = page.base_url();
        let anchor = page.anchors().remove(0);

        let record = rewriter.rewrite_anchor(&page, &base, anchor.clone());
        assert!(!record.is_rewritten());
        assert_eq!(record.original_href, "https://www.google.com/maps?hl=en");
        assert_eq!(get_node_attr(&anchor, "target"), None);
        assert_eq!(page.listener_count(&anchor), 0);
        assert!(!rewriter.scanner().is_processed(&anchor));
        assert_eq!(page.pending_mutations(), 0);
    }

    #[tokio::test]
    async fn test_click_without_bridge_navigates_to_translation() {
        let page = search_page("<a href=\"https://maps.google.com/?q=Louvre\"><b>Louvre</b></a>");
        rewriter().scan_and_rewrite(&page);
        let bold = crate::parsers::html::find_nodes(page.document(), &["b"]).remove(0);

        assert_eq!(page.click(&bold), ClickOutcome::Intercepted);
        assert!(page.window().navigations().is_empty());

        page.run_until(tokio::task::yield_now()).await;
        assert_eq!(page.window().href(), "https://maps.apple.com/?q=Louvre");
    }
}
