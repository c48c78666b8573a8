//! 地图页面的回退跳转
//!
//! 在 Google Maps 页面上等待页面稳定（客户端路由会改写地址），然后把当前地址
//! 转换后整体跳转过去。

use std::rc::Rc;
use std::time::Duration;

use super::document::{Page, Window};
use crate::bridge::{open_with_fallback, NativeBridge, OpenOutcome};
use crate::config::NavioConfig;
use crate::translator::translate;

/// 回退跳转的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectOutcome {
    /// 当前地址无法转换，什么也不做
    Untranslatable,
    Opened(OpenOutcome),
}

pub struct FallbackRedirector {
    config: Rc<NavioConfig>,
    bridge: Option<Rc<dyn NativeBridge>>,
}

impl FallbackRedirector {
    pub fn new(config: Rc<NavioConfig>, bridge: Option<Rc<dyn NativeBridge>>) -> Self {
        Self { config, bridge }
    }

    /// 在页面任务中排入跳转
    pub fn schedule(&self, page: &Page) {
        let redirect = redirect_after(
            self.config.settle_delay(),
            self.config.bridge_timeout(),
            self.bridge.clone(),
            page.window(),
        );
        page.spawn(async move {
            redirect.await;
        });
        tracing::debug!("Fallback redirect scheduled in {:?}", self.config.settle_delay());
    }
}

/// 等待 `settle_delay` 后读取窗口地址并跳转
pub async fn redirect_after(
    settle_delay: Duration,
    bridge_timeout: Duration,
    bridge: Option<Rc<dyn NativeBridge>>,
    window: Rc<Window>,
) -> RedirectOutcome {
    tokio::time::sleep(settle_delay).await;

    let current = window.href();
    match translate(&current) {
        Some(target) => {
            tracing::info!("Redirecting to Apple Maps: {}", target);
            RedirectOutcome::Opened(open_with_fallback(bridge, window, target, bridge_timeout).await)
        }
        None => {
            tracing::debug!("Could not convert Google Maps URL: {}", current);
            RedirectOutcome::Untranslatable
        }
    }
}
