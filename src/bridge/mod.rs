//! # 原生桥接
//!
//! 页面把转换后的地址交给原生应用打开；桥接缺失、拒绝、超时或只返回
//! “委托”应答时，改为在页面内直接跳转。
//!
//! - `message` - 请求与应答的 JSON 格式
//! - `relay` - 页面与原生处理器之间的中继
//! - `handler` - 原生端的消息处理器

pub mod handler;
pub mod message;
pub mod relay;

use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::time::Duration;

pub use handler::{CommandOpener, NativeHandler, Platform, UrlOpener};
pub use message::{BridgeRequest, BridgeResponse, OPEN_MAPS_ACTION};
pub use relay::{NativeEnvelope, Relay, RelayBridge, RelayReply};

use crate::error::BridgeError;
use crate::page::Window;

pub type BridgeFuture = Pin<Box<dyn Future<Output = Result<BridgeResponse, BridgeError>>>>;

/// 页面一侧看到的原生桥接
pub trait NativeBridge {
    fn send_native_message(&self, request: BridgeRequest) -> BridgeFuture;
}

/// 打开地址的最终方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenOutcome {
    OpenedNatively,
    Navigated,
}

/// 先尝试原生桥接，失败时在页面内直接跳转
///
/// 只尝试一次，不重试。
pub async fn open_with_fallback(
    bridge: Option<Rc<dyn NativeBridge>>,
    window: Rc<Window>,
    url: String,
    timeout: Duration,
) -> OpenOutcome {
    let result = match bridge {
        Some(bridge) => {
            let request = BridgeRequest::open_maps(url.clone());
            match tokio::time::timeout(timeout, bridge.send_native_message(request)).await {
                Ok(result) => result,
                Err(_) => Err(BridgeError::Timeout(timeout)),
            }
        }
        None => Err(BridgeError::Unavailable),
    };

    match result {
        Ok(response) if response.opened() => {
            tracing::debug!("Opened in Apple Maps app: {}", url);
            return OpenOutcome::OpenedNatively;
        }
        Ok(response) if response.delegated => {
            tracing::debug!("Native handler delegated opening, navigating directly");
        }
        Ok(response) => {
            tracing::warn!("Native handler failed ({}), navigating directly", response.reason());
        }
        Err(BridgeError::Unavailable) => {
            tracing::debug!("No native bridge, navigating directly");
        }
        Err(e) => {
            tracing::warn!("{}, navigating directly", e);
        }
    }

    if let Err(e) = window.navigate(&url) {
        tracing::error!("Cannot navigate to {}: {}", url, e);
    }
    OpenOutcome::Navigated
}
