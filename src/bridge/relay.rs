//! 页面与原生处理器之间的中继
//!
//! 中继收到页面的请求后立即返回 [`RelayReply::Pending`]，在后台把请求转给原生
//! 处理器，拿到应答后再通过 `oneshot` 通道送回页面。

use std::rc::Rc;

use tokio::sync::{mpsc, oneshot};

use super::message::{BridgeRequest, BridgeResponse};
use super::{BridgeFuture, NativeBridge};
use crate::error::BridgeError;

/// 投递给原生处理器的消息
#[derive(Debug)]
pub struct NativeEnvelope {
    pub message: serde_json::Value,
    pub reply: oneshot::Sender<BridgeResponse>,
}

/// 中继对一次请求的处理结果
#[derive(Debug)]
pub enum RelayReply {
    /// 不认识的动作或缺少地址，不会有应答
    Ignored,
    /// 应答将异步到达
    Pending(oneshot::Receiver<BridgeResponse>),
}

#[derive(Debug, Clone)]
pub struct Relay {
    native: mpsc::Sender<NativeEnvelope>,
}

impl Relay {
    pub fn new(native: mpsc::Sender<NativeEnvelope>) -> Self {
        Self { native }
    }

    /// 创建中继以及原生处理器一端的接收者
    pub fn channel(buffer: usize) -> (Self, mpsc::Receiver<NativeEnvelope>) {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        (Self::new(tx), rx)
    }

    /// 处理页面发来的消息
    ///
    /// 必须在 tokio 运行时内调用。
    pub fn on_message(&self, request: BridgeRequest) -> RelayReply {
        if !request.is_open_maps() || request.url.is_empty() {
            tracing::debug!("Relay ignoring action '{}'", request.action);
            return RelayReply::Ignored;
        }

        let (tx, rx) = oneshot::channel();
        let native = self.native.clone();

        tokio::spawn(async move {
            let response = forward(native, request).await;
            // 页面可能已经离开
            let _ = tx.send(response);
        });

        RelayReply::Pending(rx)
    }
}

async fn forward(native: mpsc::Sender<NativeEnvelope>, request: BridgeRequest) -> BridgeResponse {
    let message = match serde_json::to_value(&request) {
        Ok(message) => message,
        Err(e) => return BridgeResponse::transport_failure(e.to_string()),
    };

    let (reply, response) = oneshot::channel();
    if native.send(NativeEnvelope { message, reply }).await.is_err() {
        tracing::error!("Error sending native message: handler unavailable");
        return BridgeResponse::transport_failure("native handler unavailable");
    }

    match response.await {
        Ok(response) => {
            tracing::debug!("Native response: {:?}", response);
            response
        }
        Err(_) => {
            tracing::error!("Error sending native message: handler dropped the request");
            BridgeResponse::transport_failure("native handler dropped the request")
        }
    }
}

/// 通过 [`Relay`] 实现的页面侧桥接
#[derive(Debug, Clone)]
pub struct RelayBridge {
    relay: Relay,
}

impl RelayBridge {
    pub fn new(relay: Relay) -> Rc<Self> {
        Rc::new(Self { relay })
    }
}

impl NativeBridge for RelayBridge {
    fn send_native_message(&self, request: BridgeRequest) -> BridgeFuture {
        if request.is_open_maps() && request.url.trim().is_empty() {
            return Box::pin(async {
                Err(BridgeError::InvalidMessage("missing url".to_string()))
            });
        }

        let reply = self.relay.on_message(request);

        Box::pin(async move {
            match reply {
                RelayReply::Ignored => Err(BridgeError::Rejected(
                    "relay ignored the request".to_string(),
                )),
                RelayReply::Pending(response) => response
                    .await
                    .map_err(|_| BridgeError::Transport("relay dropped the reply".to_string())),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_relay_forwards_handler_reply() {
        let (relay, mut inbox) = Relay::channel(4);

        tokio::spawn(async move {
            while let Some(envelope) = inbox.recv().await {
                assert_eq!(envelope.message["action"], "openAppleMaps");
                let _ = envelope.reply.send(BridgeResponse::ok("opened"));
            }
        });

        let RelayReply::Pending(reply) = relay.on_message(BridgeRequest::open_maps("https://maps.apple.com/?q=x")) else {
            panic!("expected a pending reply");
        };
        assert_eq!(reply.await.unwrap(), BridgeResponse::ok("opened"));
    }

    #[tokio::test]
    async fn test_relay_ignores_unknown_action() {
        let (relay, _inbox) = Relay::channel(1);
        let request = BridgeRequest {
            action: "ping".to_string(),
            url: String::new(),
        };

        assert!(matches!(relay.on_message(request), RelayReply::Ignored));
    }

    #[tokio::test]
    async fn test_relay_reports_missing_handler() {
        let (relay, inbox) = Relay::channel(1);
        drop(inbox);

        let RelayReply::Pending(reply) = relay.on_message(BridgeRequest::open_maps("https://maps.apple.com/?q=x")) else {
            panic!("expected a pending reply");
        };
        let response = reply.await.unwrap();
        assert!(!response.success);
        assert_eq!(response.error.as_deref(), Some("native handler unavailable"));
    }

    #[tokio::test]
    async fn test_relay_bridge_maps_ignored_to_rejection() {
        let (relay, _inbox) = Relay::channel(1);
        let bridge = RelayBridge::new(relay);
        let request = BridgeRequest {
            action: "ping".to_string(),
            url: String::new(),
        };

        let result = bridge.send_native_message(request).await;
        assert!(matches!(result, Err(BridgeError::Rejected(_))));
    }

    #[tokio::test]
    async fn test_relay_ignores_request_without_url() {
        let (relay, mut inbox) = Relay::channel(1);

        assert!(matches!(
            relay.on_message(BridgeRequest::open_maps("")),
            RelayReply::Ignored
        ));
        assert!(inbox.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_relay_bridge_rejects_missing_url_as_invalid() {
        let (relay, mut inbox) = Relay::channel(1);
        let bridge = RelayBridge::new(relay);

        let result = bridge
            .send_native_message(BridgeRequest::open_maps("  "))
            .await;

        assert!(
            matches!(&result, Err(BridgeError::InvalidMessage(reason)) if reason == "missing url")
        );
        assert!(inbox.try_recv().is_err());
    }
}
