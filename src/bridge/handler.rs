//! 原生端消息处理器

use std::process::Command;

use tokio::sync::mpsc;

use super::message::{BridgeResponse, OPEN_MAPS_ACTION};
use super::relay::NativeEnvelope;
use crate::utils::url::Url;

/// 运行平台
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// 处理器可以直接打开地址
    Desktop,
    /// 处理器不允许打开地址，交还页面处理
    Mobile,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(any(target_os = "ios", target_os = "android")) {
            Platform::Mobile
        } else {
            Platform::Desktop
        }
    }
}

/// 打开地址的方式
pub trait UrlOpener {
    fn open(&self, url: &Url) -> bool;
}

/// 调用系统命令打开地址
#[derive(Debug, Clone)]
pub struct CommandOpener {
    program: String,
}

impl CommandOpener {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// 当前系统的默认打开命令
    pub fn system() -> Self {
        let program = if cfg!(target_os = "macos") {
            "open"
        } else if cfg!(target_os = "windows") {
            "explorer"
        } else {
            "xdg-open"
        };
        Self::new(program)
    }
}

impl UrlOpener for CommandOpener {
    /// 等待命令退出，退出码为 0 才算打开成功
    ///
    /// 系统打开命令把地址交给目标应用后立即退出。
    fn open(&self, url: &Url) -> bool {
        match Command::new(&self.program).arg(url.as_str()).status() {
            Ok(status) if status.success() => true,
            Ok(status) => {
                tracing::warn!("{} exited with {}", self.program, status);
                false
            }
            Err(e) => {
                tracing::error!("Failed to run {}: {}", self.program, e);
                false
            }
        }
    }
}

/// 原生端处理器
pub struct NativeHandler<O> {
    platform: Platform,
    opener: O,
}

impl<O: UrlOpener> NativeHandler<O> {
    pub fn new(platform: Platform, opener: O) -> Self {
        Self { platform, opener }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// 处理一条消息
    pub fn handle(&self, message: &serde_json::Value) -> BridgeResponse {
        let action = message.get("action").and_then(serde_json::Value::as_str);
        let url = message.get("url").and_then(serde_json::Value::as_str);

        let (Some(OPEN_MAPS_ACTION), Some(url)) = (action, url) else {
            tracing::warn!("Invalid message format: {}", message);
            return BridgeResponse::rejected("Invalid message format");
        };

        let url = match Url::parse(url) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("Invalid URL '{}': {}", url, e);
                return BridgeResponse::rejected("Invalid URL");
            }
        };

        match self.platform {
            Platform::Mobile => {
                tracing::info!("URL opening delegated to the page: {}", url);
                BridgeResponse::delegated("URL opening delegated to the page")
            }
            Platform::Desktop => {
                tracing::info!("Opening Apple Maps with URL: {}", url);
                if self.opener.open(&url) {
                    BridgeResponse::ok("Apple Maps opened successfully")
                } else {
                    BridgeResponse::rejected("Failed to open Apple Maps")
                }
            }
        }
    }

    /// 处理收件箱中的消息，直到所有中继都被丢弃
    pub async fn serve(self, mut inbox: mpsc::Receiver<NativeEnvelope>) {
        while let Some(envelope) = inbox.recv().await {
            let response = self.handle(&envelope.message);
            let _ = envelope.reply.send(response);
        }
        tracing::debug!("Native handler stopped");
    }
}
