//! 桥接消息格式

use serde::{Deserialize, Serialize};

use crate::error::NavioResult;

/// 请求原生端打开地图的动作名
pub const OPEN_MAPS_ACTION: &str = "openAppleMaps";

/// 发往原生端的请求
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeRequest {
    pub action: String,
    pub url: String,
}

impl BridgeRequest {
    pub fn open_maps(url: impl Into<String>) -> Self {
        Self {
            action: OPEN_MAPS_ACTION.to_string(),
            url: url.into(),
        }
    }

    pub fn is_open_maps(&self) -> bool {
        self.action == OPEN_MAPS_ACTION
    }

    pub fn to_json(&self) -> NavioResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> NavioResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// 原生端的应答
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeResponse {
    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// 原生端没有打开地址，调用方需要自行跳转
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub delegated: bool,
}

impl BridgeResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn delegated(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            delegated: true,
            ..Self::default()
        }
    }

    /// 原生端处理失败
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            ..Self::default()
        }
    }

    /// 中继与原生端之间的传输失败
    pub fn transport_failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Self::default()
        }
    }

    /// 地址是否已经由原生端打开
    pub fn opened(&self) -> bool {
        self.success && !self.delegated
    }

    /// 失败原因，优先取 `error`
    pub fn reason(&self) -> String {
        self.error
            .clone()
            .or_else(|| self.message.clone())
            .unwrap_or_else(|| "no reason given".to_string())
    }
}
