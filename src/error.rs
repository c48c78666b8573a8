//! 统一错误处理
//!
//! 提供结构化错误类型。页面内的流水线从不向上传播错误：
//! 翻译失败返回 `None`，桥接失败回退为页面内直接跳转。
//! 这里的错误类型用于桥接调用点和命令行工具。

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// 原生桥接错误
///
/// 所有变体在调用点都会触发直接跳转回退，不会展示给用户。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    /// 当前环境没有可用的桥接
    #[error("native bridge unavailable")]
    Unavailable,

    /// 在超时时间内没有收到应答
    #[error("native bridge timed out after {0:?}")]
    Timeout(Duration),

    /// 原生端拒绝了请求
    #[error("native bridge rejected request: {0}")]
    Rejected(String),

    /// 中继与原生端之间的通道断开
    #[error("bridge transport failed: {0}")]
    Transport(String),

    /// 消息格式无效
    #[error("invalid bridge message: {0}")]
    InvalidMessage(String),
}

/// 库与命令行层面的错误
#[derive(Error, Debug)]
pub enum NavioError {
    /// 配置错误
    #[error("configuration error: {0}")]
    Config(String),

    /// 读写文件失败
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// URL 无法解析
    #[error("invalid URL '{input}': {source}")]
    InvalidUrl {
        input: String,
        #[source]
        source: url::ParseError,
    },

    /// 序列化或反序列化失败
    #[error("serialization error: {0}")]
    Serialization(String),

    /// 桥接失败
    #[error(transparent)]
    Bridge(#[from] BridgeError),
}

impl NavioError {
    /// 创建 URL 解析错误
    pub fn invalid_url(input: &str, source: url::ParseError) -> Self {
        NavioError::InvalidUrl {
            input: input.to_string(),
            source,
        }
    }

    /// 获取错误类别
    pub fn category(&self) -> ErrorCategory {
        match self {
            NavioError::Config(_) => ErrorCategory::Configuration,
            NavioError::Io(_) => ErrorCategory::Io,
            NavioError::InvalidUrl { .. } => ErrorCategory::Input,
            NavioError::Serialization(_) => ErrorCategory::Serialization,
            NavioError::Bridge(_) => ErrorCategory::Bridge,
        }
    }

    /// 创建带上下文的配置错误
    pub fn config<T: fmt::Display>(msg: T) -> Self {
        NavioError::Config(msg.to_string())
    }
}

/// 错误类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Configuration,
    Io,
    Input,
    Serialization,
    Bridge,
}

impl From<serde_json::Error> for NavioError {
    fn from(error: serde_json::Error) -> Self {
        NavioError::Serialization(format!("JSON: {}", error))
    }
}

impl From<toml::de::Error> for NavioError {
    fn from(error: toml::de::Error) -> Self {
        NavioError::Config(format!("TOML: {}", error))
    }
}

impl From<toml::ser::Error> for NavioError {
    fn from(error: toml::ser::Error) -> Self {
        NavioError::Serialization(format!("TOML: {}", error))
    }
}

/// 错误结果类型别名
pub type NavioResult<T> = Result<T, NavioError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bridge_error_messages() {
        assert_eq!(
            BridgeError::Timeout(Duration::from_millis(10)).to_string(),
            "native bridge timed out after 10ms"
        );
        assert_eq!(
            BridgeError::InvalidMessage("missing url".to_string()).to_string(),
            "invalid bridge message: missing url"
        );
    }

    #[test]
    fn test_error_categories() {
        assert_eq!(
            NavioError::config("bad delay").category(),
            ErrorCategory::Configuration
        );
        assert_eq!(
            NavioError::from(BridgeError::Unavailable).category(),
            ErrorCategory::Bridge
        );

        let parse_error = url::Url::parse("not a url").unwrap_err();
        let error = NavioError::invalid_url("not a url", parse_error);
        assert_eq!(error.category(), ErrorCategory::Input);
        assert!(error.to_string().starts_with("invalid URL 'not a url'"));
    }

    #[test]
    fn test_bridge_error_display() {
        assert_eq!(
            BridgeError::Rejected("no handler".to_string()).to_string(),
            "native bridge rejected request: no handler"
        );
        assert_eq!(
            NavioError::from(BridgeError::Unavailable).to_string(),
            "native bridge unavailable"
        );
    }
}
