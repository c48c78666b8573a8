//! 简化的配置管理器
//!
//! 提供统一的配置接口，支持文件配置、环境变量和默认值

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::constants;
use crate::error::{NavioError, NavioResult};

/// 页面流水线配置
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct NavioConfig {
    /// 以 info 级别记录每一个被转换的链接
    pub debug: bool,

    /// Google Maps 页面上回退跳转前的等待时间（毫秒）
    pub settle_delay_ms: u64,

    /// 是否先尝试原生桥接
    pub bridge_enabled: bool,

    /// 等待原生应答的时间（毫秒）
    pub bridge_timeout_ms: u64,
}

impl Default for NavioConfig {
    fn default() -> Self {
        Self {
            debug: false,
            settle_delay_ms: constants::DEFAULT_SETTLE_DELAY.as_millis() as u64,
            bridge_enabled: true,
            bridge_timeout_ms: constants::DEFAULT_BRIDGE_TIMEOUT.as_millis() as u64,
        }
    }
}

impl NavioConfig {
    /// 验证配置
    pub fn validate(&self) -> NavioResult<()> {
        if self.bridge_timeout_ms == 0 {
            return Err(NavioError::config("bridge_timeout_ms must be greater than 0"));
        }

        if self.settle_delay() > constants::MAX_SETTLE_DELAY {
            return Err(NavioError::config(format!(
                "settle_delay_ms must not exceed {}",
                constants::MAX_SETTLE_DELAY.as_millis()
            )));
        }

        Ok(())
    }

    /// 应用环境变量覆盖
    ///
    /// 只覆盖显式设置的变量；值无效时记录警告并保留原值。
    pub fn apply_env_overrides(&mut self) {
        use crate::env::{pipeline, EnvVar};

        match pipeline::Debug::get_set() {
            Some(Ok(debug)) => self.debug = debug,
            Some(Err(e)) => tracing::warn!("{}", e),
            None => {}
        }

        match pipeline::SettleDelay::get_set() {
            Some(Ok(delay)) => self.settle_delay_ms = delay.as_millis() as u64,
            Some(Err(e)) => tracing::warn!("{}", e),
            None => {}
        }

        match pipeline::BridgeEnabled::get_set() {
            Some(Ok(enabled)) => self.bridge_enabled = enabled,
            Some(Err(e)) => tracing::warn!("{}", e),
            None => {}
        }

        match pipeline::BridgeTimeout::get_set() {
            Some(Ok(timeout)) => self.bridge_timeout_ms = timeout.as_millis() as u64,
            Some(Err(e)) => tracing::warn!("{}", e),
            None => {}
        }
    }

    /// 转换为Duration类型
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn bridge_timeout(&self) -> Duration {
        Duration::from_millis(self.bridge_timeout_ms)
    }
}

/// 简化的配置管理器
#[derive(Debug)]
pub struct ConfigManager {
    config: NavioConfig,
}

impl ConfigManager {
    /// 搜索默认位置的配置文件，再应用环境变量覆盖
    pub fn new() -> NavioResult<Self> {
        Self::load_dotenv();

        let mut config = Self::load_config()?;
        config.apply_env_overrides();
        config.validate()?;

        Ok(Self { config })
    }

    /// 只从指定文件加载，不读取环境变量
    pub fn from_file(path: &str) -> NavioResult<Self> {
        let config = Self::load_from_file(path)?;
        config.validate()?;

        Ok(Self { config })
    }

    /// 获取配置
    pub fn get_config(&self) -> &NavioConfig {
        &self.config
    }

    pub fn into_config(self) -> NavioConfig {
        self.config
    }

    /// 从文件加载配置
    fn load_config() -> NavioResult<NavioConfig> {
        use crate::env::{core, EnvVar};

        if let Some(path) = core::ConfigPath::get_set() {
            let path = path.map_err(|e| NavioError::config(e))?;
            tracing::info!("加载配置文件: {}", path);
            return Self::load_from_file(&path);
        }

        // 查找配置文件
        for path in constants::CONFIG_PATHS {
            let expanded_path = shellexpand::tilde(path);
            if Path::new(expanded_path.as_ref()).exists() {
                tracing::info!("加载配置文件: {}", expanded_path);
                return Self::load_from_file(&expanded_path);
            }
        }

        tracing::debug!("未找到配置文件，使用默认配置");
        Ok(NavioConfig::default())
    }

    /// 从指定文件加载配置
    fn load_from_file(path: &str) -> NavioResult<NavioConfig> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| NavioError::config(format!("failed to read {}: {}", path, e)))?;

        // 尝试TOML格式
        if path.ends_with(".toml") {
            Ok(toml::from_str(&content)?)
        } else {
            // 尝试JSON格式
            Ok(serde_json::from_str(&content)?)
        }
    }

    /// 加载 .env 文件
    fn load_dotenv() {
        let env_files = [".env.local", ".env"];

        for env_file in &env_files {
            if Path::new(env_file).exists() && dotenv::from_filename(env_file).is_ok() {
                tracing::info!("已加载环境变量文件: {}", env_file);
                break;
            }
        }
    }

    /// 生成示例配置文件
    pub fn generate_example_config(path: &str) -> NavioResult<()> {
        let config = NavioConfig::default();
        let content = toml::to_string_pretty(&config)?;

        std::fs::write(path, content)?;

        Ok(())
    }
}
