//! 配置模块
//!
//! 页面流水线的全部可调项都集中在不可变的 [`NavioConfig`] 中，
//! 在入口处构造一次后传入各组件。

pub mod manager;

pub use manager::{ConfigManager, NavioConfig};

/// 配置常量
pub mod constants {
    use std::time::Duration;

    /// Google Maps 页面上回退跳转前的等待时间
    pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(500);
    /// 等待原生应用应答的时间
    pub const DEFAULT_BRIDGE_TIMEOUT: Duration = Duration::from_millis(2_000);
    pub const MAX_SETTLE_DELAY: Duration = Duration::from_secs(10);

    pub const CONFIG_PATHS: &[&str] = &[
        "navio.toml",
        ".navio.toml",
        "navio.json",
        "~/.config/navio/navio.toml",
    ];
}

/// 便利函数
pub fn config_file_exists() -> bool {
    constants::CONFIG_PATHS
        .iter()
        .any(|path| std::path::Path::new(shellexpand::tilde(path).as_ref()).exists())
}

/// 加载配置，失败时记录警告并使用默认值
pub fn load_config() -> NavioConfig {
    match ConfigManager::new() {
        Ok(manager) => manager.get_config().clone(),
        Err(e) => {
            tracing::warn!("配置加载失败，使用默认配置: {}", e);
            NavioConfig::default()
        }
    }
}
