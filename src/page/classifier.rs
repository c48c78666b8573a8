//! 页面分类
//!
//! 根据当前地址的主机名和路径决定页面采用哪种处理策略。

use std::fmt;

use crate::utils::url::Url;

/// 相关站点的主机名片段
pub const RELATED_HOST_MARKER: &str = ".google.";
/// 搜索结果页路径
pub const SEARCH_RESULTS_PATH: &str = "/search";
/// 地图应用页面路径前缀
pub const MAPS_PATH_PREFIX: &str = "/maps";

/// 页面类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageContext {
    /// 搜索结果页，扫描并改写其中的地图链接
    SearchResultsPage,
    /// 地图应用本身，等待页面稳定后整体跳转
    ProviderNativePage,
    /// 相关站点的其他页面，与搜索结果页一样扫描并监听
    OtherRelatedDomain,
    /// 无关站点
    Unrelated,
}

/// 页面处理策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    ScanAndObserve,
    Redirect,
    Idle,
}

impl PageContext {
    pub fn strategy(self) -> Strategy {
        match self {
            PageContext::SearchResultsPage | PageContext::OtherRelatedDomain => {
                Strategy::ScanAndObserve
            }
            PageContext::ProviderNativePage => Strategy::Redirect,
            PageContext::Unrelated => Strategy::Idle,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PageContext::SearchResultsPage => "search-results",
            PageContext::ProviderNativePage => "maps",
            PageContext::OtherRelatedDomain => "related",
            PageContext::Unrelated => "unrelated",
        }
    }
}

impl fmt::Display for PageContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 按主机名和路径分类
///
/// 路径必须与 `/search` 完全相等；`/maps` 前缀匹配，`/mapsfoo` 也算在内。
pub fn classify(host: &str, path: &str) -> PageContext {
    if !host.contains(RELATED_HOST_MARKER) {
        return PageContext::Unrelated;
    }

    if path == SEARCH_RESULTS_PATH {
        PageContext::SearchResultsPage
    } else if path.starts_with(MAPS_PATH_PREFIX) {
        PageContext::ProviderNativePage
    } else {
        PageContext::OtherRelatedDomain
    }
}

pub fn classify_url(url: &Url) -> PageContext {
    classify(url.host_str().unwrap_or_default(), url.path())
}
