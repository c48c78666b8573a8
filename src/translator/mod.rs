//! # URL 翻译模块
//!
//! 把 Google Maps 链接转换为等价的 Apple Maps 链接。翻译是纯函数：
//! 同样的输入总是得到同样的输出，不访问网络，也不会 panic。
//!
//! # 模块组织
//!
//! - `source` - 源链接解析与查询参数视图
//! - `path` - `/maps/place/`、`/maps/dir/`、`/maps/search/` 路径模式
//! - `target` - Apple Maps 链接构建与参数编码
//!
//! # 翻译顺序
//!
//! 1. 解析绝对 URL，失败即放弃
//! 2. 搜索词取自 `q` 或 `query`
//! 3. 终点取自 `destination` 或 `daddr`，起点取自 `origin` 或 `saddr`
//! 4. 搜索词为空时尝试地点路径
//! 5. 终点为空时尝试路线路径
//! 6. 搜索词仍为空时尝试搜索路径
//! 7. 有起点或终点时生成路线链接
//! 8. 否则依次尝试坐标、搜索词和 `query` 参数

pub mod path;
pub mod source;
pub mod target;

use thiserror::Error;

pub use path::{decode_component, RoutePath};
pub use source::SourceUrl;
pub use target::{encode_component, is_current_location, Coordinates, MapsTarget, TARGET_BASE_URL};

/// 翻译内部的失败原因
///
/// 不会越过 [`translate`]：公开接口只返回 `None`。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranslateError {
    #[error("not an absolute URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("malformed percent-encoding in '{0}'")]
    MalformedEscape(String),
}

/// 翻译 Google Maps 链接
///
/// 返回 Apple Maps 链接；输入无法解析或不含任何可识别的参数和路径时返回 `None`。
///
/// # Examples
///
/// ```
/// use navio::translator::translate;
///
/// assert_eq!(
///     translate("https://www.google.com/maps?q=Eiffel+Tower").as_deref(),
///     Some("https://maps.apple.com/?q=Eiffel%20Tower")
/// );
/// assert_eq!(translate("not a url"), None);
/// ```
pub fn translate(url: &str) -> Option<String> {
    match try_translate(url) {
        Ok(Some(target)) => Some(target.to_string()),
        Ok(None) => {
            tracing::debug!("Could not parse URL: {}", url);
            None
        }
        Err(e) => {
            tracing::debug!("Could not translate {}: {}", url, e);
            None
        }
    }
}

/// 翻译并返回结构化结果，便于检查分支
pub fn try_translate(url: &str) -> Result<Option<MapsTarget>, TranslateError> {
    let source = SourceUrl::parse(url)?;

    let mut query = source.first_non_empty(&["q", "query"]);
    let mut destination = source.first_non_empty(&["destination", "daddr"]);
    let mut origin = source.first_non_empty(&["origin", "saddr"]);

    if query.is_empty() {
        if let Some(name) = path::place_name(source.path())? {
            query = name;
        }
    }

    if destination.is_empty() {
        if let Some(route) = path::route(source.path())? {
            if let Some(route_origin) = route.origin {
                origin = route_origin;
            }
            destination = route.destination;
        }
    }

    if query.is_empty() {
        if let Some(term) = path::search_term(source.path())? {
            query = term;
        }
    }

    if !destination.is_empty() || !origin.is_empty() {
        return Ok(Some(MapsTarget::directions(origin, destination, query)));
    }

    let query = (!query.is_empty()).then_some(query);

    if let Some(coordinates) = Coordinates::find(source.as_str()) {
        return Ok(Some(MapsTarget::Place {
            coordinates: Some(coordinates),
            query,
        }));
    }

    if query.is_some() {
        return Ok(Some(MapsTarget::Place {
            coordinates: None,
            query,
        }));
    }

    // 参数存在但为空时仍然生成搜索链接
    if let Some(raw_query) = source.param("query") {
        return Ok(Some(MapsTarget::Place {
            coordinates: None,
            query: Some(raw_query.to_string()),
        }));
    }

    Ok(None)
}
