//! 路径模式提取
//!
//! Google Maps 常把地点、路线和搜索词编码在路径里，例如
//! `/maps/place/<名称>/@<纬度>,<经度>,<缩放>z` 或 `/maps/dir/<起点>/<终点>`。

use percent_encoding::percent_decode_str;

use super::TranslateError;

/// 地点路径前缀
pub const PLACE_MARKER: &str = "/maps/place/";
/// 路线路径前缀
pub const DIRECTIONS_MARKER: &str = "/maps/dir/";
/// 搜索路径前缀
pub const SEARCH_MARKER: &str = "/maps/search/";

/// 从路径中提取的路线
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePath {
    /// 只有在路径至少有两段时才会给出起点（可能为空字符串）
    pub origin: Option<String>,
    pub destination: String,
}

/// 取出标记第一次出现之后、下一次出现之前的文本
///
/// 标记不存在或其后为空时返回 `None`。
fn after_marker<'a>(path: &'a str, marker: &str) -> Option<&'a str> {
    let mut parts = path.split(marker);
    parts.next()?;
    parts.next().filter(|part| !part.is_empty())
}

/// 先把 `+` 换成空格，再严格地进行百分号解码
///
/// 截断的转义序列或解码后不是合法 UTF-8 都视为错误。
pub fn decode_component(raw: &str) -> Result<String, TranslateError> {
    let spaced = raw.replace('+', " ");
    let bytes = spaced.as_bytes();

    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let valid = i + 2 < bytes.len()
                && bytes[i + 1].is_ascii_hexdigit()
                && bytes[i + 2].is_ascii_hexdigit();
            if !valid {
                return Err(TranslateError::MalformedEscape(raw.to_string()));
            }
            i += 3;
        } else {
            i += 1;
        }
    }

    percent_decode_str(&spaced)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|_| TranslateError::MalformedEscape(raw.to_string()))
}

/// `/maps/place/<名称>` 中的名称，截止到下一个 `/` 或坐标标记 `@`
pub fn place_name(path: &str) -> Result<Option<String>, TranslateError> {
    let Some(place) = after_marker(path, PLACE_MARKER) else {
        return Ok(None);
    };

    let segment = place.split('/').next().unwrap_or_default();
    let name = segment.split('@').next().unwrap_or_default();
    decode_component(name).map(Some)
}

/// `/maps/dir/<起点>/<终点>`，只有一段时当作终点
pub fn route(path: &str) -> Result<Option<RoutePath>, TranslateError> {
    let Some(directions) = after_marker(path, DIRECTIONS_MARKER) else {
        return Ok(None);
    };

    let parts: Vec<&str> = directions.split('/').collect();
    let route = match parts.as_slice() {
        [only] => RoutePath {
            origin: None,
            destination: decode_component(only)?,
        },
        [origin, destination, ..] => RoutePath {
            origin: Some(decode_component(origin)?),
            destination: decode_component(destination)?,
        },
        [] => return Ok(None),
    };

    Ok(Some(route))
}

/// `/maps/search/<搜索词>` 中的第一段
pub fn search_term(path: &str) -> Result<Option<String>, TranslateError> {
    let Some(search) = after_marker(path, SEARCH_MARKER) else {
        return Ok(None);
    };

    let term = search.split('/').next().unwrap_or_default();
    decode_component(term).map(Some)
}
