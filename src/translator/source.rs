//! 源链接解析
//!
//! 把 Google Maps 链接解析为只读视图：scheme、host、path 以及查询参数。

use std::collections::HashMap;

use url::Url;

/// 已解析的源链接
///
/// 同名查询参数只保留第一次出现的值，与浏览器 `URLSearchParams::get` 一致。
#[derive(Debug, Clone)]
pub struct SourceUrl {
    url: Url,
    params: HashMap<String, String>,
}

impl SourceUrl {
    /// 解析绝对 URL，相对地址或格式错误的输入返回错误
    pub fn parse(raw: &str) -> Result<Self, url::ParseError> {
        let url = Url::parse(raw)?;

        let mut params = HashMap::new();
        for (key, value) in url.query_pairs() {
            params
                .entry(key.into_owned())
                .or_insert_with(|| value.into_owned());
        }

        Ok(SourceUrl { url, params })
    }

    /// 序列化后的完整链接
    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    pub fn scheme(&self) -> &str {
        self.url.scheme()
    }

    pub fn host(&self) -> Option<&str> {
        self.url.host_str()
    }

    /// 仍保持百分号编码的路径
    pub fn path(&self) -> &str {
        self.url.path()
    }

    /// 查询参数原值，参数存在但为空时返回 `Some("")`
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// 按顺序取第一个非空参数，全部缺失或为空时返回空字符串
    pub fn first_non_empty(&self, keys: &[&str]) -> String {
        keys.iter()
            .filter_map(|key| self.param(key))
            .find(|value| !value.is_empty())
            .unwrap_or_default()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rejects_relative_input() {
        assert!(SourceUrl::parse("/maps/place/Somewhere").is_err());
        assert!(SourceUrl::parse("").is_err());
    }

    #[test]
    fn test_first_occurrence_wins() {
        let source = SourceUrl::parse("https://www.google.com/maps?q=first&q=second").unwrap();
        assert_eq!(source.param("q"), Some("first"));
    }

    #[test]
    fn test_first_non_empty_falls_through_empty_values() {
        let source = SourceUrl::parse("https://www.google.com/maps?q=&query=Louvre").unwrap();
        assert_eq!(source.first_non_empty(&["q", "query"]), "Louvre");
        assert_eq!(source.first_non_empty(&["destination", "daddr"]), "");
    }

    #[test]
    fn test_form_encoding_is_decoded() {
        let source =
            SourceUrl::parse("https://maps.google.com/?origin=Current+Location&q=Caf%C3%A9")
                .unwrap();
        assert_eq!(source.param("origin"), Some("Current Location"));
        assert_eq!(source.param("q"), Some("Café"));
        assert_eq!(source.host(), Some("maps.google.com"));
        assert_eq!(source.scheme(), "https");
    }
}
