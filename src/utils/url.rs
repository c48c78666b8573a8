pub use url::Url;

use crate::error::{NavioError, NavioResult};

/// 以 `from` 为基准解析 `to`，绝对地址原样返回
pub fn resolve_url(from: &Url, to: &str) -> Result<Url, url::ParseError> {
    from.join(to.trim())
}

/// 解析绝对 URL，失败时带上原始输入
pub fn parse_absolute_url(input: &str) -> NavioResult<Url> {
    Url::parse(input.trim()).map_err(|e| NavioError::invalid_url(input, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_relative_and_absolute() {
        let base = Url::parse("https://www.google.com/search?q=pizza").unwrap();

        assert_eq!(
            resolve_url(&base, "/maps/place/Joe's+Pizza").unwrap().as_str(),
            "https://www.google.com/maps/place/Joe's+Pizza"
        );
        assert_eq!(
            resolve_url(&base, "https://maps.google.com/?q=x").unwrap().as_str(),
            "https://maps.google.com/?q=x"
        );
        assert_eq!(
            resolve_url(&base, "//maps.google.de/maps?q=x").unwrap().as_str(),
            "https://maps.google.de/maps?q=x"
        );
    }

    #[test]
    fn test_parse_absolute_url_error_keeps_input() {
        let error = parse_absolute_url("www.google.com").unwrap_err();
        assert!(error.to_string().contains("www.google.com"));
    }
}
