//! Apple Maps 目标链接构建

use std::fmt;
use std::sync::LazyLock;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::Regex;

/// 目标链接前缀，后面跟 `&` 连接的参数
pub const TARGET_BASE_URL: &str = "https://maps.apple.com/?";

/// 与 `encodeURIComponent` 相同的保留集合：除字母数字和 `-_.!~*'()` 外全部编码
const COMPONENT_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// 表示"当前位置"的起点值，不会写进 `saddr`
const CURRENT_LOCATION_SENTINELS: &[&str] = &["current location", "my location"];

static COORDINATES_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"@(-?[0-9]+\.[0-9]+),(-?[0-9]+\.[0-9]+)").expect("coordinate pattern is valid")
});

/// 编码单个参数值
pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT_ENCODE_SET).to_string()
}

/// 起点是否表示"当前位置"
///
/// 同时接受 `+` 和空格两种写法，忽略大小写。
pub fn is_current_location(origin: &str) -> bool {
    let normalized = origin.replace('+', " ").trim().to_lowercase();
    CURRENT_LOCATION_SENTINELS.contains(&normalized.as_str())
}

/// 十进制经纬度，保留原文以免改变精度
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coordinates {
    pub lat: String,
    pub lon: String,
}

impl Coordinates {
    /// 查找第一个 `@<纬度>,<经度>` 组合，后面可以跟缩放等字段
    pub fn find(haystack: &str) -> Option<Self> {
        let captures = COORDINATES_RE.captures(haystack)?;
        Some(Coordinates {
            lat: captures[1].to_string(),
            lon: captures[2].to_string(),
        })
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lon)
    }
}

/// 翻译得到的 Apple Maps 请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapsTarget {
    /// 路线：`saddr` 在前，`daddr` 在后
    Directions {
        origin: Option<String>,
        destination: Option<String>,
    },
    /// 地点或搜索
    Place {
        coordinates: Option<Coordinates>,
        query: Option<String>,
    },
}

impl MapsTarget {
    /// 构建路线请求
    ///
    /// 起点为空或为"当前位置"时省略；终点为空时退回使用搜索词。
    pub fn directions(origin: String, destination: String, query: String) -> Self {
        let origin = (!origin.is_empty() && !is_current_location(&origin)).then_some(origin);
        let destination = if !destination.is_empty() {
            Some(destination)
        } else if !query.is_empty() {
            Some(query)
        } else {
            None
        };

        MapsTarget::Directions {
            origin,
            destination,
        }
    }

    pub fn is_directions(&self) -> bool {
        matches!(self, MapsTarget::Directions { .. })
    }

    fn params(&self) -> Vec<String> {
        let mut params = Vec::new();

        match self {
            MapsTarget::Directions {
                origin,
                destination,
            } => {
                if let Some(origin) = origin {
                    params.push(format!("saddr={}", encode_component(origin)));
                }
                if let Some(destination) = destination {
                    params.push(format!("daddr={}", encode_component(destination)));
                }
            }
            MapsTarget::Place { coordinates, query } => {
                if let Some(coordinates) = coordinates {
                    params.push(format!("ll={}", coordinates));
                }
                if let Some(query) = query {
                    params.push(format!("q={}", encode_component(query)));
                }
            }
        }

        params
    }
}

impl fmt::Display for MapsTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", TARGET_BASE_URL, self.params().join("&"))
    }
}
