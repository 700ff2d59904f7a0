use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::parser::matcher;
use crate::{JhttpError, Result};

/// `.http` 文件中允许出现的请求方法（大小写敏感）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
    Trace,
}

impl FromStr for Method {
    type Err = JhttpError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "DELETE" => Ok(Method::Delete),
            "PATCH" => Ok(Method::Patch),
            "HEAD" => Ok(Method::Head),
            "OPTIONS" => Ok(Method::Options),
            "TRACE" => Ok(Method::Trace),
            _ => Err(JhttpError::InvalidMethod(s.to_string())),
        }
    }
}

impl Method {
    pub fn parse(s: &str) -> Result<Self> {
        s.parse()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Patch => "PATCH",
            Method::Head => "HEAD",
            Method::Options => "OPTIONS",
            Method::Trace => "TRACE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 校验相对引用时使用的占位 base
static RELATIVE_BASE: Lazy<url::Url> =
    Lazy::new(|| url::Url::parse("http://localhost/").expect("static base URL is valid"));

/// 请求行中的 URL（尚未做变量替换）
///
/// 保存源文本，同时记录它的结构：
/// - 绝对 URL（`https://api.example.com/users`）解析为 [`url::Url`]
/// - 相对引用（`{{host}}/users`）只校验结构，不保存解析结果
/// - 含有 `{{name}}` 且在替换前无法判断结构的模板（`http://{{host}}:{{port}}/`）
///   原样保留，替换后再校验
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestUrl {
    raw: String,
    parsed: Option<url::Url>,
}

impl RequestUrl {
    pub fn parse(s: &str) -> std::result::Result<Self, url::ParseError> {
        let input = s.trim();

        let parsed = match url::Url::parse(input) {
            Ok(url) => Some(url),
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                RELATIVE_BASE.join(input)?;
                None
            }
            Err(_) if matcher::has_variable_ref(input) => None,
            Err(e) => return Err(e),
        };

        Ok(Self {
            raw: input.to_string(),
            parsed,
        })
    }

    /// URL 的字符串形式
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// 绝对 URL 的结构化形式；相对引用和模板返回 `None`
    pub fn as_url(&self) -> Option<&url::Url> {
        self.parsed.as_ref()
    }

    pub fn is_absolute(&self) -> bool {
        self.parsed.is_some()
    }
}

impl fmt::Display for RequestUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Status(u16);
impl Status {
    pub fn new(code: u16) -> Result<Self> {
        if (100..1000).contains(&code) {
            Ok(Self(code))
        } else {
            Err(JhttpError::Other(format!(
                "Invalid HTTP status code: {}",
                code
            )))
        }
    }

    pub fn code(&self) -> u16 {
        self.0
    }

    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.0)
    }

    pub fn is_redirect(&self) -> bool {
        (300..=399).contains(&self.0)
    }

    pub fn is_client_error(&self) -> bool {
        (400..=499).contains(&self.0)
    }

    pub fn is_server_error(&self) -> bool {
        (500..=599).contains(&self.0)
    }

    pub fn reason_phrase(&self) -> &'static str {
        match self.0 {
            200 => "OK",
            201 => "Created",
            202 => "Accepted",
            204 => "No Content",
            301 => "Moved Permanently",
            302 => "Found",
            304 => "Not Modified",
            400 => "Bad Request",
            401 => "Unauthorized",
            403 => "Forbidden",
            404 => "Not Found",
            405 => "Method Not Allowed",
            409 => "Conflict",
            422 => "Unprocessable Entity",
            429 => "Too Many Requests",
            500 => "Internal Server Error",
            502 => "Bad Gateway",
            503 => "Service Unavailable",
            504 => "Gateway Timeout",
            _ => "Unknown",
        }
    }
}
