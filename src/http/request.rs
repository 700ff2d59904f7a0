use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::http::types::Method;
use crate::variable::ResolvedRequest;
use crate::{JhttpError, Result};

/// 可以直接交给 [`Client`](crate::http::Client) 发送的请求
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub url: url::Url,
    pub headers: HeaderMap,
    pub body: Option<String>,
}

impl Request {
    pub fn new(method: Method, url: url::Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// 追加请求头，同名请求头保留多条
    pub fn append_header(&mut self, key: &str, value: &str) -> Result<()> {
        let name = HeaderName::from_bytes(key.as_bytes())
            .map_err(|_| JhttpError::InvalidHeader(key.to_string()))?;
        let value = HeaderValue::from_str(value)
            .map_err(|_| JhttpError::InvalidHeader(format!("{}: {}", key, value)))?;
        self.headers.append(name, value);
        Ok(())
    }

    pub fn with_body(mut self, body: &str) -> Self {
        self.body = Some(body.to_owned());
        self
    }
}

impl TryFrom<&ResolvedRequest> for Request {
    type Error = JhttpError;

    fn try_from(resolved: &ResolvedRequest) -> Result<Self> {
        let url = resolved
            .url
            .as_url()
            .filter(|url| matches!(url.scheme(), "http" | "https"))
            .cloned()
            .ok_or_else(|| JhttpError::UnsupportedScheme(resolved.url.to_string()))?;

        let mut request = Request::new(resolved.method, url);
        for (key, value) in resolved.headers.iter() {
            request.append_header(key, value)?;
        }
        if !resolved.body.is_empty() {
            request = request.with_body(&resolved.body);
        }

        Ok(request)
    }
}
