use std::time::{Duration, Instant};

use tracing::debug;

use crate::Result;
use crate::http::request::Request;
use crate::http::response::Response;
use crate::http::types::Method;

/// 默认请求超时
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// 最多跟随的重定向次数
pub const MAX_REDIRECTS: usize = 5;

const USER_AGENT: &str = concat!("jhttp/", env!("CARGO_PKG_VERSION"));

#[derive(Clone)]
pub struct Client {
    inner: reqwest::Client,
}

impl Client {
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let inner = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { inner })
    }

    pub async fn execute(&self, request: Request) -> Result<Response> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
            Method::Patch => reqwest::Method::PATCH,
            Method::Head => reqwest::Method::HEAD,
            Method::Options => reqwest::Method::OPTIONS,
            Method::Trace => reqwest::Method::TRACE,
        };
        debug!(method = %method, url = %request.url, "sending request");

        let mut req = self.inner.request(method, request.url).headers(request.headers);
        if let Some(body) = request.body {
            req = req.body(body);
        }

        let start = Instant::now();
        let response = req.send().await?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();
        let duration = start.elapsed();

        Response::new(status, headers, body, duration)
    }
}

/// 把传输层错误归类成便于阅读的描述
pub fn describe_error(err: &reqwest::Error) -> String {
    let host = err
        .url()
        .and_then(|url| url.host_str())
        .unwrap_or("<unknown>")
        .to_string();

    if err.is_timeout() {
        "请求超时 - 服务器在规定时间内没有响应".to_string()
    } else if err.is_connect() {
        format!("连接失败 - 无法连接到主机 '{}': {}", host, root_cause(err))
    } else if err.is_redirect() {
        format!("重定向错误 - 超过最大重定向次数 ({})", MAX_REDIRECTS)
    } else if err.is_builder() {
        format!("无法构建请求: {}", root_cause(err))
    } else if err.is_body() || err.is_decode() {
        format!("读取响应体失败: {}", root_cause(err))
    } else {
        format!("网络错误: {}", root_cause(err))
    }
}

fn root_cause(err: &(dyn std::error::Error + 'static)) -> String {
    let mut current = err;
    while let Some(source) = current.source() {
        current = source;
    }
    current.to_string()
}
