use std::time::{Duration, Instant};

use tracing::{error, warn};

use crate::http::{Client, Request};
use crate::parser::{ParsedFile, ParsedRequest};
use crate::runner::types::ExecutionResult;
use crate::variable::{RequestMaterializer, ResolvedRequest};
use crate::{JhttpError, Result};

/// 连续请求之间的默认间隔
pub const DEFAULT_DELAY: Duration = Duration::from_millis(200);

pub struct RequestExecutor {
    client: Client,
    delay: Duration,
    on_resolved: Option<Box<dyn Fn(&ResolvedRequest) + Send + Sync>>,
}

impl RequestExecutor {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            delay: DEFAULT_DELAY,
            on_resolved: None,
        }
    }

    /// 设置连续请求之间的间隔
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// 每个请求完成变量替换、发送之前调用（用于 --verbose 回显）
    pub fn on_resolved<F>(mut self, callback: F) -> Self
    where
        F: Fn(&ResolvedRequest) + Send + Sync + 'static,
    {
        self.on_resolved = Some(Box::new(callback));
        self
    }

    /// 执行文件中的请求
    ///
    /// 指定名称时只执行第一个同名请求，找不到返回 [`JhttpError::RequestNotFound`]；
    /// 否则按顺序执行全部请求。单个请求失败不会中断其它请求。
    pub async fn execute_file(
        &self,
        file: &ParsedFile,
        request_name: Option<&str>,
        env: &str,
    ) -> Result<Vec<ExecutionResult>> {
        if let Some(name) = request_name {
            let (index, request) = file
                .requests
                .iter()
                .enumerate()
                .find(|(_, r)| r.name == name)
                .ok_or_else(|| JhttpError::RequestNotFound(name.to_string()))?;
            return Ok(vec![self.execute(file, request, index + 1, env).await]);
        }

        let mut results = Vec::with_capacity(file.requests.len());
        for (index, request) in file.requests.iter().enumerate() {
            if index > 0 && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            results.push(self.execute(file, request, index + 1, env).await);
        }

        Ok(results)
    }

    /// 执行单个请求
    pub async fn execute(
        &self,
        file: &ParsedFile,
        parsed: &ParsedRequest,
        request_number: usize,
        env: &str,
    ) -> ExecutionResult {
        let method = parsed.method.to_string();
        let name = parsed.name().map(|s| s.to_string());
        let start = Instant::now();

        let resolved = match RequestMaterializer::materialize(file, parsed, env) {
            Ok(resolved) => resolved,
            Err(e) => {
                warn!(line = parsed.line_number, error = %e, "variable resolution failed");
                return ExecutionResult::error(
                    request_number,
                    name,
                    method,
                    parsed.url.to_string(),
                    e.to_string(),
                    start.elapsed(),
                );
            }
        };

        let unresolved = resolved.unresolved_variables();
        if !unresolved.is_empty() {
            warn!(
                line = parsed.line_number,
                variables = ?unresolved,
                "request has unresolved variables"
            );
        }
        if let Some(callback) = &self.on_resolved {
            callback(&resolved);
        }

        let url = resolved.url.to_string();
        let request = match Request::try_from(&resolved) {
            Ok(req) => req,
            Err(e) => {
                return ExecutionResult::error(
                    request_number,
                    name,
                    method,
                    url,
                    format!("无法构建请求: {}", e),
                    start.elapsed(),
                )
                .with_unresolved(unresolved);
            }
        };

        match self.client.execute(request).await {
            Ok(response) => ExecutionResult::success(request_number, name, method, url, response)
                .with_unresolved(unresolved),
            Err(e) => {
                let message = match &e {
                    JhttpError::HttpError(inner) => crate::http::client::describe_error(inner),
                    other => other.to_string(),
                };
                error!(url = %url, error = %message, "request failed");
                ExecutionResult::error(
                    request_number,
                    name,
                    method,
                    url,
                    message,
                    start.elapsed(),
                )
                .with_unresolved(unresolved)
            }
        }
    }
}
