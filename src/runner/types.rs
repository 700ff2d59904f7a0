use crate::http::Response;
use std::time::Duration;

/// 单个请求的执行结果
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    /// 请求序号（从 1 开始，按文件中的顺序）
    pub request_number: usize,

    /// 请求名称（来自 ###）
    pub name: Option<String>,

    /// HTTP 方法
    pub method: String,

    /// 请求 URL（替换变量后）
    pub url: String,

    /// 响应状态码（如果成功）
    pub status: Option<u16>,

    /// 执行耗时
    pub duration: Duration,

    /// 收到 2xx 响应
    pub success: bool,

    /// 错误消息（变量替换、请求构建或网络错误）
    pub error: Option<String>,

    /// 完整的 HTTP 响应（用于详细输出）
    pub response: Option<Response>,

    /// 未能替换的变量名
    pub unresolved: Vec<String>,
}

impl ExecutionResult {
    pub fn success(
        request_number: usize,
        name: Option<String>,
        method: String,
        url: String,
        response: Response,
    ) -> Self {
        Self {
            request_number,
            name,
            method,
            url,
            status: Some(response.status.code()),
            duration: response.duration,
            success: response.is_success(),
            error: None,
            response: Some(response),
            unresolved: Vec::new(),
        }
    }

    pub fn error(
        request_number: usize,
        name: Option<String>,
        method: String,
        url: String,
        error: String,
        duration: Duration,
    ) -> Self {
        Self {
            request_number,
            name,
            method,
            url,
            status: None,
            duration,
            success: false,
            error: Some(error),
            response: None,
            unresolved: Vec::new(),
        }
    }

    pub fn with_unresolved(mut self, unresolved: Vec<String>) -> Self {
        self.unresolved = unresolved;
        self
    }

    /// 没有拿到响应（替换、构建或传输失败）
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// 执行摘要
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub errors: usize,
    pub total_duration: Duration,
}

impl ExecutionSummary {
    pub fn from_results(results: &[ExecutionResult]) -> Self {
        let passed = results.iter().filter(|r| r.success).count();
        let errors = results.iter().filter(|r| r.is_error()).count();
        let total_duration = results.iter().map(|r| r.duration).sum();

        Self {
            total: results.len(),
            passed,
            failed: results.len() - passed,
            errors,
            total_duration,
        }
    }
}
