use thiserror::Error;

use crate::parser::ParseError;
use crate::variable::EnvError;

#[derive(Error, Debug)]
pub enum JhttpError {
    #[error("解析错误: {0}")]
    ParseError(#[from] ParseError),

    /// 变量替换后 URL 不再合法，只影响当前请求
    #[error("无效的 URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("未找到名为 '{0}' 的请求")]
    RequestNotFound(String),

    #[error("无效的 HTTP 方法: {0}")]
    InvalidMethod(String),

    #[error("无效的请求头: {0}")]
    InvalidHeader(String),

    #[error("不支持的 URL（必须以 http:// 或 https:// 开头）: {0}")]
    UnsupportedScheme(String),

    #[error("环境变量错误: {0}")]
    Environment(#[from] EnvError),

    #[error("HTTP 请求失败: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("{0}")]
    Other(String),
}

/// Result type for jhttp crate
pub type Result<T> = std::result::Result<T, JhttpError>;
