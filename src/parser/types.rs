use std::collections::HashMap;
use std::path::PathBuf;

use crate::http::{Headers, Method, RequestUrl};
use crate::variable::VariableContext;

/// 单个解析后的 HTTP 请求
///
/// 由请求行（方法 + URL）创建，之前出现的 `###` 名称和描述归属于它。
/// 解析完成后不再修改。
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRequest {
    /// 请求名称，没有 `###` 名称时为空字符串
    pub name: String,

    /// 紧跟在名称后的注释行，按换行拼接
    pub description: String,

    pub method: Method,

    /// 请求 URL（尚未做变量替换）
    pub url: RequestUrl,

    /// Headers 列表，保持原始顺序
    pub headers: Headers,

    /// 请求体，去掉首尾空白，可能为空
    pub body: String,

    /// 请求行在文件中的行号（从 1 开始）
    pub line_number: usize,
}

impl ParsedRequest {
    pub fn new(method: Method, url: RequestUrl, line_number: usize) -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            method,
            url,
            headers: Headers::new(),
            body: String::new(),
            line_number,
        }
    }

    /// 获取请求名称（如果有）
    pub fn name(&self) -> Option<&str> {
        (!self.name.is_empty()).then_some(self.name.as_str())
    }

    /// 用于列表展示的名称，没有名称时使用 `METHOD url`
    pub fn display_name(&self) -> String {
        match self.name() {
            Some(name) => name.to_string(),
            None => format!("{} {}", self.method, self.url),
        }
    }
}

/// 整个文件的解析结果
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedFile {
    /// 解析出的所有请求，按在文件中出现的顺序
    pub requests: Vec<ParsedRequest>,

    /// `@name = value` 定义的全局变量
    pub global_vars: VariableContext,

    /// 环境名 -> 环境变量，由外部加载后合并进来
    pub environments: HashMap<String, VariableContext>,

    /// 源文件路径（用于错误报告）
    pub source_path: Option<PathBuf>,
}

impl ParsedFile {
    /// 创建一个新的空文件解析结果
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置源文件路径
    pub fn with_source_path(mut self, path: PathBuf) -> Self {
        self.source_path = Some(path);
        self
    }

    /// 添加一个请求
    pub fn add_request(&mut self, request: ParsedRequest) {
        self.requests.push(request);
    }

    /// 合并外部加载的环境变量，同名环境以最后一次为准
    pub fn merge_environment(&mut self, name: impl Into<String>, vars: VariableContext) {
        self.environments.insert(name.into(), vars);
    }

    pub fn environment(&self, name: &str) -> Option<&VariableContext> {
        self.environments.get(name)
    }

    /// 通过名称查找请求，重名时返回第一个
    pub fn find_request(&self, name: &str) -> Option<&ParsedRequest> {
        self.requests.iter().find(|r| r.name == name)
    }
}

/// 解析错误类型
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// 请求行中的 URL 结构不合法
    #[error("Invalid URL '{url}' at line {line}: {source}")]
    InvalidUrl {
        line: usize,
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// IO 错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ParseError {
    /// 出错的行号（从 1 开始）
    pub fn line(&self) -> Option<usize> {
        match self {
            ParseError::InvalidUrl { line, .. } => Some(*line),
            ParseError::Io(_) => None,
        }
    }
}

/// 解析结果类型别名
pub type ParseResult<T> = Result<T, ParseError>;
