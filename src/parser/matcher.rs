//! 行级匹配器
//!
//! `.http` 文件按行分类。所有正则在进程内只编译一次，之后只读共享。
//! 分类按固定优先级进行，先命中者生效：
//!
//! 1. 请求名称 `### 名称`
//! 2. 注释 `# 文本`
//! 3. 变量定义 `@name = value`
//! 4. 请求行 `METHOD url`
//! 5. 请求头 `Name: value`
//!
//! 是否把某行当作请求头或请求体，由 [`HttpFileParser`](super::HttpFileParser)
//! 根据当前状态决定；这里只做与状态无关的语法识别。

use once_cell::sync::Lazy;
use regex::Regex;

use crate::http::Method;

/// 预编译的行模式
pub struct Matchers {
    request_name: Regex,
    variable: Regex,
    request_line: Regex,
    header: Regex,
    variable_ref: Regex,
}

impl Matchers {
    fn compile() -> Self {
        Self {
            request_name: Regex::new(r"^###\s*(.*)$").expect("request name pattern"),
            variable: Regex::new(r"^@([A-Za-z0-9_]+)\s*=\s*(.+)$").expect("variable pattern"),
            request_line: Regex::new(r"^(GET|POST|PUT|DELETE|PATCH|HEAD|OPTIONS|TRACE)\s+(.+)$")
                .expect("request line pattern"),
            header: Regex::new(r"^([^:]+):\s*(.+)$").expect("header pattern"),
            variable_ref: Regex::new(r"\{\{([^}]+)\}\}").expect("variable reference pattern"),
        }
    }

    /// `{{name}}` 变量引用
    pub fn variable_ref(&self) -> &Regex {
        &self.variable_ref
    }
}

/// 全局只读的匹配器注册表
pub static MATCHERS: Lazy<Matchers> = Lazy::new(Matchers::compile);

/// 单行的语法分类
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// 空行（或只含空白）
    Blank,
    /// `###` 开头，携带去掉首尾空白后的名称（可能为空）
    RequestName(&'a str),
    /// `#` 开头，携带去掉首尾空白后的注释文本
    Comment(&'a str),
    Variable {
        name: &'a str,
        value: &'a str,
    },
    RequestLine {
        method: Method,
        url: &'a str,
    },
    Header {
        name: &'a str,
        value: &'a str,
    },
    /// 以上都不是（包括只含空白字符的行），可能是请求体内容
    Other,
}

/// 按固定优先级对一行分类
pub fn classify(line: &str) -> LineKind<'_> {
    if line.is_empty() {
        return LineKind::Blank;
    }

    let m = &*MATCHERS;

    if let Some(caps) = m.request_name.captures(line) {
        let name = caps.get(1).map_or("", |c| c.as_str());
        return LineKind::RequestName(name.trim());
    }

    if let Some(text) = line.strip_prefix('#') {
        return LineKind::Comment(text.trim());
    }

    if let Some(caps) = m.variable.captures(line) {
        if let (Some(name), Some(value)) = (caps.get(1), caps.get(2)) {
            return LineKind::Variable {
                name: name.as_str(),
                value: value.as_str().trim(),
            };
        }
    }

    if let Some(caps) = m.request_line.captures(line) {
        if let (Some(method), Some(url)) = (caps.get(1), caps.get(2)) {
            if let Ok(method) = method.as_str().parse() {
                return LineKind::RequestLine {
                    method,
                    url: url.as_str(),
                };
            }
        }
    }

    if let Some(caps) = m.header.captures(line) {
        if let (Some(name), Some(value)) = (caps.get(1), caps.get(2)) {
            return LineKind::Header {
                name: name.as_str().trim(),
                value: value.as_str().trim(),
            };
        }
    }

    LineKind::Other
}

/// 不经过请求头阶段、直接进入请求体的行（JSON 对象或数组）
pub fn starts_json_body(line: &str) -> bool {
    line.starts_with('{') || line.starts_with('[')
}

/// 文本中是否含有 `{{name}}` 引用
pub fn has_variable_ref(text: &str) -> bool {
    MATCHERS.variable_ref.is_match(text)
}

/// 看起来像真实请求头名称（HTTP token 字符）
pub(crate) fn is_header_token(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "!#$%&'*+-.^_`|~".contains(c))
}
