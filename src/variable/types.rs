use serde::Deserialize;
use std::collections::HashMap;

use crate::http::{Headers, Method, RequestUrl};

/// 变量上下文（一个作用域），存储变量名到值的映射
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct VariableContext {
    /// 变量映射表
    variables: HashMap<String, String>,
}

impl VariableContext {
    /// 创建新的空变量上下文
    pub fn new() -> Self {
        Self::default()
    }

    /// 插入变量，已存在则覆盖
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(key.into(), value.into());
    }

    /// 获取变量值
    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(|s| s.as_str())
    }

    /// 变量数量
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

impl From<HashMap<String, String>> for VariableContext {
    fn from(variables: HashMap<String, String>) -> Self {
        Self { variables }
    }
}

/// 环境文件内容：环境名 -> 变量
///
/// ```json
/// {
///   "dev":  { "host": "http://localhost:8080" },
///   "prod": { "host": "https://api.example.com" }
/// }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct VariableConfig {
    pub environments: HashMap<String, VariableContext>,
}

impl VariableConfig {
    /// 获取指定环境的变量
    pub fn get_environment(&self, env_name: &str) -> Option<&VariableContext> {
        self.environments.get(env_name)
    }

    /// 按名称排序的环境名列表
    pub fn environment_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.environments.keys().cloned().collect();
        names.sort();
        names
    }
}

/// 完成变量替换、可以直接发送的请求
///
/// 每次替换生成一份新的副本，不会写回 [`ParsedFile`](crate::parser::ParsedFile)。
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRequest {
    pub name: String,
    pub method: Method,
    pub url: RequestUrl,
    pub headers: Headers,
    pub body: String,
    pub line_number: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variable_context_basic() {
        let mut ctx = VariableContext::new();
        assert!(ctx.is_empty());

        ctx.insert("key", "value");
        assert_eq!(ctx.len(), 1);
        assert_eq!(ctx.get("key"), Some("value"));
        assert_eq!(ctx.get("missing"), None);

        ctx.insert("key", "other");
        assert_eq!(ctx.get("key"), Some("other"));
    }

    #[test]
    fn test_variable_config_parse() {
        let json = r#"
{
  "dev": {
    "base_url": "http://localhost:8080",
    "api_key": "dev-key"
  },
  "prod": {
    "base_url": "https://api.example.com"
  }
}
"#;

        let config: VariableConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.environment_names(), vec!["dev", "prod"]);

        let dev = config.get_environment("dev").unwrap();
        assert_eq!(dev.get("base_url"), Some("http://localhost:8080"));
        assert_eq!(dev.get("api_key"), Some("dev-key"));
        assert!(config.get_environment("staging").is_none());
    }

    #[test]
    fn test_variable_config_rejects_non_string_values() {
        let json = r#"{"dev": {"port": 8080}}"#;
        assert!(serde_json::from_str::<VariableConfig>(json).is_err());
    }
}
