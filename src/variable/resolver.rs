use regex::Captures;
use std::borrow::Cow;

use crate::parser::ParsedFile;
use crate::parser::matcher::MATCHERS;

/// 变量替换器
///
/// 从左到右查找 `{{name}}`（不嵌套，以第一个 `}}` 结束），按以下顺序查找变量：
/// 1. 当前环境（环境名非空且存在）
/// 2. 文件中 `@name = value` 定义的全局变量
///
/// 都找不到时保留原样，包括两侧的 `{{` `}}`。
pub struct VariableResolver;

impl VariableResolver {
    /// 按作用域优先级查找单个变量
    pub fn lookup<'a>(file: &'a ParsedFile, name: &str, env: &str) -> Option<&'a str> {
        let from_env = if env.is_empty() {
            None
        } else {
            file.environment(env).and_then(|vars| vars.get(name))
        };

        from_env.or_else(|| file.global_vars.get(name))
    }

    /// 替换文本中的所有 {{variable}} 占位符
    pub fn resolve(file: &ParsedFile, text: &str, env: &str) -> String {
        Self::replace_with(text, |name| Self::lookup(file, name, env)).into_owned()
    }

    /// 文本中仍未替换的变量名，按出现顺序去重
    pub fn unresolved_names(text: &str) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for caps in MATCHERS.variable_ref().captures_iter(text) {
            let name = &caps[1];
            if !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
        names
    }

    fn replace_with<'t, 'v, F>(text: &'t str, lookup: F) -> Cow<'t, str>
    where
        F: Fn(&str) -> Option<&'v str>,
    {
        MATCHERS
            .variable_ref()
            .replace_all(text, |caps: &Captures| {
                lookup(&caps[1]).unwrap_or(&caps[0]).to_string()
            })
    }
}
