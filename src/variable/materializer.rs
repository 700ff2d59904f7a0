use percent_encoding::percent_decode_str;
use tracing::trace;

use crate::http::RequestUrl;
use crate::parser::{ParsedFile, ParsedRequest};
use crate::variable::resolver::VariableResolver;
use crate::variable::types::ResolvedRequest;
use crate::{JhttpError, Result};

/// 把解析出的请求变成可以发送的请求
pub struct RequestMaterializer;

impl RequestMaterializer {
    /// 对 URL、每个请求头的值、请求体分别做变量替换
    ///
    /// 原请求不会被修改。只有替换后的 URL 结构不合法时才会失败，
    /// 未找到的变量保留原样。
    pub fn materialize(
        file: &ParsedFile,
        request: &ParsedRequest,
        env: &str,
    ) -> Result<ResolvedRequest> {
        let url = Self::resolve_url(file, &request.url, env)?;
        let headers = request
            .headers
            .map_values(|value| VariableResolver::resolve(file, value, env));
        let body = VariableResolver::resolve(file, &request.body, env);

        Ok(ResolvedRequest {
            name: request.name.clone(),
            method: request.method,
            url,
            headers,
            body,
            line_number: request.line_number,
        })
    }

    /// 先做百分号解码（`%7B%7Bhost%7D%7D` 还原成 `{{host}}`），再替换，再重新解析
    fn resolve_url(file: &ParsedFile, url: &RequestUrl, env: &str) -> Result<RequestUrl> {
        let rendered = url.to_string();
        let decoded = match percent_decode_str(&rendered).decode_utf8() {
            Ok(decoded) => decoded.into_owned(),
            Err(_) => rendered.clone(),
        };

        let resolved = VariableResolver::resolve(file, &decoded, env);
        trace!(from = %rendered, to = %resolved, "url resolved");

        RequestUrl::parse(&resolved).map_err(|source| JhttpError::InvalidUrl {
            url: resolved,
            source,
        })
    }
}

impl ResolvedRequest {
    /// 仍未替换的变量名（URL、请求头、请求体）
    pub fn unresolved_variables(&self) -> Vec<String> {
        let mut names = VariableResolver::unresolved_names(self.url.as_str());
        let rest = self
            .headers
            .iter()
            .map(|(_, value)| value)
            .chain(std::iter::once(self.body.as_str()));

        for text in rest {
            for name in VariableResolver::unresolved_names(text) {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::Method;
    use crate::parser::parse_content;
    use crate::variable::VariableContext;

    #[test]
    fn test_materialize_global_variables() {
        let file = parse_content("@host = http://a\nGET {{host}}/u\n").unwrap();
        let resolved = RequestMaterializer::materialize(&file, &file.requests[0], "").unwrap();

        assert_eq!(resolved.url.as_str(), "http://a/u");
        assert!(resolved.url.is_absolute());
        assert_eq!(resolved.method, Method::Get);
        assert_eq!(resolved.line_number, 2);
    }

    #[test]
    fn test_materialize_keeps_missing_token() {
        let file = parse_content("@host = http://a\nGET {{missing}}/u\n").unwrap();
        let resolved = RequestMaterializer::materialize(&file, &file.requests[0], "").unwrap();

        assert_eq!(resolved.url.as_str(), "{{missing}}/u");
        assert_eq!(resolved.unresolved_variables(), vec!["missing"]);
    }

    #[test]
    fn test_materialize_headers_and_body() {
        let content = r#"
@token = secret
@id = 42
POST http://a/items
Authorization: Bearer {{token}}
X-Tag: one
X-Tag: {{id}}

{"id": {{id}}, "note": "{{note}}"}
"#;
        let file = parse_content(content).unwrap();
        let request = &file.requests[0];
        let resolved = RequestMaterializer::materialize(&file, request, "").unwrap();

        assert_eq!(resolved.headers.get("authorization"), Some("Bearer secret"));
        let tags: Vec<_> = resolved.headers.get_all("x-tag").collect();
        assert_eq!(tags, vec!["one", "42"]);
        assert_eq!(resolved.body, r#"{"id": 42, "note": "{{note}}"}"#);
        assert_eq!(resolved.unresolved_variables(), vec!["note"]);

        // 原请求不变
        assert_eq!(request.headers.get("Authorization"), Some("Bearer {{token}}"));
        assert!(request.body.contains("{{id}}"));
    }

    #[test]
    fn test_materialize_uses_environment_first() {
        let mut file = parse_content("@host = http://global\nGET {{host}}/u\n").unwrap();
        let mut dev = VariableContext::new();
        dev.insert("host", "http://dev:8080");
        file.merge_environment("dev", dev);

        let request = file.requests[0].clone();
        let resolved = RequestMaterializer::materialize(&file, &request, "dev").unwrap();
        assert_eq!(resolved.url.as_str(), "http://dev:8080/u");

        let resolved = RequestMaterializer::materialize(&file, &request, "").unwrap();
        assert_eq!(resolved.url.as_str(), "http://global/u");
    }

    #[test]
    fn test_materialize_template_url() {
        let file = parse_content("@port = 9000\nGET http://localhost:{{port}}/health\n").unwrap();
        let resolved = RequestMaterializer::materialize(&file, &file.requests[0], "").unwrap();
        assert_eq!(resolved.url.as_str(), "http://localhost:9000/health");
        assert_eq!(resolved.url.as_url().unwrap().port(), Some(9000));
    }

    #[test]
    fn test_materialize_decodes_encoded_tokens() {
        let file = parse_content("@q = rust\nGET http://a/search?q=%7B%7Bq%7D%7D\n").unwrap();
        let resolved = RequestMaterializer::materialize(&file, &file.requests[0], "").unwrap();
        assert_eq!(resolved.url.as_str(), "http://a/search?q=rust");
    }

    #[test]
    fn test_materialize_invalid_url_after_substitution() {
        let file = parse_content("@port = abc\nGET http://localhost:{{port}}/\n").unwrap();
        let err = RequestMaterializer::materialize(&file, &file.requests[0], "").unwrap_err();
        match err {
            JhttpError::InvalidUrl { url, source } => {
                assert_eq!(url, "http://localhost:abc/");
                assert_eq!(source, url::ParseError::InvalidPort);
            }
            other => panic!("Expected InvalidUrl, got {other:?}"),
        }
    }
}
